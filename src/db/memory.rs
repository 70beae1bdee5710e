//! In-process user store.
//!
//! Same semantics as the Firestore backend, without a database.

use crate::db::UserStore;
use crate::error::AppError;
use crate::models::{UserLookup, UserRecord};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Users keyed by username. Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct InMemoryDb {
    users: Arc<DashMap<String, UserRecord>>,
}

impl InMemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored user documents.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryDb {
    async fn set_user(
        &self,
        username: &str,
        completed_missions: Option<Vec<String>>,
    ) -> Result<(), AppError> {
        // Only two fields exist, so a merge of both is a full replace.
        self.users.insert(
            username.to_string(),
            UserRecord::with_missions(username, completed_missions.unwrap_or_default()),
        );
        Ok(())
    }

    async fn find_user(&self, username: &str) -> Result<UserLookup, AppError> {
        Ok(self
            .users
            .get(username)
            .map(|entry| entry.value().clone())
            .into())
    }

    async fn add_completed_mission(
        &self,
        username: &str,
        mission_id: &str,
    ) -> Result<(), AppError> {
        // The entry guard holds the shard lock for the whole append.
        self.users
            .entry(username.to_string())
            .or_insert_with(|| UserRecord::new(username))
            .completed_missions
            .push(mission_id.to_string());

        tracing::debug!(username, mission_id, "Mission recorded");
        Ok(())
    }
}
