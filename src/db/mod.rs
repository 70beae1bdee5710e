//! Database layer (Firestore, plus an in-process store with the same semantics).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::InMemoryDb;

use crate::config::StoreConfig;
use crate::error::AppError;
use crate::models::{UserLookup, UserRecord};
use async_trait::async_trait;
use std::sync::Arc;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
}

/// Per-user progress storage, keyed by username.
///
/// Implementations must be safe to share across tasks; callers hold them as
/// `Arc<dyn UserStore>`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create or merge-update the user document.
    ///
    /// Exactly `username` and `completedMissions` are written; other stored
    /// fields survive. `None` stores an empty mission list, replacing
    /// whatever was there.
    async fn set_user(
        &self,
        username: &str,
        completed_missions: Option<Vec<String>>,
    ) -> Result<(), AppError>;

    /// Look up a user document by key.
    async fn find_user(&self, username: &str) -> Result<UserLookup, AppError>;

    /// Get a user, treating a missing document as a user with no missions.
    async fn get_user(&self, username: &str) -> Result<UserRecord, AppError> {
        Ok(self.find_user(username).await?.into_record_or_default(username))
    }

    /// Append a mission to the end of the user's completed list.
    ///
    /// The append is atomic with respect to other calls for the same user.
    /// Duplicates are kept.
    async fn add_completed_mission(&self, username: &str, mission_id: &str)
        -> Result<(), AppError>;
}

/// Connect to the Firestore described by `config`.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn UserStore>, AppError> {
    let db = FirestoreDb::connect(config).await?;
    Ok(Arc::new(db))
}
