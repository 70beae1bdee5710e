// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed user-progress operations.
//!
//! One document per user in the `users` collection, keyed by username.

use crate::config::{StoreConfig, StoreMode, EMULATOR_PROJECT_ID};
use crate::db::{collections, UserStore};
use crate::error::AppError;
use crate::models::{UserLookup, UserRecord};
use async_trait::async_trait;
use std::time::Duration;

/// Fields written by every user upsert. Anything else on the document is left alone.
const USER_MERGE_FIELDS: [&str; 2] = ["username", "completedMissions"];

// A commit can be aborted when another transaction touched the same user.
// Each retry re-reads the document inside a fresh transaction.
const MAX_APPEND_ATTEMPTS: u32 = 5;
const APPEND_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Outcome of one transactional append.
enum AppendAttempt {
    Committed,
    CommitFailed(String),
}

impl FirestoreDb {
    /// Connect according to the resolved store configuration.
    pub async fn connect(config: &StoreConfig) -> Result<Self, AppError> {
        match &config.mode {
            StoreMode::Development { emulator_host } => {
                Self::create_emulator_client(emulator_host).await
            }
            StoreMode::Production { project_id } => Self::new(project_id).await,
        }
    }

    /// Create a new Firestore client for a real project.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access
    /// over plaintext gRPC.
    async fn create_emulator_client(emulator_host: &str) -> Result<Self, AppError> {
        tracing::info!(
            host = emulator_host,
            "Using unauthenticated connection for Firestore Emulator"
        );

        // The emulator ignores credentials, but the client still wants a token source.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(EMULATOR_PROJECT_ID.to_string())
            .with_firebase_api_url(format!("http://{}", emulator_host));

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Storage(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = EMULATOR_PROJECT_ID,
            host = emulator_host,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// The underlying client, for callers that need document fields outside
    /// [`UserRecord`]. `None` in offline mode.
    pub fn client(&self) -> Option<&firestore::FirestoreDb> {
        self.client.as_ref()
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Storage("Database not connected (offline mode)".to_string()))
    }

    /// Read-append-write inside one transaction.
    ///
    /// Read failures are returned as errors. A failed commit is reported as
    /// `CommitFailed` so the caller can retry with a fresh read.
    async fn try_append_mission(
        &self,
        username: &str,
        mission_id: &str,
    ) -> Result<AppendAttempt, AppError> {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to begin transaction: {}", e)))?;

        // Reads through this handle are registered with the transaction for
        // conflict detection.
        let tx_client = client.clone_with_consistency_selector(
            firestore::FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ),
        );

        let current: Option<UserRecord> = match tx_client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(username)
            .await
        {
            Ok(current) => current,
            Err(e) => {
                let _ = transaction.rollback().await;
                return Err(AppError::Storage(format!(
                    "Failed to read user in transaction: {}",
                    e
                )));
            }
        };

        let mut record = UserLookup::from(current).into_record_or_default(username);
        record.completed_missions.push(mission_id.to_string());

        let added = client
            .fluent()
            .update()
            .fields(USER_MERGE_FIELDS)
            .in_col(collections::USERS)
            .document_id(username)
            .object(&record)
            .add_to_transaction(&mut transaction)
            .map(|_| ())
            .map_err(|e| e.to_string());

        if let Err(reason) = added {
            let _ = transaction.rollback().await;
            return Err(AppError::Storage(format!(
                "Failed to add user to transaction: {}",
                reason
            )));
        }

        match transaction.commit().await {
            Ok(_) => Ok(AppendAttempt::Committed),
            Err(e) => Ok(AppendAttempt::CommitFailed(e.to_string())),
        }
    }
}

#[async_trait]
impl UserStore for FirestoreDb {
    async fn set_user(
        &self,
        username: &str,
        completed_missions: Option<Vec<String>>,
    ) -> Result<(), AppError> {
        let record = UserRecord::with_missions(username, completed_missions.unwrap_or_default());

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(USER_MERGE_FIELDS)
            .in_col(collections::USERS)
            .document_id(username)
            .object(&record)
            .execute()
            .await
            .map_err(AppError::storage)?;

        tracing::debug!(
            username,
            missions = record.completed_missions.len(),
            "User upserted"
        );
        Ok(())
    }

    async fn find_user(&self, username: &str) -> Result<UserLookup, AppError> {
        let record: Option<UserRecord> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(username)
            .await
            .map_err(AppError::storage)?;

        Ok(record.into())
    }

    async fn add_completed_mission(
        &self,
        username: &str,
        mission_id: &str,
    ) -> Result<(), AppError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_append_mission(username, mission_id).await? {
                AppendAttempt::Committed => {
                    tracing::debug!(username, mission_id, attempt, "Mission recorded");
                    return Ok(());
                }
                AppendAttempt::CommitFailed(reason) if attempt < MAX_APPEND_ATTEMPTS => {
                    tracing::warn!(
                        username,
                        mission_id,
                        attempt,
                        error = %reason,
                        "Mission append commit failed, retrying"
                    );
                    tokio::time::sleep(APPEND_RETRY_DELAY * attempt).await;
                }
                AppendAttempt::CommitFailed(reason) => {
                    return Err(AppError::Storage(format!(
                        "Transaction commit failed after {} attempts: {}",
                        attempt, reason
                    )));
                }
            }
        }
    }
}
