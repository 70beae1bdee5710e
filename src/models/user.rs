//! User progress model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User progress document stored in Firestore.
///
/// Field names are camelCase on the wire to match documents written by
/// earlier versions of the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Username (also used as document ID)
    pub username: String,
    /// Mission IDs in the order they were completed. May contain duplicates.
    #[serde(default)]
    pub completed_missions: Vec<String>,
}

impl UserRecord {
    /// A record with no completed missions.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            completed_missions: Vec::new(),
        }
    }

    pub fn with_missions(username: impl Into<String>, completed_missions: Vec<String>) -> Self {
        Self {
            username: username.into(),
            completed_missions,
        }
    }
}

/// Result of a by-key lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    Found(UserRecord),
    NotFound,
}

impl UserLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, UserLookup::Found(_))
    }

    /// Collapse the lookup into a record, treating absence as a user with
    /// no completed missions.
    ///
    /// The returned username is always `username`, even if the stored
    /// document carries a different value.
    pub fn into_record_or_default(self, username: &str) -> UserRecord {
        match self {
            UserLookup::Found(record) => {
                UserRecord::with_missions(username, record.completed_missions)
            }
            UserLookup::NotFound => UserRecord::new(username),
        }
    }
}

impl From<Option<UserRecord>> for UserLookup {
    fn from(value: Option<UserRecord>) -> Self {
        match value {
            Some(record) => UserLookup::Found(record),
            None => UserLookup::NotFound,
        }
    }
}
