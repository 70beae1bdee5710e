// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use mission_progress::config::{Config, StoreConfig};
use mission_progress::db::{FirestoreDb, InMemoryDb, UserStore};
use mission_progress::routes::create_router;
use mission_progress::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a connection to the Firestore emulator.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    let host = std::env::var("FIRESTORE_EMULATOR_HOST")
        .expect("FIRESTORE_EMULATOR_HOST must be set for emulator tests");
    FirestoreDb::connect(&StoreConfig::development_at(host))
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Generate a unique username for test isolation.
#[allow(dead_code)]
pub fn unique_username(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// Create a test app over the given store.
#[allow(dead_code)]
pub fn create_test_app_with(store: Arc<dyn UserStore>) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        store,
    });
    (create_router(state.clone()), state)
}

/// Create a test app backed by an in-memory store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, InMemoryDb) {
    let db = InMemoryDb::new();
    let (app, state) = create_test_app_with(Arc::new(db.clone()));
    (app, state, db)
}

/// Create a test app whose store is offline; every operation fails.
#[allow(dead_code)]
pub fn create_offline_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Arc::new(FirestoreDb::new_mock()))
}
