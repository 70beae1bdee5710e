// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User store behaviour against the in-process backend.

use mission_progress::db::{FirestoreDb, InMemoryDb, UserStore};
use mission_progress::models::{UserLookup, UserRecord};

fn missions(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[tokio::test]
async fn test_get_unknown_user_returns_empty_record() {
    let db = InMemoryDb::new();

    let user = db.get_user("nobody").await.unwrap();

    assert_eq!(user, UserRecord::new("nobody"));
    // Reading must not create the document
    assert!(db.is_empty());
}

#[tokio::test]
async fn test_find_user_distinguishes_absence() {
    let db = InMemoryDb::new();
    assert_eq!(db.find_user("ghost").await.unwrap(), UserLookup::NotFound);

    db.set_user("ghost", None).await.unwrap();
    assert_eq!(
        db.find_user("ghost").await.unwrap(),
        UserLookup::Found(UserRecord::new("ghost"))
    );
}

#[tokio::test]
async fn test_set_then_get_preserves_order() {
    let db = InMemoryDb::new();

    db.set_user("alice", Some(missions(&["m2", "m1", "m3"])))
        .await
        .unwrap();

    let user = db.get_user("alice").await.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.completed_missions, missions(&["m2", "m1", "m3"]));
}

#[tokio::test]
async fn test_set_user_is_idempotent() {
    let once = InMemoryDb::new();
    once.set_user("bob", Some(missions(&["m1"]))).await.unwrap();

    let twice = InMemoryDb::new();
    twice.set_user("bob", Some(missions(&["m1"]))).await.unwrap();
    twice.set_user("bob", Some(missions(&["m1"]))).await.unwrap();

    assert_eq!(
        once.get_user("bob").await.unwrap(),
        twice.get_user("bob").await.unwrap()
    );
    assert_eq!(twice.len(), 1);
}

#[tokio::test]
async fn test_set_user_without_missions_clears_them() {
    let db = InMemoryDb::new();
    db.set_user("carol", Some(missions(&["m1", "m2"])))
        .await
        .unwrap();

    db.set_user("carol", None).await.unwrap();

    let user = db.get_user("carol").await.unwrap();
    assert!(user.completed_missions.is_empty());
    assert!(db.find_user("carol").await.unwrap().is_found());
}

#[tokio::test]
async fn test_add_mission_to_fresh_user() {
    let db = InMemoryDb::new();

    db.add_completed_mission("dave", "intro").await.unwrap();

    let user = db.get_user("dave").await.unwrap();
    assert_eq!(user.completed_missions, missions(&["intro"]));
}

#[tokio::test]
async fn test_sequential_adds_append_in_order() {
    let db = InMemoryDb::new();

    db.add_completed_mission("erin", "a").await.unwrap();
    db.add_completed_mission("erin", "b").await.unwrap();

    let user = db.get_user("erin").await.unwrap();
    assert_eq!(user.completed_missions, missions(&["a", "b"]));
}

#[tokio::test]
async fn test_add_mission_keeps_existing_missions() {
    let db = InMemoryDb::new();
    db.set_user("frank", Some(missions(&["m1", "m2"])))
        .await
        .unwrap();

    db.add_completed_mission("frank", "m3").await.unwrap();

    let user = db.get_user("frank").await.unwrap();
    assert_eq!(user.completed_missions, missions(&["m1", "m2", "m3"]));
}

#[tokio::test]
async fn test_duplicate_missions_are_kept() {
    let db = InMemoryDb::new();

    db.add_completed_mission("gina", "m1").await.unwrap();
    db.add_completed_mission("gina", "m1").await.unwrap();

    let user = db.get_user("gina").await.unwrap();
    assert_eq!(user.completed_missions, missions(&["m1", "m1"]));
}

#[tokio::test]
async fn test_users_are_isolated() {
    let db = InMemoryDb::new();

    db.add_completed_mission("hank", "m1").await.unwrap();
    db.add_completed_mission("iris", "m2").await.unwrap();

    assert_eq!(
        db.get_user("hank").await.unwrap().completed_missions,
        missions(&["m1"])
    );
    assert_eq!(
        db.get_user("iris").await.unwrap().completed_missions,
        missions(&["m2"])
    );
}

#[tokio::test]
async fn test_offline_store_surfaces_storage_errors() {
    let db = FirestoreDb::new_mock();

    let err = db.get_user("alice").await.unwrap_err();
    assert!(err.is_storage_error());

    let err = db.find_user("alice").await.unwrap_err();
    assert!(err.is_storage_error());

    let err = db.set_user("alice", None).await.unwrap_err();
    assert!(err.is_storage_error());

    let err = db.add_completed_mission("alice", "m1").await.unwrap_err();
    assert!(err.is_storage_error());
    assert!(err.to_string().contains("offline mode"));
}
