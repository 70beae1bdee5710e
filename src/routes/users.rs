// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User progress routes.

use crate::error::{AppError, Result};
use crate::models::UserRecord;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

const MAX_MISSION_ID_LEN: u64 = 256;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users/{username}", get(get_user).put(set_user))
        .route("/api/users/{username}/missions", post(add_completed_mission))
}

/// Body for replacing a user's mission list.
#[derive(Debug, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SetUserRequest {
    /// Omitted means "no completed missions".
    #[serde(default)]
    #[validate(custom(function = "validate_mission_ids"))]
    pub completed_missions: Option<Vec<String>>,
}

/// Body for recording one completed mission.
#[derive(Debug, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AddMissionRequest {
    #[validate(length(min = 1, max = MAX_MISSION_ID_LEN))]
    pub mission_id: String,
}

#[allow(clippy::ptr_arg)] // signature required by validator
fn validate_mission_ids(ids: &Vec<String>) -> std::result::Result<(), ValidationError> {
    if ids
        .iter()
        .any(|id| id.is_empty() || id.len() as u64 > MAX_MISSION_ID_LEN)
    {
        return Err(ValidationError::new("mission_id_length"));
    }
    Ok(())
}

fn validated<T: Validate>(body: T) -> Result<T> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(body)
}

/// Get a user's progress. Unknown users have no completed missions.
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<UserRecord>> {
    let user = state.store.get_user(&username).await?;
    Ok(Json(user))
}

/// Create or overwrite a user's mission list.
async fn set_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    body: std::result::Result<Json<SetUserRequest>, JsonRejection>,
) -> Result<StatusCode> {
    let Json(body) = body?;
    let body = validated(body)?;
    state
        .store
        .set_user(&username, body.completed_missions)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Record a completed mission for a user.
async fn add_completed_mission(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    body: std::result::Result<Json<AddMissionRequest>, JsonRejection>,
) -> Result<StatusCode> {
    let Json(body) = body?;
    let body = validated(body)?;
    tracing::info!(
        username = %username,
        mission_id = %body.mission_id,
        "Recording completed mission"
    );
    state
        .store
        .add_completed_mission(&username, &body.mission_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
