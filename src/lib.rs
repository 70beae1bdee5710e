// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Mission-Progress: per-user record of completed missions.
//!
//! This crate provides the Firestore-backed user store and a small HTTP API
//! for reading and updating mission progress.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

use config::Config;
use db::UserStore;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn UserStore>,
}
