//! Application configuration loaded from environment variables.
//!
//! Resolved once at startup. The store itself never reads the process
//! environment; it is handed a [`StoreConfig`].

use std::env;

/// Emulator endpoint used when `NODE_ENV=development`.
pub const DEFAULT_EMULATOR_HOST: &str = "localhost:9999";
/// Placeholder project the emulator accepts.
pub const EMULATOR_PROJECT_ID: &str = "demo-test";

const DEFAULT_PORT: u16 = 8080;

/// Which Firestore the store talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMode {
    /// Local emulator over plaintext gRPC, fixed placeholder project.
    Development { emulator_host: String },
    /// Real Firestore in the given project.
    Production { project_id: String },
}

/// Store connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub mode: StoreMode,
}

impl StoreConfig {
    pub fn development() -> Self {
        Self::development_at(DEFAULT_EMULATOR_HOST)
    }

    pub fn development_at(emulator_host: impl Into<String>) -> Self {
        Self {
            mode: StoreMode::Development {
                emulator_host: emulator_host.into(),
            },
        }
    }

    /// Production settings. An empty project ID is rejected.
    pub fn production(project_id: impl Into<String>) -> Result<Self, ConfigError> {
        let project_id = project_id.into();
        if project_id.trim().is_empty() {
            return Err(ConfigError::Missing("PROJECT_ID"));
        }
        Ok(Self {
            mode: StoreMode::Production { project_id },
        })
    }

    /// The Firestore project this configuration targets.
    pub fn project_id(&self) -> &str {
        match &self.mode {
            StoreMode::Development { .. } => EMULATOR_PROJECT_ID,
            StoreMode::Production { project_id } => project_id,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self.mode, StoreMode::Development { .. })
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Firestore connection settings
    pub store: StoreConfig,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honoured for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = if lookup("NODE_ENV").as_deref() == Some("development") {
            match lookup("FIRESTORE_EMULATOR_HOST") {
                Some(host) if !host.trim().is_empty() => StoreConfig::development_at(host.trim()),
                _ => StoreConfig::development(),
            }
        } else {
            let project_id = lookup("PROJECT_ID").ok_or(ConfigError::Missing("PROJECT_ID"))?;
            StoreConfig::production(project_id)?
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self { store, port })
    }

    /// Development config for tests.
    pub fn test_default() -> Self {
        Self {
            store: StoreConfig::development(),
            port: DEFAULT_PORT,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable must be defined")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
