//! Application configuration.
//!
//! Every setting is resolved with the same priority:
//! `config.toml` > environment (including `.env`) > built-in default.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::paths;
use crate::planner::ExamOrder;

// ==================== File Format ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
    server: Option<ServerConfig>,
    planner: Option<PlannerConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerConfig {
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct PlannerConfig {
    exam_order: Option<ExamOrder>,
}

/// Default configuration file, relative to the working directory
pub const CONFIG_FILE: &str = "config.toml";

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port when neither config.toml nor PORT set one
pub const DEFAULT_PORT: u16 = 3000;

// ==================== Resolved Settings ====================

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_path: PathBuf,
    pub port: u16,
    pub exam_order: ExamOrder,
}

impl Settings {
    /// Load `.env`, then resolve settings from config.toml and the environment
    pub fn load() -> Self {
        // Load .env file if present
        let _ = dotenvy::dotenv();
        Self::from_file(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
    }

    /// Resolve settings from a config file and an environment lookup.
    /// A missing or malformed file counts as empty.
    pub fn from_file(path: &Path, env: impl Fn(&str) -> Option<String>) -> Self {
        let file = match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring malformed {}: {}", path.display(), e);
                    AppConfig::default()
                }
            },
            Err(_) => AppConfig::default(),
        };
        Self::resolve(file, env)
    }

    fn resolve(file: AppConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let database_path = if let Some(path) = file.database.and_then(|d| d.path) {
            tracing::info!("Using database from config.toml: {}", path);
            PathBuf::from(path)
        } else if let Some(path) = env("DATABASE_PATH") {
            tracing::info!("Using database from DATABASE_PATH env: {}", path);
            PathBuf::from(path)
        } else {
            let default = PathBuf::from(paths::db_path());
            tracing::info!("Using default database path: {}", default.display());
            default
        };

        let port = file
            .server
            .and_then(|s| s.port)
            .or_else(|| env("PORT").and_then(|p| p.parse().ok()))
            .unwrap_or(DEFAULT_PORT);

        let exam_order = file
            .planner
            .and_then(|p| p.exam_order)
            .or_else(|| {
                let raw = env("PLANNER_EXAM_ORDER")?;
                let order = ExamOrder::from_str(&raw);
                if order.is_none() {
                    tracing::warn!("Unknown PLANNER_EXAM_ORDER '{}', using default", raw);
                }
                order
            })
            .unwrap_or_default();

        Self {
            database_path,
            port,
            exam_order,
        }
    }

    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", SERVER_ADDR, self.port)
    }
}
