//! Runtime configuration and logging setup

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

pub const DEFAULT_DB_PATH: &str = "gymdesk.db";
pub const DEFAULT_USER: &str = "local";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    /// Acting user for every per-user operation
    pub user_id: String,
    /// Emit JSON envelopes instead of text
    pub json: bool,
}

impl Config {
    /// Blank user ids fall back to the default user
    pub fn new(db_path: impl Into<PathBuf>, user_id: &str, json: bool) -> Self {
        let user_id = match user_id.trim() {
            "" => DEFAULT_USER.to_string(),
            trimmed => trimmed.to_string(),
        };
        Self {
            db_path: db_path.into(),
            user_id,
            json,
        }
    }
}

/// Log to stderr, filtered by RUST_LOG (default "info")
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
