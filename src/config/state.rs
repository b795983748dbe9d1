// Application state module
// Everything a request handler needs, shared behind an Arc

use std::path::PathBuf;

use super::types::Config;

/// Application state
///
/// Immutable after construction; the root directory and the outbound HTTP
/// client are resolved once so handlers never re-parse configuration.
pub struct AppState {
    pub config: Config,
    /// Root directory all virtual paths resolve beneath
    pub root: PathBuf,
    /// Shared client for mirror-source fetches
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            root: PathBuf::from(&config.storage.root_dir),
            config: config.clone(),
            http_client: reqwest::Client::new(),
        }
    }
}
