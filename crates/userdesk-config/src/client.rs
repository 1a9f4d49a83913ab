use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the API client used by the CLI and any other frontend.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Directory holding the persisted token file.
    pub token_dir: PathBuf,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("USERDESK_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            token_dir: env::var("USERDESK_TOKEN_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".userdesk")),
            timeout: Duration::from_secs(
                env::var("USERDESK_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}
