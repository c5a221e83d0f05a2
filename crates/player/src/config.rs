//! Client configuration from the environment (`.env` supported via dotenvy)

use std::path::PathBuf;
use std::time::Duration;

use theatre_domain::DEFAULT_PLAYER_NAME;

use crate::infrastructure::http_client::DEFAULT_API_URL;

pub const ENV_API_URL: &str = "THEATRE_API_URL";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "THEATRE_REQUEST_TIMEOUT_MS";
pub const ENV_EXPORT_DIR: &str = "THEATRE_EXPORT_DIR";
pub const ENV_PLAYER_FALLBACK: &str = "THEATRE_PLAYER_FALLBACK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash
    pub api_url: String,
    /// `None` waits forever, like the browser clients did
    pub request_timeout: Option<Duration>,
    pub export_dir: PathBuf,
    pub player_fallback: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: None,
            export_dir: PathBuf::from("."),
            player_fallback: DEFAULT_PLAYER_NAME.to_string(),
        }
    }
}

impl ClientConfig {
    /// Reads `THEATRE_*` variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_url = lookup(ENV_API_URL)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| match url::Url::parse(&raw) {
                Ok(_) => Some(raw.trim_end_matches('/').to_string()),
                Err(e) => {
                    tracing::warn!(value = %raw, error = %e, "Invalid {}, using default", ENV_API_URL);
                    None
                }
            })
            .unwrap_or(defaults.api_url);

        let request_timeout = lookup(ENV_REQUEST_TIMEOUT_MS).and_then(|raw| {
            match raw.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(ms) => Some(Duration::from_millis(ms)),
                Err(_) => {
                    tracing::warn!(value = %raw, "Invalid {}, requests will not time out", ENV_REQUEST_TIMEOUT_MS);
                    None
                }
            }
        });

        let export_dir = lookup(ENV_EXPORT_DIR)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        let player_fallback = lookup(ENV_PLAYER_FALLBACK)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or(defaults.player_fallback);

        Self {
            api_url,
            request_timeout,
            export_dir,
            player_fallback,
        }
    }
}
