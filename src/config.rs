//! Configuration types and environment loading.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Which conversation state store to use.
///
/// `Memory` is for local debugging only; state is gone on restart. `File`
/// keeps one JSON document per conversation under a directory and survives
/// restarts on a single machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageProvider {
    Memory,
    File { dir: PathBuf },
}

impl StorageProvider {
    /// Parse a provider selector (`"memory"` or `"file"`) plus its state dir.
    pub fn parse(selector: &str, state_dir: PathBuf) -> Result<Self, ConfigError> {
        match selector.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File { dir: state_dir }),
            other => Err(ConfigError::InvalidValue {
                key: "FEEDBACK_BOT_STORAGE".to_string(),
                message: format!("unknown storage provider '{other}' (expected 'memory' or 'file')"),
            }),
        }
    }
}

/// Bot registration credentials, loaded at startup and otherwise opaque.
pub struct BotCredentials {
    pub app_id: String,
    pub app_password: SecretString,
}

impl std::fmt::Debug for BotCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotCredentials")
            .field("app_id", &self.app_id)
            .field("app_password", &"[REDACTED]")
            .finish()
    }
}

/// Bot configuration.
#[derive(Debug)]
pub struct BotConfig {
    /// Port the delivery-receipt webhook listens on.
    pub http_port: u16,
    /// Conversation state store selection.
    pub storage: StorageProvider,
    /// Score a conversation must reach for the positive survey ending.
    pub required_score: i64,
    /// Pacing delay per character of response text. Zero disables pacing.
    pub typing_delay_per_char: Duration,
    /// Bot registration credentials, if configured.
    pub credentials: Option<BotCredentials>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            storage: StorageProvider::Memory,
            required_score: 1,
            typing_delay_per_char: Duration::ZERO,
            credentials: None,
        }
    }
}

impl BotConfig {
    /// Load configuration from the environment.
    ///
    /// Every variable is optional; absent values fall back to the defaults.
    /// Credentials are only loaded when both `MICROSOFT_APP_ID` and
    /// `MICROSOFT_APP_PASSWORD` are present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let http_port = match std::env::var("FEEDBACK_BOT_HTTP_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "FEEDBACK_BOT_HTTP_PORT".to_string(),
                message: format!("'{raw}' is not a valid port"),
            })?,
            Err(_) => defaults.http_port,
        };

        let state_dir = std::env::var("FEEDBACK_BOT_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/state"));
        let storage = match std::env::var("FEEDBACK_BOT_STORAGE") {
            Ok(selector) => StorageProvider::parse(&selector, state_dir)?,
            Err(_) => defaults.storage,
        };

        let required_score = match std::env::var("FEEDBACK_BOT_REQUIRED_SCORE") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "FEEDBACK_BOT_REQUIRED_SCORE".to_string(),
                message: format!("'{raw}' is not a valid score"),
            })?,
            Err(_) => defaults.required_score,
        };

        let typing_delay_per_char = match std::env::var("FEEDBACK_BOT_TYPING_DELAY") {
            Ok(raw) => {
                let ms: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "FEEDBACK_BOT_TYPING_DELAY".to_string(),
                    message: format!("'{raw}' is not a millisecond count"),
                })?;
                Duration::from_millis(ms)
            }
            Err(_) => defaults.typing_delay_per_char,
        };

        let credentials = match (
            std::env::var("MICROSOFT_APP_ID"),
            std::env::var("MICROSOFT_APP_PASSWORD"),
        ) {
            (Ok(app_id), Ok(password)) => Some(BotCredentials {
                app_id,
                app_password: SecretString::from(password),
            }),
            _ => None,
        };

        Ok(Self {
            http_port,
            storage,
            required_score,
            typing_delay_per_char,
            credentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = BotConfig::default();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.storage, StorageProvider::Memory);
        assert_eq!(config.required_score, 1);
        assert_eq!(config.typing_delay_per_char, Duration::ZERO);
        assert!(config.credentials.is_none());
    }

    #[test]
    fn storage_provider_parses_known_selectors() {
        let dir = PathBuf::from("/tmp/state");
        assert_eq!(
            StorageProvider::parse("memory", dir.clone()).unwrap(),
            StorageProvider::Memory
        );
        assert_eq!(
            StorageProvider::parse("file", dir.clone()).unwrap(),
            StorageProvider::File { dir: dir.clone() }
        );
        // Case and whitespace are forgiven
        assert_eq!(
            StorageProvider::parse(" Memory ", dir).unwrap(),
            StorageProvider::Memory
        );
    }

    #[test]
    fn storage_provider_rejects_unknown_selector() {
        let err = StorageProvider::parse("cosmos", PathBuf::from(".")).unwrap_err();
        assert!(err.to_string().contains("cosmos"));
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = BotCredentials {
            app_id: "app-123".to_string(),
            app_password: SecretString::from("hunter2"),
        };
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("app-123"));
        assert!(!rendered.contains("hunter2"));
    }
}
