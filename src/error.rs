//! Error types for the feedback bot.

/// Top-level error type for the bot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Survey script error: {0}")]
    Script(#[from] ScriptError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Survey script validation errors.
///
/// Raised by `SurveyBuilder::finalize` when the declared step graph is
/// incomplete or cannot terminate. Fatal at startup: the service must not
/// accept traffic with an invalid script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("Step '{from}' references undeclared step '{to}'")]
    UnknownStep { from: String, to: String },

    #[error("Step '{0}' is declared more than once")]
    DuplicateStep(String),

    #[error("Survey script has no welcome step")]
    MissingWelcome,

    #[error("Survey script declares more than one welcome step")]
    MultipleWelcome,

    #[error("No ending step is reachable from the welcome step")]
    NoReachableEnd,

    #[error("Step '{0}' can never reach an ending step")]
    Unterminating(String),
}

/// Conversation transport errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Conversation on channel {name} closed by the user")]
    ConversationClosed { name: String },

    #[error("Failed to read input on channel {name}: {reason}")]
    ReadFailed { name: String, reason: String },

    #[error("Failed to send response on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },
}

/// Conversation store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for the bot.
pub type Result<T> = std::result::Result<T, Error>;
