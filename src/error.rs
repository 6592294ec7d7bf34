use thiserror::Error;

/// Errors raised while loading configuration or driving the presence store
#[derive(Error, Debug)]
pub enum Error {
    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for our schema
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A presence snapshot could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration parsed but breaks a humanizer invariant
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A theme color string could not be parsed
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A store listener tried to update the store while it was notifying
    #[error("Store update requested while listeners were being notified")]
    ReentrantUpdate,
}

impl Error {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// Result type for presence operations
pub type Result<T> = std::result::Result<T, Error>;
