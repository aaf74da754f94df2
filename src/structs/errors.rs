use thiserror::Error;

/// Errors that may happen while fetching the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    ConfigDirNotFound,
}

/// Errors that may happen while talking to the chat endpoint.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The request never completed (DNS, connection refused, timeout...)
    #[error("Could not reach the chat endpoint: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The endpoint answered with a non-OK status
    #[error("Chat endpoint returned {status}")]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// The endpoint answered, but the body was not the expected JSON
    #[error("Could not decode the chat response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Could not build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Errors that may happen while driving the terminal.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("Terminal error: {0}")]
    Display(#[from] std::io::Error),
}
