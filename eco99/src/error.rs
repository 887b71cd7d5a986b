//! Error types for the eco99 plugin

/// Result type alias for plugin operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a menu or resolving a stream
///
/// None of them is recovered from inside the plugin: a failure aborts the
/// whole request and is reported to the host runtime.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed or the server answered with an error status
    #[error("HTTP request failed: {0}")]
    Network(#[from] ureq::Error),

    /// Reading the response body failed
    #[error("Failed to read HTTP body: {0}")]
    Io(#[from] std::io::Error),

    /// The feed is not well-formed XML
    #[error("Feed parsing failed: {0}")]
    Parse(String),

    /// An expected field or pattern is missing from the feed
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// A route needs a parameter that the invocation did not carry
    #[error("Missing route parameter: {0}")]
    MissingParameter(&'static str),

    /// The invocation carries a mode the plugin does not know about
    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    /// Host message serialization failed
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error (from eco99config/anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl Error {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an extraction error
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Whether the error comes from fetching the feed
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Io(_))
    }
}
