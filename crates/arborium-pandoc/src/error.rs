//! Errors that abort a filter run.
//!
//! Per-block highlighting failures are not errors; they leave the block as it was.

/// Errors that can occur while filtering a document.
#[derive(Debug)]
pub enum FilterError {
    /// Reading the input or writing the output failed.
    Io(std::io::Error),
    /// The input is not a pandoc JSON document.
    MalformedInput(serde_json::Error),
    /// The transformed document could not be serialized.
    Encode(serde_json::Error),
    /// Invalid filter configuration.
    Config(String),
}

impl From<std::io::Error> for FilterError {
    fn from(e: std::io::Error) -> Self {
        FilterError::Io(e)
    }
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::Io(e) => write!(f, "IO error: {}", e),
            FilterError::MalformedInput(e) => write!(f, "Malformed pandoc JSON input: {}", e),
            FilterError::Encode(e) => write!(f, "Failed to encode output document: {}", e),
            FilterError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterError::Io(e) => Some(e),
            FilterError::MalformedInput(e) | FilterError::Encode(e) => Some(e),
            FilterError::Config(_) => None,
        }
    }
}
