use std::fmt;

/// Result type for logstitch-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A timestamp string could not be parsed
    InvalidTimestamp(String),

    /// A window was constructed with start after end, or its end moved forward
    InvalidWindow(String),

    /// A record payload lacked the expected object or timestamp structure
    MalformedRecord(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTimestamp(msg) => write!(f, "Invalid timestamp: {}", msg),
            Error::InvalidWindow(msg) => write!(f, "Invalid time window: {}", msg),
            Error::MalformedRecord(msg) => write!(f, "Malformed record: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
