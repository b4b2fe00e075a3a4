use logstitch_core::TransportError;
use std::fmt;

/// Result type for logstitch-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while talking to the controller
#[derive(Debug)]
pub enum Error {
    /// The controller address could not be turned into a URL
    InvalidAddress(String),

    /// The request failed before a response arrived
    Http(reqwest::Error),

    /// The controller answered with a non-success status
    Status { status: u16, body: String },

    /// The response body did not have the expected shape
    Decode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidAddress(msg) => write!(f, "Invalid controller address: {}", msg),
            Error::Http(err) => write!(f, "HTTP error: {}", err),
            Error::Status { status, body } => write!(f, "Error {} {}", status, body),
            Error::Decode(msg) => write!(f, "Unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err),
            Error::InvalidAddress(_) | Error::Status { .. } | Error::Decode(_) => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<Error> for logstitch_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Status { status, body } => {
                logstitch_core::Error::Transport(TransportError::Status { status, body })
            }
            Error::Http(err) => logstitch_core::Error::Transport(TransportError::Network(
                err.to_string(),
            )),
            Error::InvalidAddress(msg) => {
                logstitch_core::Error::Transport(TransportError::Network(msg))
            }
            Error::Decode(msg) => logstitch_core::Error::MalformedPage(msg),
        }
    }
}
