use std::fmt;

/// Result type for logstitch-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that abort an export
#[derive(Debug)]
pub enum Error {
    /// The page fetcher could not retrieve a page
    Transport(TransportError),

    /// A page broke the fetcher contract (ordering, bounds, size, structure)
    MalformedPage(String),

    /// The sink could not persist a record
    Sink(SinkError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(err) => write!(f, "Transport error: {}", err),
            Error::MalformedPage(msg) => write!(f, "Malformed page: {}", msg),
            Error::Sink(err) => write!(f, "Sink error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transport(err) => Some(err),
            Error::Sink(err) => Some(err),
            Error::MalformedPage(_) => None,
        }
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Error::Transport(err)
    }
}

impl From<SinkError> for Error {
    fn from(err: SinkError) -> Self {
        Error::Sink(err)
    }
}

impl From<logstitch_types::Error> for Error {
    fn from(err: logstitch_types::Error) -> Self {
        Error::MalformedPage(err.to_string())
    }
}

/// Failure to obtain a page: a non-success status or a network-level error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The remote answered with a non-2xx status
    Status { status: u16, body: String },

    /// The request never produced a usable response
    Network(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Status { status, body } if body.is_empty() => {
                write!(f, "status {}", status)
            }
            TransportError::Status { status, body } => write!(f, "status {} {}", status, body),
            TransportError::Network(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// Failure to persist an emitted record.
#[derive(Debug)]
pub struct SinkError {
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {}", self.message, source),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        SinkError::with_source("write failed", err)
    }
}
