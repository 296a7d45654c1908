use std::{error::Error, fmt, io};

/// The monitor's result type.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// All errors that can occur while talking to the training process.
#[derive(Debug)]
pub enum MonitorError {
    /// The request never produced a response: connection refused, reset or timed out.
    Transport(reqwest::Error),
    /// The training process answered with something other than `200 OK`.
    Protocol { path: String, status: u16 },
    /// The response body is not the JSON document we expected.
    Decode {
        path: String,
        source: serde_json::Error,
    },
    /// Invalid configuration, caught before the first request.
    InvalidConfig(String),
    /// An underlying I/O error not covered by the above variants.
    Io(io::Error),
}

impl MonitorError {
    /// Short, human readable failure class used in status lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Protocol { .. } => "protocol",
            Self::Decode { .. } => "decode",
            Self::InvalidConfig(_) => "config",
            Self::Io(_) => "io",
        }
    }
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport failure: {e}"),
            Self::Protocol { path, status } => {
                write!(f, "GET {path} answered with status {status}")
            }
            Self::Decode { path, source } => {
                write!(f, "malformed body from GET {path}: {source}")
            }
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for MonitorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Decode { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MonitorError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e)
    }
}

impl From<io::Error> for MonitorError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
