use std::fmt;

/// Identifies this viewer's read position in the training process's telemetry stream.
///
/// Generated once when the client starts and kept for its whole lifetime. The training
/// process remembers, per id, which records it already handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u32);

impl SessionId {
    /// Creates a new random `SessionId`.
    pub fn generate() -> Self {
        Self(rand::random())
    }

    /// Wraps an existing raw id.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Telemetry path for this session.
    pub fn path(&self) -> String {
        format!("/{}", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether the last poll reached the training process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Searching,
    Connected,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Searching => "searching for training process",
            Self::Connected => "connected",
        }
    }
}
