use std::fmt;

/// The feed as a whole could not be used. Distinct from an empty feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestFailure {
    /// The payload never arrived (network, HTTP status, unreadable file).
    Transport { detail: String },
    /// The body is not JSON.
    InvalidJson { detail: String },
    /// The payload says it failed.
    Declared { message: Option<String> },
    /// JSON, but not shaped like a feed.
    Malformed { detail: String },
}

impl IngestFailure {
    pub fn stage(&self) -> &'static str {
        match self {
            IngestFailure::Transport { .. } => "transport",
            IngestFailure::InvalidJson { .. } => "invalid_json",
            IngestFailure::Declared { .. } => "declared",
            IngestFailure::Malformed { .. } => "malformed",
        }
    }
}

impl fmt::Display for IngestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestFailure::Transport { detail } => write!(f, "feed fetch failed: {detail}"),
            IngestFailure::InvalidJson { detail } => {
                write!(f, "feed response is not valid JSON: {detail}")
            }
            IngestFailure::Declared { message: Some(message) } => {
                write!(f, "feed reported failure: {message}")
            }
            IngestFailure::Declared { message: None } => write!(f, "feed reported failure"),
            IngestFailure::Malformed { detail } => write!(f, "feed payload is malformed: {detail}"),
        }
    }
}

impl std::error::Error for IngestFailure {}
