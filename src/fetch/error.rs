// src/fetch/error.rs
use std::{error::Error, fmt, time::Duration};

/// Why a sheet could not be retrieved. Row and field problems never end
/// up here; they are absorbed by the tokenizer and mappers.
#[derive(Debug)]
pub enum FetchError {
    /// The server answered with a non-success status.
    Status { status: u16, message: String },
    /// Connection, TLS or body read failure.
    Transport(reqwest::Error),
    /// No complete response within the configured limit.
    Timeout(Duration),
    /// The caller cancelled the fetch.
    Cancelled,
}

impl FetchError {
    /// HTTP status, when the server got as far as answering.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status { status, message } => write!(f, "HTTP {} {}", status, message),
            FetchError::Transport(e) => write!(f, "transport error: {}", e),
            FetchError::Timeout(limit) => write!(f, "timed out after {:?}", limit),
            FetchError::Cancelled => f.write_str("cancelled"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FetchError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e)
    }
}
