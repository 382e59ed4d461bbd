use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// The controller could not be reached (DNS, refused, unreachable).
    Connection(reqwest::Error),
    /// No complete response within the configured timeout.
    Timeout,
    /// The controller answered with a non-2xx status.
    Protocol { method: String, status: u16 },
    /// The response body was not JSON, or not the expected shape.
    Decode { method: String, reason: String },
    Http(reqwest::Error),
    UnknownGroup(u16),
    AlreadyConfigured(String),
    DuplicateEntry(String),
}

impl Error {
    pub(crate) fn decode(method: &str, reason: impl Into<String>) -> Self {
        Error::Decode {
            method: method.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(e) => write!(f, "connection error: {e}"),
            Error::Timeout => write!(f, "request timed out"),
            Error::Protocol { method, status } => {
                write!(f, "protocol error: {method} returned HTTP {status}")
            }
            Error::Decode { method, reason } => {
                write!(f, "decode error in {method} response: {reason}")
            }
            Error::Http(e) => write!(f, "HTTP error: {e}"),
            Error::UnknownGroup(n) => write!(f, "unknown group: {n}"),
            Error::AlreadyConfigured(id) => write!(f, "controller already configured: {id}"),
            Error::DuplicateEntry(entry) => write!(f, "entry id already in use: {entry}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Connection(e) | Error::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout
        } else if e.is_connect() {
            Error::Connection(e)
        } else {
            Error::Http(e)
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
