//! Error types for the request builder chain.
//!
//! # Design
//! Validation failures (`BadMethod`, `BadUrl`, `Serialization`) are detected
//! before anything touches the network. `Transport` and `BodyRead` both wrap
//! `ureq::Error` but are kept apart because a `BodyRead` means the server
//! did answer and the connection broke while the body was streaming in.

/// Errors returned by `ReadyRequest::execute`.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The method is neither `GET` nor `POST`.
    #[error("bad method: {0:?}")]
    BadMethod(String),

    /// The URL is empty or is not a syntactically valid absolute URL.
    #[error("bad url {url:?}: {reason}")]
    BadUrl { url: String, reason: String },

    /// DNS, connect, TLS, reset or timeout failure from the HTTP stack.
    #[error("transport failed: {0}")]
    Transport(#[source] ureq::Error),

    /// The response arrived but its body could not be read to the end.
    #[error("reading response body failed: {0}")]
    BodyRead(#[source] ureq::Error),

    /// A structured body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl RequestError {
    /// `true` when the HTTP stack gave up because a deadline passed.
    pub fn is_timeout(&self) -> bool {
        match self {
            RequestError::Transport(e) | RequestError::BodyRead(e) => is_timeout(e),
            _ => false,
        }
    }
}

fn is_timeout(error: &ureq::Error) -> bool {
    match error {
        ureq::Error::Timeout(_) => true,
        ureq::Error::Io(io) => matches!(
            io.kind(),
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
        ),
        _ => false,
    }
}
