//! Error handling and custom error types
//!
//! Every failure the proxy can hit falls into one of a small, closed set of
//! kinds. The wire envelope only carries the message; the kind is kept for
//! logging and for callers that want to branch on it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid request: {0}")]
    Input(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to generate image: {status} {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("Invalid image service response: {0}")]
    UpstreamPayload(String),

    /// Failure envelope returned by the proxy endpoint, message kept verbatim.
    /// The proxy only sends one after a failed upstream call.
    #[error("{0}")]
    Proxy(String),

    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Config,
    UpstreamHttp,
    UpstreamPayload,
    Transport,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Input(_) => ErrorKind::Input,
            Error::Config(_) => ErrorKind::Config,
            Error::UpstreamHttp { .. } | Error::Proxy(_) => ErrorKind::UpstreamHttp,
            Error::UpstreamPayload(_) => ErrorKind::UpstreamPayload,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Renders the chain of underlying causes, if there is one.
    pub fn details(&self) -> Option<String> {
        let mut causes = Vec::new();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        if causes.is_empty() {
            None
        } else {
            Some(format!("caused by: {}", causes.join(": ")))
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_http_message_has_status_and_body() {
        let err = Error::UpstreamHttp {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to generate image: 503 overloaded");
        assert_eq!(err.kind(), ErrorKind::UpstreamHttp);
        assert!(err.details().is_none());
    }

    #[test]
    fn test_proxy_message_is_verbatim() {
        let err = Error::Proxy("model is warming up".to_string());
        assert_eq!(err.to_string(), "model is warming up");
    }

    #[test]
    fn test_io_error_reports_cause() {
        let err = Error::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.details().as_deref(), Some("caused by: read-only"));
    }
}
