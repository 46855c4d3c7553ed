//! Error types for `RequestClient`.
//!
//! # Design
//! One variant per failure kind, each carrying the HTTP method and the path
//! argument of the failed call. Messages start with
//! `"simplehttp: {METHOD} {path}: "` followed by a fixed phrase per kind, so
//! log lines stay greppable. Callers
//! that need to branch should match on `kind()` rather than on message text.

use thiserror::Error;

use crate::http::HttpMethod;

/// The category of a `RequestError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No transport handle is configured; nothing was sent.
    Configuration,
    /// The body-field mapping could not be encoded as JSON.
    Serialization,
    /// The URL, method or a header does not form a valid request.
    RequestConstruction,
    /// Network, TLS, timeout or redirect-limit failure.
    Transport,
    /// The response body could not be read to completion.
    ResponseRead,
}

/// Errors returned by `RequestClient::send` and the verb methods.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The client has no transport handle.
    #[error("simplehttp: {method} {path}: http client is nil")]
    NotConfigured { method: HttpMethod, path: String },

    #[error("simplehttp: {method} {path}: marshaling request data: {source}")]
    Serialization {
        method: HttpMethod,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("simplehttp: {method} {path}: creating request: {reason}")]
    RequestConstruction {
        method: HttpMethod,
        path: String,
        reason: String,
    },

    #[error("simplehttp: {method} {path}: transport: {source}")]
    Transport {
        method: HttpMethod,
        path: String,
        #[source]
        source: ureq::Error,
    },

    #[error("simplehttp: {method} {path}: reading response body: {source}")]
    ResponseRead {
        method: HttpMethod,
        path: String,
        #[source]
        source: ureq::Error,
    },
}

impl RequestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RequestError::NotConfigured { .. } => ErrorKind::Configuration,
            RequestError::Serialization { .. } => ErrorKind::Serialization,
            RequestError::RequestConstruction { .. } => ErrorKind::RequestConstruction,
            RequestError::Transport { .. } => ErrorKind::Transport,
            RequestError::ResponseRead { .. } => ErrorKind::ResponseRead,
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            RequestError::NotConfigured { method, .. }
            | RequestError::Serialization { method, .. }
            | RequestError::RequestConstruction { method, .. }
            | RequestError::Transport { method, .. }
            | RequestError::ResponseRead { method, .. } => *method,
        }
    }

    /// The path argument of the failed call, as given by the caller.
    pub fn path(&self) -> &str {
        match self {
            RequestError::NotConfigured { path, .. }
            | RequestError::Serialization { path, .. }
            | RequestError::RequestConstruction { path, .. }
            | RequestError::Transport { path, .. }
            | RequestError::ResponseRead { path, .. } => path,
        }
    }

    /// True when the transport gave up because its timeout elapsed, either
    /// before a response arrived or while its body was being read.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            RequestError::Transport {
                source: ureq::Error::Timeout(_),
                ..
            } | RequestError::ResponseRead {
                source: ureq::Error::Timeout(_),
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_configured_display() {
        let err = RequestError::NotConfigured {
            method: HttpMethod::Get,
            path: "/".to_string(),
        };
        assert_eq!(err.to_string(), "simplehttp: GET /: http client is nil");
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.method(), HttpMethod::Get);
        assert_eq!(err.path(), "/");
        assert!(!err.is_timeout());
    }

    #[test]
    fn request_construction_display() {
        let err = RequestError::RequestConstruction {
            method: HttpMethod::Patch,
            path: "/items".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "simplehttp: PATCH /items: creating request: relative URL without a base"
        );
        assert_eq!(err.kind(), ErrorKind::RequestConstruction);
    }

    #[test]
    fn serialization_keeps_source() {
        let source = serde_json::from_str::<String>("not json").unwrap_err();
        let err = RequestError::Serialization {
            method: HttpMethod::Post,
            path: "/echo".to_string(),
            source,
        };
        assert!(err
            .to_string()
            .starts_with("simplehttp: POST /echo: marshaling request data: "));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }

    #[test]
    fn transport_kind() {
        let err = RequestError::Transport {
            method: HttpMethod::Delete,
            path: "/loop".to_string(),
            source: ureq::Error::TooManyRedirects,
        };
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().starts_with("simplehttp: DELETE /loop: transport: "));
    }
}
