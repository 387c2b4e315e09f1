//! Real-time channel error types.

use std::path::PathBuf;

use thiserror::Error;

/// Transport-level failures. Surfaced to the listener, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The endpoint is not a usable `ws`/`wss` URL.
    #[error("invalid endpoint '{url}': {reason}")]
    InvalidUrl {
        /// Endpoint as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The connection could not be established.
    #[error("connect failed: {0}")]
    Connect(String),
    /// The peer violated the protocol or the stream broke.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// The stream ended without a close handshake.
    #[error("connection closed without a close frame")]
    Closed,
}

/// Errors decoding an inbound frame.
#[derive(Debug, Error)]
pub enum WireError {
    /// Not valid JSON, or the wrong shape.
    #[error("malformed frame: {0}")]
    Json(#[from] serde_json::Error),
    /// The event name is not one the channel handles.
    #[error("unknown event '{0}'")]
    UnknownEvent(String),
    /// The event name carries no mapping id.
    #[error("event '{0}' has no mapping id")]
    MissingMappingId(String),
}

/// Errors reading data-layer files.
#[derive(Debug, Error)]
pub enum DataError {
    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON of the expected shape.
    #[error("failed to parse {path}: {source}")]
    Json {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_display() {
        assert_eq!(
            TransportError::Connect("refused".into()).to_string(),
            "connect failed: refused"
        );
        assert!(
            TransportError::InvalidUrl {
                url: "http://x".into(),
                reason: "scheme".into(),
            }
            .to_string()
            .contains("http://x")
        );
    }

    #[test]
    fn wire_error_from_json() {
        let err: WireError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, WireError::Json(_)));
    }

    #[test]
    fn data_error_names_path() {
        let err = DataError::Io {
            path: PathBuf::from("/data/distribution.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/data/distribution.json"));
    }
}
