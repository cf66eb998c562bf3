// ── Core error types ──
//
// Errors surfaced by the dashboard controller. The `From<printdash_api::Error>`
// impl folds transport-layer failures into the two user-facing kinds
// (request / parse) plus connectivity. Hosts show all of them the same way:
// the localized "load failed" prefix followed by the Display text.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Fetch errors ─────────────────────────────────────────────────
    /// Non-success HTTP status from the telemetry endpoint.
    #[error("HTTP {status}")]
    Request { status: u16 },

    /// The response body was not valid JSON.
    #[error("{message}")]
    Parse { message: String },

    #[error("cannot reach {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("request timed out")]
    Timeout,

    // ── Visibility errors ────────────────────────────────────────────
    #[error("unknown column: {key}")]
    UnknownColumn { key: String },

    // ── Storage / configuration ──────────────────────────────────────
    #[error("preference store error: {message}")]
    Preferences { message: String },

    #[error("configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` for the failure kinds a refresh cycle can produce.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Request { .. } | Self::Parse { .. } | Self::ConnectionFailed { .. } | Self::Timeout
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

/// Causes below a transport error, joined with `: `. The top-level message
/// already names the URL, which `ConnectionFailed` prints itself.
fn source_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    if parts.is_empty() {
        "connection failed".to_owned()
    } else {
        parts.join(": ")
    }
}

impl From<printdash_api::Error> for CoreError {
    fn from(err: printdash_api::Error) -> Self {
        match err {
            printdash_api::Error::Request { status } => CoreError::Request { status },
            printdash_api::Error::Deserialization { message, body: _ } => {
                CoreError::Parse { message }
            }
            printdash_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if let Some(status) = e.status() {
                    CoreError::Request {
                        status: status.as_u16(),
                    }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: source_chain(e),
                    }
                }
            }
            printdash_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            printdash_api::Error::Client(message) => CoreError::Config { message },
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Preferences {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_status_survives_conversion() {
        let err: CoreError = printdash_api::Error::Request { status: 500 }.into();
        assert!(matches!(err, CoreError::Request { status: 500 }));
        assert_eq!(err.to_string(), "HTTP 500");
        assert!(err.is_fetch_error());
    }

    #[test]
    fn parse_error_keeps_decoder_message() {
        let err: CoreError = printdash_api::Error::Deserialization {
            message: "expected value at line 1 column 1".into(),
            body: "oops".into(),
        }
        .into();
        assert_eq!(err.to_string(), "expected value at line 1 column 1");
    }

    #[test]
    fn unknown_column_is_not_a_fetch_error() {
        let err = CoreError::UnknownColumn { key: "_nope".into() };
        assert!(!err.is_fetch_error());
    }
}
