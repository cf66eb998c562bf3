//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use printdash_config::ConfigError;
use printdash_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const HTTP: i32 = 5;
    pub const PARSE: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Fetch ────────────────────────────────────────────────────────

    #[error("Could not reach the add-on at {url}")]
    #[diagnostic(
        code(printdash::connection_failed),
        help(
            "Check that the add-on is running and the URL is right.\n\
             Reason: {reason}\n\
             Try: printdash --url http://<host>:8099 snapshot"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(printdash::timeout),
        help("Raise endpoint.timeout_secs or check the add-on's responsiveness.")
    )]
    Timeout,

    #[error("The add-on answered HTTP {status}")]
    #[diagnostic(
        code(printdash::http_status),
        help("The /devices endpoint rejected the request. Check the add-on logs.")
    )]
    Http { status: u16 },

    #[error("Malformed response: {message}")]
    #[diagnostic(
        code(printdash::parse),
        help("The /devices endpoint did not return JSON. Is --url pointing at the add-on?")
    )]
    Parse { message: String },

    // ── Columns ──────────────────────────────────────────────────────

    #[error("Column '{key}' is not configured")]
    #[diagnostic(
        code(printdash::unknown_column),
        help("Run: printdash columns list to see available columns")
    )]
    UnknownColumn { key: String },

    #[error("Could not save the column selection: {message}")]
    #[diagnostic(code(printdash::preferences))]
    Preferences { message: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(printdash::config),
        help("Inspect the effective settings with: printdash config show")
    )]
    Config(#[from] ConfigError),

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(printdash::validation))]
    Validation { field: String, reason: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    #[diagnostic(code(printdash::output))]
    Output(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Http { .. } => exit_code::HTTP,
            Self::Parse { .. } => exit_code::PARSE,
            Self::UnknownColumn { .. } => exit_code::NOT_FOUND,
            Self::Config(_) => exit_code::CONFIG,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Preferences { .. } | Self::Io(_) | Self::Output(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Request { status } => Self::Http { status },
            CoreError::Parse { message } => Self::Parse { message },
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::UnknownColumn { key } => Self::UnknownColumn { key },
            CoreError::Preferences { message } => Self::Preferences { message },
            CoreError::Config { message } => Self::Validation {
                field: "endpoint".into(),
                reason: message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failures_get_distinct_exit_codes() {
        let http = CliError::from(CoreError::Request { status: 500 });
        assert_eq!(http.exit_code(), exit_code::HTTP);
        assert_eq!(http.to_string(), "The add-on answered HTTP 500");

        assert_eq!(CliError::from(CoreError::Timeout).exit_code(), exit_code::TIMEOUT);
        assert_eq!(
            CliError::from(CoreError::UnknownColumn { key: "_x".into() }).exit_code(),
            exit_code::NOT_FOUND
        );
    }
}
