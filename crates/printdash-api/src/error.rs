use thiserror::Error;

/// Top-level error type for the `printdash-api` crate.
///
/// `printdash-core` folds every variant into a single user-visible
/// "load failed" message, but keeps the kinds apart for logging.
#[derive(Debug, Error)]
pub enum Error {
    // ── Endpoint ────────────────────────────────────────────────────
    /// The endpoint answered with a non-success HTTP status.
    #[error("HTTP {status}")]
    Request { status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// The body was not valid JSON. Keeps the raw body for debugging.
    #[error("{message}")]
    Deserialization { message: String, body: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built (TLS backend, proxy settings).
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}
