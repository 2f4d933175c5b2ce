use thiserror::Error;

/// Top-level error type for the `cfban-api` crate.
///
/// Only transport-level failures live here. A well-formed provider response
/// with `success: false` is not an error at this layer; it decodes into
/// [`Outcome::Failure`](crate::Outcome::Failure).
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// The API token cannot be sent as a header value.
    #[error("API token contains characters that are not valid in an HTTP header")]
    InvalidToken,

    // ── Data ────────────────────────────────────────────────────────
    /// Request payload could not be encoded as JSON.
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the request never produced a readable response.
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}
