//! Error types for the Wikibase boundary.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WikibaseError>;

#[derive(Error, Debug)]
pub enum WikibaseError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered, but not with 2xx. The body is kept verbatim
    /// since Blazegraph puts the useful detail there.
    #[error("service returned status {status}: {body}")]
    Service { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Json(#[from] serde_json::Error),

    /// A structured error from the action API envelope.
    #[error("API error {code}: {info}")]
    Api { code: String, info: String },

    #[error("no CSRF token in token response")]
    Token,
}
