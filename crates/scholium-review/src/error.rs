//! Error types for the review engine.

use scholium_wikibase::{ItemId, WikibaseError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReviewError>;

#[derive(Error, Debug)]
pub enum ReviewError {
    /// A query or write round-trip failed on the backend side.
    #[error("backend request failed: {0}")]
    Backend(#[from] WikibaseError),

    /// A review submission named an annotation id that is not in the
    /// article's current annotation set. Stale and hand-edited form data
    /// land here; it must never reach the claim writer.
    #[error("no annotation {0} in the current annotation set")]
    MissingAnnotation(ItemId),

    /// A query template still carried `{name}` holes after property
    /// resolution. Raised once at startup, never per request.
    #[error("unresolved query placeholder {{{name}}}")]
    UnresolvedPlaceholder { name: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ReviewError {
    /// True when the failure was caused by the submitted request rather
    /// than the backend or the deployment. Callers serving HTTP map these
    /// to 4xx and everything else to 5xx.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ReviewError::MissingAnnotation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_annotation_is_client_error() {
        let error = ReviewError::MissingAnnotation(ItemId::new("Q999"));
        assert!(error.is_client_error());
        assert_eq!(
            error.to_string(),
            "no annotation Q999 in the current annotation set"
        );
    }

    #[test]
    fn test_backend_and_config_errors_are_server_side() {
        let backend = ReviewError::Backend(WikibaseError::Token);
        assert!(!backend.is_client_error());

        let config = ReviewError::Config("no property map".to_string());
        assert!(!config.is_client_error());
    }

    #[test]
    fn test_unresolved_placeholder_names_the_hole() {
        let error = ReviewError::UnresolvedPlaceholder {
            name: "anchorin".to_string(),
        };
        assert_eq!(error.to_string(), "unresolved query placeholder {anchorin}");
    }
}
