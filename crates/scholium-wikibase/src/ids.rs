//! Opaque Wikibase entity identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque entity id such as `Q117` or `P22`.
///
/// Anchors, annotations, articles and claim targets all use the same id
/// space, so one type covers them. Ids are compared and hashed by their
/// text; nothing here ever parses the numeric part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build an id from a full entity URI by stripping the deployment's
    /// entity prefix. A value that does not carry the prefix is kept as-is,
    /// so already-bare ids pass through unchanged.
    pub fn from_uri(uri: &str, entity_prefix: &str) -> Self {
        Self(uri.strip_prefix(entity_prefix).unwrap_or(uri).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_from_uri_strips_entity_prefix() {
        let id = ItemId::from_uri("http://wikibase.svc/entity/Q117", "http://wikibase.svc/entity/");
        assert_eq!(id.as_str(), "Q117");
    }

    #[test]
    fn test_from_uri_keeps_bare_id() {
        let id = ItemId::from_uri("Q117", "http://wikibase.svc/entity/");
        assert_eq!(id.as_str(), "Q117");
    }

    #[test]
    fn test_from_uri_ignores_unrelated_prefix() {
        let id = ItemId::from_uri("http://other.example/entity/Q9", "http://wikibase.svc/entity/");
        assert_eq!(id.as_str(), "http://other.example/entity/Q9");
    }

    #[test]
    fn test_display_and_equality() {
        let a = ItemId::new("Q7");
        let b = ItemId::from("Q7");
        assert_eq!(a, b);
        assert_eq!(format!("wd:{a}"), "wd:Q7");
    }

    #[test]
    fn test_serde_is_transparent() {
        let id: ItemId = serde_json::from_str("\"Q42\"").unwrap();
        assert_eq!(id, ItemId::new("Q42"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"Q42\"");
    }
}
