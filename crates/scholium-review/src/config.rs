//! Deployment configuration.
//!
//! One file describes a deployment: the wiki and query-service endpoints,
//! the URI prefixes its entities and properties live under, and the
//! property map binding abstract names to that deployment's ids. TOML is
//! the native format; JSON is accepted too since deployment tooling tends
//! to template JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, ReviewError};
use crate::properties::{PropertyMap, PROPERTY_NAMES};
use crate::queries::QuerySet;

pub const CONFIG_PATH_ENV: &str = "SCHOLIUM_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "scholium.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Base URL of the wiki, used for page links and the write API.
    pub wikibase_url: String,
    /// SPARQL endpoint for listings and annotation queries.
    pub query_service_url: String,
    /// Public embed frontend the graph query link points into.
    pub query_service_embed_url: String,
    /// Prefix stripped from entity URIs to obtain bare ids.
    pub entity_prefix: String,
    /// Prefix prepended to property ids to match direct-property URIs.
    pub property_prefix: String,
    pub properties: PropertyMap,
}

impl ReviewConfig {
    /// Read the config from `$SCHOLIUM_CONFIG`, falling back to
    /// `scholium.toml` in the working directory. The property map is
    /// validated as part of loading, so a misconfigured deployment stops
    /// here and not mid-request.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "config file {} not found; set {} or copy scholium.example.toml",
                path.display(),
                CONFIG_PATH_ENV
            );
        }

        let raw = std::fs::read_to_string(path)?;
        let config = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&raw)?
        } else {
            Self::from_toml_str(&raw)?
        };

        config.query_set()?;
        info!(path = %path.display(), "loaded review configuration");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Resolve the query templates against this deployment's property map.
    pub fn query_set(&self) -> Result<QuerySet> {
        for name in PROPERTY_NAMES {
            match self.properties.get(name) {
                Some(id) if !id.is_empty() => {}
                _ => {
                    return Err(ReviewError::Config(format!(
                        "property map entry {name} is empty"
                    )))
                }
            }
        }
        QuerySet::resolve(&self.properties)
    }

    /// Direct-property URI for a mapped property id, as the item property
    /// query returns them.
    pub fn direct_property_uri(&self, property: &str) -> String {
        format!("{}{}", self.property_prefix, property)
    }
}
