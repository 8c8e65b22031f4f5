//! Claim writes against the MediaWiki action API.
//!
//! Confirmed review decisions become `wbcreateclaim` calls. Every write
//! fetches a fresh CSRF editing token first; the access credential itself
//! is opaque here, handed in by whoever owns the login flow.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Result, WikibaseError};
use crate::ids::ItemId;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Anything that can record a confirmed claim on the backend.
///
/// One attempt per call, no retries; failures surface to the caller
/// unchanged.
#[async_trait]
pub trait ClaimWriter: Send + Sync {
    /// Create the statement `subject -property-> object`.
    async fn write_claim(&self, subject: &ItemId, property: &str, object: &ItemId) -> Result<()>;
}

/// Snak value for an item-type claim, serialized into the `value` form
/// field of `wbcreateclaim`.
#[derive(Debug, Serialize)]
pub struct ItemClaimValue<'a> {
    #[serde(rename = "entity-type")]
    pub entity_type: &'static str,
    pub id: &'a str,
}

impl<'a> ItemClaimValue<'a> {
    pub fn new(target: &'a ItemId) -> Self {
        Self {
            entity_type: "item",
            id: target.as_str(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    info: String,
}

#[derive(Debug, Deserialize)]
struct WriteEnvelope {
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct TokenData {
    csrftoken: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    tokens: TokenData,
}

#[derive(Debug, Deserialize)]
struct TokenEnvelope {
    query: Option<TokenQuery>,
    error: Option<ApiError>,
}

/// [`ClaimWriter`] backed by a wiki's `api.php`.
#[derive(Debug, Clone)]
pub struct WikibaseClient {
    client: Client,
    api_url: String,
    access_token: SecretString,
}

impl WikibaseClient {
    /// `wikibase_url` is the wiki base, e.g. `http://wikibase.svc`; the
    /// action API is assumed at `/w/api.php` under it.
    pub fn new(wikibase_url: &str, access_token: SecretString) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_url: format!("{}/w/api.php", wikibase_url.trim_end_matches('/')),
            access_token,
        })
    }

    /// Fetch a CSRF editing token. Tokens are single-purpose and cheap, so
    /// there is no caching; each write gets its own.
    #[instrument(skip(self))]
    async fn editing_token(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.api_url)
            .bearer_auth(self.access_token.expose_secret())
            .query(&[
                ("action", "query"),
                ("meta", "tokens"),
                ("type", "csrf"),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WikibaseError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: TokenEnvelope = serde_json::from_str(&response.text().await?)?;
        if let Some(error) = envelope.error {
            return Err(WikibaseError::Api {
                code: error.code,
                info: error.info,
            });
        }

        envelope
            .query
            .and_then(|query| query.tokens.csrftoken)
            .ok_or(WikibaseError::Token)
    }
}

#[async_trait]
impl ClaimWriter for WikibaseClient {
    #[instrument(skip(self))]
    async fn write_claim(&self, subject: &ItemId, property: &str, object: &ItemId) -> Result<()> {
        let token = self.editing_token().await?;
        let value = serde_json::to_string(&ItemClaimValue::new(object))?;

        let params = [
            ("action", "wbcreateclaim"),
            ("format", "json"),
            ("entity", subject.as_str()),
            ("property", property),
            ("snaktype", "value"),
            ("value", value.as_str()),
            ("token", token.as_str()),
        ];

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(self.access_token.expose_secret())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WikibaseError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: WriteEnvelope = serde_json::from_str(&response.text().await?)?;
        if let Some(error) = envelope.error {
            return Err(WikibaseError::Api {
                code: error.code,
                info: error.info,
            });
        }

        debug!(subject = %subject, object = %object, "claim recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_item_claim_value_shape() {
        let target = ItemId::new("Q146");
        let value = serde_json::to_string(&ItemClaimValue::new(&target)).unwrap();
        assert_eq!(value, r#"{"entity-type":"item","id":"Q146"}"#);
    }

    #[test]
    fn test_decodes_token_envelope() {
        let body = r#"{
            "batchcomplete": "",
            "query": { "tokens": { "csrftoken": "8217b65401028a6d46b58c9b71e6ba5b+\\" } }
        }"#;
        let envelope: TokenEnvelope = serde_json::from_str(body).unwrap();
        let token = envelope.query.unwrap().tokens.csrftoken.unwrap();
        assert_eq!(token, "8217b65401028a6d46b58c9b71e6ba5b+\\");
    }

    #[test]
    fn test_decodes_api_error_envelope() {
        let body = r#"{
            "error": { "code": "no-such-entity", "info": "Could not find an entity with the ID \"Q999\"." },
            "servedby": "mw1"
        }"#;
        let envelope: WriteEnvelope = serde_json::from_str(body).unwrap();
        let error = envelope.error.unwrap();
        assert_eq!(error.code, "no-such-entity");
        assert!(error.info.contains("Q999"));
    }

    #[test]
    fn test_missing_token_maps_to_token_error() {
        let body = r#"{ "query": { "tokens": {} } }"#;
        let envelope: TokenEnvelope = serde_json::from_str(body).unwrap();
        assert!(envelope.query.unwrap().tokens.csrftoken.is_none());
    }
}
