//! SPARQL query service client.
//!
//! Speaks the SPARQL 1.1 JSON results format. All queries go through a
//! single GET endpoint with `query` and `format=json` parameters, which is
//! what both Blazegraph and the WDQS proxy in front of it accept.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{Result, WikibaseError};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// One variable binding in a result row.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlValue {
    /// Binding kind reported by the service, `uri` or `literal`.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub datatype: Option<String>,
    #[serde(rename = "xml:lang", default)]
    pub lang: Option<String>,
}

/// One result row, keyed by variable name.
///
/// Variables left unbound by an OPTIONAL clause are absent from the map;
/// [`SparqlRow::value`] reads those as the empty string so row consumers
/// never have to branch on presence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SparqlRow(HashMap<String, SparqlValue>);

impl SparqlRow {
    /// The bound value of `variable`, or `""` when unbound.
    pub fn value(&self, variable: &str) -> &str {
        self.0.get(variable).map(|v| v.value.as_str()).unwrap_or("")
    }

    pub fn get(&self, variable: &str) -> Option<&SparqlValue> {
        self.0.get(variable)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub bindings: Vec<SparqlRow>,
}

/// Top-level SPARQL 1.1 JSON results document.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResponse {
    pub head: SparqlHead,
    pub results: SparqlResults,
}

impl SparqlResponse {
    pub fn into_rows(self) -> Vec<SparqlRow> {
        self.results.bindings
    }
}

/// Anything that can answer a SPARQL query.
///
/// The engine only ever needs this trait; [`SparqlClient`] is the network
/// implementation and tests provide canned ones.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Run one query and return its result rows in service order.
    async fn run_query(&self, query: &str) -> Result<Vec<SparqlRow>>;
}

/// reqwest-backed [`QueryService`].
#[derive(Debug, Clone)]
pub struct SparqlClient {
    client: Client,
    endpoint: String,
}

impl SparqlClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl QueryService for SparqlClient {
    #[instrument(skip(self, query))]
    async fn run_query(&self, query: &str) -> Result<Vec<SparqlRow>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query), ("format", "json")])
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

        let parsed: SparqlResponse = response.json().await?;
        debug!(rows = parsed.results.bindings.len(), "query service answered");
        Ok(parsed.into_rows())
    }
}
