//! Article listing and per-article view assembly.

use std::collections::HashMap;

use scholium_wikibase::{ItemId, QueryService};
use serde::Serialize;
use tracing::instrument;

use crate::annotations::{collect_annotations, AnnotationInfo, AnnotationSummary};
use crate::config::ReviewConfig;
use crate::error::Result;
use crate::partition::{claim_edges, partition, ClaimEdge, Partition};
use crate::queries::QuerySet;

const WIKIDATA_URL: &str = "https://wikidata.org";

/// One row of the article listing.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleInfo {
    pub title: String,
    pub page_id: String,
    pub item_id: ItemId,
}

/// List every article item the backend holds, one entry per result row.
/// Articles missing a page id or title come back with those fields empty
/// rather than being dropped.
#[instrument(skip(service, queries, config))]
pub async fn article_list(
    service: &dyn QueryService,
    queries: &QuerySet,
    config: &ReviewConfig,
) -> Result<Vec<ArticleInfo>> {
    let rows = service.run_query(queries.article_list()).await?;

    Ok(rows
        .iter()
        .map(|row| ArticleInfo {
            title: row.value("article_text_title").to_string(),
            page_id: row.value("page_ID").to_string(),
            item_id: ItemId::from_uri(row.value("res"), &config.entity_prefix),
        })
        .collect())
}

/// All property/value pairs the backend holds for one item, keyed by
/// direct-property URI. Rows with an empty property or value are dropped;
/// a property bound to several values keeps the last row's value.
#[instrument(skip(service, queries))]
pub async fn article_properties(
    service: &dyn QueryService,
    queries: &QuerySet,
    article_id: &ItemId,
) -> Result<HashMap<String, String>> {
    let rows = service.run_query(&queries.item_properties(article_id)).await?;

    let mut properties = HashMap::with_capacity(rows.len());
    for row in &rows {
        let property = row.value("propUrl");
        let value = row.value("valUrl");
        if !property.is_empty() && !value.is_empty() {
            properties.insert(property.to_string(), value.to_string());
        }
    }

    Ok(properties)
}

/// Everything the review screen needs for one article.
#[derive(Debug, Serialize)]
pub struct ArticleView {
    pub item_id: ItemId,
    pub title: String,
    pub page_id: String,
    pub wikidata_id: String,
    /// The article's wiki page, via its MediaWiki page id.
    pub article_page_url: String,
    /// The article's item page on the local wiki.
    pub item_page_url: String,
    /// The upstream Wikidata page for the article.
    pub wikidata_page_url: String,
    pub annotations: Vec<AnnotationInfo>,
    pub summaries: HashMap<String, AnnotationSummary>,
}

/// Load one article: its mapped properties, page links, and the aggregated
/// annotation set. Properties the backend lacks leave their field empty;
/// the page links are still built, pointing at the wiki's error pages.
#[instrument(skip(service, queries, config))]
pub async fn load_article(
    service: &dyn QueryService,
    queries: &QuerySet,
    config: &ReviewConfig,
    article_id: &ItemId,
) -> Result<ArticleView> {
    let properties = article_properties(service, queries, article_id).await?;

    let lookup = |property: &str| -> String {
        properties
            .get(&config.direct_property_uri(property))
            .cloned()
            .unwrap_or_default()
    };
    let title = lookup(&config.properties.title);
    let page_id = lookup(&config.properties.pageid);
    let wikidata_id = lookup(&config.properties.wikidataid);

    let rows = service.run_query(&queries.annotation_list(article_id)).await?;
    let (annotations, summaries) = collect_annotations(&rows, &config.entity_prefix);

    Ok(ArticleView {
        article_page_url: format!("{}/?curid={}", config.wikibase_url, page_id),
        item_page_url: format!("{}/wiki/item:{}", config.wikibase_url, article_id),
        wikidata_page_url: format!("{}/wiki/item:{}", WIKIDATA_URL, wikidata_id),
        item_id: article_id.clone(),
        title,
        page_id,
        wikidata_id,
        annotations,
        summaries,
    })
}

impl ArticleView {
    /// Drug/disease split of the annotation set, default heuristic.
    pub fn partition(&self) -> Partition<'_> {
        partition(&self.annotations)
    }

    /// Stored claim references joined to their target annotations.
    pub fn claim_edges(&self) -> Vec<ClaimEdge<'_>> {
        claim_edges(&self.annotations)
    }

    /// Embeddable co-occurrence graph URL. `None` unless both partitions
    /// carry a non-empty dictionary label, matching the graph query's need
    /// for one label per side.
    pub fn graph_embed_url(&self, queries: &QuerySet, config: &ReviewConfig) -> Option<String> {
        let (disease_dict, drug_dict) = self.partition().dictionary_labels()?;
        Some(queries.graph_embed_url(
            &config.query_service_embed_url,
            &self.item_id,
            disease_dict,
            drug_dict,
        ))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use scholium_wikibase::{SparqlRow, WikibaseError};
    use serde_json::json;

    use super::*;
    use crate::properties::test_map;

    struct FixedRows(Vec<SparqlRow>);

    #[async_trait]
    impl QueryService for FixedRows {
        async fn run_query(&self, _query: &str) -> scholium_wikibase::Result<Vec<SparqlRow>> {
            Ok(self.0.clone())
        }
    }

    struct FailingService;

    #[async_trait]
    impl QueryService for FailingService {
        async fn run_query(&self, _query: &str) -> scholium_wikibase::Result<Vec<SparqlRow>> {
            Err(WikibaseError::Service {
                status: 502,
                body: "bad gateway".to_string(),
            })
        }
    }

    fn config() -> ReviewConfig {
        ReviewConfig {
            wikibase_url: "http://wikibase.svc".to_string(),
            query_service_url: "http://wikibase.svc/sparql".to_string(),
            query_service_embed_url: "http://wikibase.svc/embed.html#".to_string(),
            entity_prefix: "http://wikibase.svc/entity/".to_string(),
            property_prefix: "http://wikibase.svc/prop/direct/".to_string(),
            properties: test_map(),
        }
    }

    fn article_row(item: &str, page_id: Option<&str>, title: Option<&str>) -> SparqlRow {
        let mut fields = json!({
            "res": { "type": "uri", "value": format!("http://wikibase.svc/entity/{item}") }
        });
        if let Some(page_id) = page_id {
            fields["page_ID"] = json!({ "type": "literal", "value": page_id });
        }
        if let Some(title) = title {
            fields["article_text_title"] = json!({ "type": "literal", "value": title });
        }
        serde_json::from_value(fields).unwrap()
    }

    fn property_row(property: &str, value: &str) -> SparqlRow {
        serde_json::from_value(json!({
            "propUrl": { "type": "uri", "value": property },
            "valUrl": { "type": "literal", "value": value }
        }))
        .unwrap()
    }

    #[test]
    fn test_article_list_maps_rows() {
        let service = FixedRows(vec![
            article_row("Q117", Some("12"), Some("Vitamin D and health")),
            article_row("Q118", None, None),
        ]);
        let config = config();
        let queries = config.query_set().unwrap();

        let articles =
            tokio_test::block_on(article_list(&service, &queries, &config)).unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].item_id, ItemId::new("Q117"));
        assert_eq!(articles[0].page_id, "12");
        assert_eq!(articles[0].title, "Vitamin D and health");
        assert_eq!(articles[1].item_id, ItemId::new("Q118"));
        assert_eq!(articles[1].page_id, "");
        assert_eq!(articles[1].title, "");
    }

    #[test]
    fn test_article_properties_skips_incomplete_rows() {
        let service = FixedRows(vec![
            property_row("http://wikibase.svc/prop/direct/P4", "Vitamin D and health"),
            property_row("", "orphan value"),
            property_row("http://wikibase.svc/prop/direct/P12", ""),
        ]);
        let config = config();
        let queries = config.query_set().unwrap();

        let properties = tokio_test::block_on(article_properties(
            &service,
            &queries,
            &ItemId::new("Q117"),
        ))
        .unwrap();

        assert_eq!(properties.len(), 1);
        assert_eq!(
            properties["http://wikibase.svc/prop/direct/P4"],
            "Vitamin D and health"
        );
    }

    #[test]
    fn test_query_failure_propagates() {
        let config = config();
        let queries = config.query_set().unwrap();

        let result = tokio_test::block_on(article_list(&FailingService, &queries, &config));
        assert!(result.is_err());
    }
}
