//! Query templates and per-request query construction.
//!
//! Templates carry two kinds of holes. `{name}` property placeholders are
//! bound once at startup from the deployment's [`PropertyMap`]; `$slot`
//! value slots are filled per request, and every occurrence of a slot is
//! replaced, so an id the query needs twice still takes a single argument.

use scholium_wikibase::ItemId;

use crate::error::{Result, ReviewError};
use crate::properties::{placeholders, resolve_template, PropertyMap};

/// Lists every item of the article class, with page id and title where the
/// backend has them.
pub const ARTICLE_LIST_QUERY: &str = r#"
SELECT ?res ?page_ID ?article_text_title WHERE {
  ?res wdt:{instanceof} wd:{article}.
  OPTIONAL { ?res wdt:{pageid} ?page_ID. }
  OPTIONAL { ?res wdt:{title} ?article_text_title. }
}
"#;

/// One row per anchor/term/claim combination for one article. The ordering
/// clause keeps rows for one anchor adjacent, which the aggregation pass
/// depends on.
pub const ANNOTATION_LIST_QUERY: &str = r#"
SELECT ?anchor ?annotation ?term ?dictionary ?Wikidata_item_code ?preceding_phrase ?following_phrase ?character_number ?claim WHERE {
  ?anchor wdt:{anchorin} wd:$article.
  ?annotation wdt:{basedon} ?anchor.
  ?annotation wdt:{term} ?term.
  ?annotation wdt:{dictionary} ?dictionary.
  ?annotation wdt:{wikidataid} ?Wikidata_item_code.
  ?anchor wdt:{offset} ?character_number.
  OPTIONAL { ?anchor wdt:{preceding_phrase} ?preceding_phrase. }
  OPTIONAL { ?anchor wdt:{following_phrase} ?following_phrase. }
  OPTIONAL { ?annotation wdt:{claim} ?claim. }
} ORDER BY ?term ASC(?character_number)
"#;

/// All property/value pairs for one item. The BIND/UNION block injects an
/// identity row so the item itself appears in its own listing.
pub const ITEM_PROPERTIES_QUERY: &str = r#"
SELECT ?propUrl ?propLabel ?valUrl
WHERE
{
    hint:Query hint:optimizer 'None' .
    {   BIND(wd:$item AS ?valUrl) .
        BIND("N/A" AS ?propUrl ) .
        BIND("identity"@en AS ?propLabel ) .
    }
    UNION
    {   wd:$item ?propUrl ?valUrl .
        ?property ?ref ?propUrl .
        ?property rdf:type wikibase:Property .
        ?property rdfs:label ?propLabel
    }
}
ORDER BY ?propUrl ?valUrl
"#;

/// Drug/disease co-occurrence pairs within a 200-character window, shaped
/// for the query-service Dimensions embed view. The `#defaultView` line
/// must stay first.
pub const GRAPH_QUERY: &str = r#"#defaultView:Dimensions
SELECT  ?drugLabel ?charnumber2 ?charnumber1 ?diseaseLabel
WHERE {
         ?anchor1 wdt:{anchorin} wd:$article;
                  wdt:{offset} ?charnumber1.
         ?anchor2 wdt:{anchorin} wd:$article;
                  wdt:{offset} ?charnumber2.
         ?term1 wdt:{basedon} ?anchor1.
         ?term2 wdt:{basedon} ?anchor2.
         ?term1 wdt:{term} ?disease.
         ?term2 wdt:{term} ?drug.
         ?term1 wdt:{dictionary} "$disease_dict".
         ?term2 wdt:{dictionary} "$drug_dict".
         FILTER (xsd:integer(?charnumber2) > xsd:integer(?charnumber1))
         FILTER (xsd:integer(?charnumber2) - xsd:integer(?charnumber1) < 200)

  SERVICE wikibase:label { bd:serviceParam wikibase:language "en". }
}"#;

fn resolve_checked(template: &str, map: &PropertyMap) -> Result<String> {
    let resolved = resolve_template(template, map);
    match placeholders(&resolved).first() {
        Some(name) => Err(ReviewError::UnresolvedPlaceholder {
            name: (*name).to_string(),
        }),
        None => Ok(resolved),
    }
}

/// The deployment-resolved query strings.
///
/// Built once at startup; [`QuerySet::resolve`] fails if any `{name}` hole
/// survives substitution, so a property map that misses a binding can never
/// reach request handling.
#[derive(Debug, Clone)]
pub struct QuerySet {
    article_list: String,
    annotation_list: String,
    item_properties: String,
    graph: String,
}

impl QuerySet {
    pub fn resolve(map: &PropertyMap) -> Result<Self> {
        Ok(Self {
            article_list: resolve_checked(ARTICLE_LIST_QUERY, map)?,
            annotation_list: resolve_checked(ANNOTATION_LIST_QUERY, map)?,
            item_properties: resolve_checked(ITEM_PROPERTIES_QUERY, map)?,
            graph: resolve_checked(GRAPH_QUERY, map)?,
        })
    }

    pub fn article_list(&self) -> &str {
        &self.article_list
    }

    pub fn annotation_list(&self, article: &ItemId) -> String {
        self.annotation_list.replace("$article", article.as_str())
    }

    pub fn item_properties(&self, item: &ItemId) -> String {
        self.item_properties.replace("$item", item.as_str())
    }

    pub fn graph(&self, article: &ItemId, disease_dict: &str, drug_dict: &str) -> String {
        self.graph
            .replace("$article", article.as_str())
            .replace("$disease_dict", disease_dict)
            .replace("$drug_dict", drug_dict)
    }

    /// Embeddable URL for the co-occurrence graph on the query-service
    /// frontend. The fragment must arrive fully percent-encoded with no
    /// literal colons, or the frontend mis-splits it on re-decode.
    pub fn graph_embed_url(
        &self,
        embed_base: &str,
        article: &ItemId,
        disease_dict: &str,
        drug_dict: &str,
    ) -> String {
        let query = self.graph(article, disease_dict, drug_dict);
        format!("{}{}", embed_base, urlencoding::encode(&query))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::properties::test_map;

    #[test]
    fn test_resolve_binds_every_hole() {
        let queries = QuerySet::resolve(&test_map()).unwrap();

        assert!(queries.article_list().contains("wdt:P11 wd:Q2."));
        assert!(queries.article_list().contains("OPTIONAL { ?res wdt:P12 ?page_ID. }"));
        assert!(placeholders(queries.article_list()).is_empty());
        assert!(placeholders(&queries.annotation_list(&ItemId::new("Q1"))).is_empty());
        assert!(placeholders(&queries.item_properties(&ItemId::new("Q1"))).is_empty());
        assert!(placeholders(&queries.graph(&ItemId::new("Q1"), "d", "g")).is_empty());
    }

    #[test]
    fn test_resolve_rejects_leftover_placeholder() {
        let result = resolve_checked("?x wdt:{bogus} ?y", &test_map());
        match result {
            Err(ReviewError::UnresolvedPlaceholder { name }) => assert_eq!(name, "bogus"),
            other => panic!("expected UnresolvedPlaceholder, got {other:?}"),
        }
    }

    #[test]
    fn test_annotation_list_fills_article_slot() {
        let queries = QuerySet::resolve(&test_map()).unwrap();
        let query = queries.annotation_list(&ItemId::new("Q140"));

        assert!(query.contains("?anchor wdt:P16 wd:Q140."));
        assert!(query.contains("OPTIONAL { ?annotation wdt:P22 ?claim. }"));
        assert!(query.contains("ORDER BY ?term ASC(?character_number)"));
        assert!(!query.contains("$article"));
    }

    #[test]
    fn test_item_properties_fills_both_occurrences() {
        let queries = QuerySet::resolve(&test_map()).unwrap();
        let query = queries.item_properties(&ItemId::new("Q117"));

        assert_eq!(query.matches("wd:Q117").count(), 2);
        assert!(query.contains("hint:Query hint:optimizer 'None'"));
        assert!(!query.contains("$item"));
    }

    #[test]
    fn test_graph_query_quotes_dictionary_labels() {
        let queries = QuerySet::resolve(&test_map()).unwrap();
        let query = queries.graph(&ItemId::new("Q140"), "disease_abbreviations", "drugbank");

        assert!(query.starts_with("#defaultView:Dimensions"));
        assert_eq!(query.matches("wd:Q140").count(), 2);
        assert!(query.contains(r#"?term1 wdt:P20 "disease_abbreviations"."#));
        assert!(query.contains(r#"?term2 wdt:P20 "drugbank"."#));
    }

    #[test]
    fn test_graph_embed_url_is_fully_escaped() {
        let queries = QuerySet::resolve(&test_map()).unwrap();
        let base = "http://wikibase.svc/proxy/wdqs-frontend/embed.html#";
        let url = queries.graph_embed_url(base, &ItemId::new("Q140"), "diseases", "drugs");

        assert!(url.starts_with(base));
        let fragment = &url[base.len()..];
        assert!(!fragment.contains(':'), "colons must be encoded: {fragment}");
        assert!(fragment.starts_with("%23defaultView%3ADimensions"));
        assert!(fragment.contains("%3A"));
        assert!(fragment.contains("%20"));
        assert!(fragment.contains("%0A"));
    }
}
