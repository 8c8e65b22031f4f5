//! Annotation row decoding and aggregation.
//!
//! The annotation query returns one flat row per anchor/term/claim
//! combination, ordered so rows for one anchor arrive adjacent (`ORDER BY
//! ?term` then numeric offset). [`collect_annotations`] leans on that
//! ordering: it is a single-pass grouper, not a sort, and rows for one
//! anchor that are not adjacent would come out as separate annotations.

use std::collections::HashMap;

use scholium_wikibase::{ItemId, SparqlRow};
use serde::Serialize;
use tracing::debug;

/// A term match on one anchor, with any claim references the backend
/// already holds for it. One record per distinct anchor in the result
/// stream.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationInfo {
    /// Anchor id with the entity prefix stripped.
    pub anchor_id: ItemId,
    /// Anchor URI exactly as the backend returned it.
    pub anchor_raw: String,
    /// Annotation id with the entity prefix stripped.
    pub annotation_id: ItemId,
    /// Annotation URI exactly as the backend returned it.
    pub annotation_raw: String,
    pub term: String,
    pub dictionary: String,
    pub wikidata_id: String,
    pub preceding_phrase: String,
    pub following_phrase: String,
    /// Character offset of the anchor, kept as the backend's text.
    pub offset: String,
    /// Claim target ids, prefix-stripped, in row order, repeats included.
    pub claims: Vec<ItemId>,
}

/// Per-term rollup across one article's annotations.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationSummary {
    pub wikidata_id: String,
    pub dictionary: String,
    /// Number of distinct anchors the term matched, not number of rows.
    pub count: usize,
}

/// Fold annotation result rows into one [`AnnotationInfo`] per anchor plus
/// per-term summaries, keyed by term text.
///
/// A row whose anchor matches the previous row's anchor only contributes
/// its claim value; everything else on it is a repeat. Claim values are
/// accumulated verbatim, duplicates included. A term's summary count moves
/// once per new anchor, and the first-seen wikidata id and dictionary for
/// the term stick even if later rows disagree.
pub fn collect_annotations(
    rows: &[SparqlRow],
    entity_prefix: &str,
) -> (Vec<AnnotationInfo>, HashMap<String, AnnotationSummary>) {
    let mut annotations: Vec<AnnotationInfo> = Vec::with_capacity(rows.len());
    let mut summaries: HashMap<String, AnnotationSummary> = HashMap::new();

    for row in rows {
        let anchor_id = ItemId::from_uri(row.value("anchor"), entity_prefix);

        let same_anchor = annotations
            .last()
            .map_or(false, |previous| previous.anchor_id == anchor_id);

        if !same_anchor {
            let term = row.value("term");
            summaries
                .entry(term.to_string())
                .and_modify(|summary| summary.count += 1)
                .or_insert_with(|| AnnotationSummary {
                    wikidata_id: row.value("Wikidata_item_code").to_string(),
                    dictionary: row.value("dictionary").to_string(),
                    count: 1,
                });

            annotations.push(AnnotationInfo {
                anchor_id,
                anchor_raw: row.value("anchor").to_string(),
                annotation_id: ItemId::from_uri(row.value("annotation"), entity_prefix),
                annotation_raw: row.value("annotation").to_string(),
                term: term.to_string(),
                dictionary: row.value("dictionary").to_string(),
                wikidata_id: row.value("Wikidata_item_code").to_string(),
                preceding_phrase: row.value("preceding_phrase").to_string(),
                following_phrase: row.value("following_phrase").to_string(),
                offset: row.value("character_number").to_string(),
                claims: Vec::new(),
            });
        }

        let claim = row.value("claim");
        if !claim.is_empty() {
            if let Some(current) = annotations.last_mut() {
                current.claims.push(ItemId::from_uri(claim, entity_prefix));
            }
        }
    }

    debug!(
        rows = rows.len(),
        annotations = annotations.len(),
        terms = summaries.len(),
        "aggregated annotation rows"
    );

    (annotations, summaries)
}
