//! Review submission handling.

use scholium_wikibase::{ClaimWriter, ItemId, QueryService};
use tracing::{info, instrument};

use crate::annotations::{collect_annotations, AnnotationInfo};
use crate::config::ReviewConfig;
use crate::error::{Result, ReviewError};
use crate::queries::QuerySet;

/// A reviewer's verdict on one candidate drug-disease pair.
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub drug: ItemId,
    pub disease: ItemId,
    /// False asks for a preview of the pair; only true writes.
    pub confirm: bool,
}

/// What a submission produced.
#[derive(Debug)]
pub enum ReviewOutcome {
    /// The pair was confirmed and the claim recorded.
    Recorded,
    /// Confirmation withheld; both sides located and returned for display.
    Preview {
        drug: AnnotationInfo,
        disease: AnnotationInfo,
    },
}

/// Find an annotation by id in the current annotation set.
pub fn find_annotation<'a>(
    annotations: &'a [AnnotationInfo],
    id: &ItemId,
) -> Result<&'a AnnotationInfo> {
    annotations
        .iter()
        .find(|annotation| &annotation.annotation_id == id)
        .ok_or_else(|| ReviewError::MissingAnnotation(id.clone()))
}

/// Apply a review submission against an article's current annotation set.
///
/// Both ids must resolve in the set before anything else happens; a stale
/// or hand-edited id fails with [`ReviewError::MissingAnnotation`] and no
/// write is attempted. A confirmed pair is written exactly once, drug as
/// subject and disease as object, under the deployment's claim property.
/// Write failures propagate unchanged.
#[instrument(skip(writer, config, annotations))]
pub async fn submit_review(
    writer: &dyn ClaimWriter,
    config: &ReviewConfig,
    annotations: &[AnnotationInfo],
    request: &ReviewRequest,
) -> Result<ReviewOutcome> {
    let drug = find_annotation(annotations, &request.drug)?;
    let disease = find_annotation(annotations, &request.disease)?;

    if !request.confirm {
        return Ok(ReviewOutcome::Preview {
            drug: drug.clone(),
            disease: disease.clone(),
        });
    }

    writer
        .write_claim(
            &drug.annotation_id,
            &config.properties.claim,
            &disease.annotation_id,
        )
        .await?;

    info!(
        drug = %drug.annotation_id,
        disease = %disease.annotation_id,
        "recorded confirmed claim"
    );

    Ok(ReviewOutcome::Recorded)
}

/// Reload the article's annotation set and apply a submission against it.
///
/// Submissions validate against what the backend holds now, not against
/// whatever snapshot the reviewer's form was rendered from.
#[instrument(skip(service, writer, queries, config))]
pub async fn review_article(
    service: &dyn QueryService,
    writer: &dyn ClaimWriter,
    queries: &QuerySet,
    config: &ReviewConfig,
    article_id: &ItemId,
    request: &ReviewRequest,
) -> Result<ReviewOutcome> {
    let rows = service.run_query(&queries.annotation_list(article_id)).await?;
    let (annotations, _) = collect_annotations(&rows, &config.entity_prefix);
    submit_review(writer, config, &annotations, request).await
}
