//! Scholium review engine.
//!
//! Scholium presents text-mined drug and disease mentions from scientific
//! articles to human reviewers, backed by a Wikibase knowledge base. The
//! backend stores annotations as items linked by properties whose ids vary
//! per deployment, so every query here is a template resolved against a
//! configured property map at startup.
//!
//! The flow, end to end:
//!
//! 1. [`articles::article_list`] lists the article items the backend holds.
//! 2. [`articles::load_article`] pulls one article's property pairs and its
//!    flat annotation rows, then [`annotations::collect_annotations`] folds
//!    the rows into one record per anchor plus per-term summaries.
//! 3. [`partition()`] splits annotations into drug and disease sides and
//!    [`claim_edges()`] joins stored claim references into edges.
//! 4. [`review::submit_review`] validates a reviewer's drug/disease pair
//!    against the live annotation set and records confirmed pairs through
//!    the claim-write boundary.

pub mod annotations;
pub mod articles;
pub mod config;
pub mod error;
pub mod partition;
pub mod properties;
pub mod queries;
pub mod review;

pub use scholium_wikibase::{ItemId, SparqlRow};

pub use annotations::{collect_annotations, AnnotationInfo, AnnotationSummary};
pub use articles::{article_list, article_properties, load_article, ArticleInfo, ArticleView};
pub use config::ReviewConfig;
pub use error::{ReviewError, Result};
pub use partition::{
    claim_edges, dictionary_heuristic, partition, partition_with, ClaimEdge, Partition, TermKind,
};
pub use properties::{placeholders, resolve_template, PropertyMap, PROPERTY_NAMES};
pub use queries::QuerySet;
pub use review::{find_annotation, review_article, submit_review, ReviewOutcome, ReviewRequest};
