//! Drug/disease partitioning and the claim graph.

use std::collections::HashMap;

use scholium_wikibase::ItemId;
use serde::Serialize;
use tracing::warn;

use crate::annotations::AnnotationInfo;

/// Which side of the drug-disease relationship an annotation falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TermKind {
    Drug,
    Disease,
}

/// Default classifier: a dictionary name containing the literal token
/// `drug` (case-sensitive) marks a drug annotation; everything else,
/// an empty dictionary included, counts as disease. Guesswork until the
/// data model records which dictionary is which.
pub fn dictionary_heuristic(annotation: &AnnotationInfo) -> TermKind {
    if annotation.dictionary.contains("drug") {
        TermKind::Drug
    } else {
        TermKind::Disease
    }
}

/// Annotations split into drug and disease sides.
///
/// Each side also tracks the dictionary name of its last-classified
/// annotation, `""` when the side is empty. When a side mixes dictionaries
/// only the final name survives; the graph query takes one label per side.
#[derive(Debug, Serialize)]
pub struct Partition<'a> {
    pub drugs: Vec<&'a AnnotationInfo>,
    pub diseases: Vec<&'a AnnotationInfo>,
    pub drug_dictionary: &'a str,
    pub disease_dictionary: &'a str,
}

impl<'a> Partition<'a> {
    /// Dictionary labels for the co-occurrence graph query, disease side
    /// first. `None` unless both sides ended up with a non-empty label.
    pub fn dictionary_labels(&self) -> Option<(&'a str, &'a str)> {
        if self.disease_dictionary.is_empty() || self.drug_dictionary.is_empty() {
            None
        } else {
            Some((self.disease_dictionary, self.drug_dictionary))
        }
    }
}

/// Partition with [`dictionary_heuristic`].
pub fn partition(annotations: &[AnnotationInfo]) -> Partition<'_> {
    partition_with(annotations, dictionary_heuristic)
}

/// Partition with a caller-supplied classification rule. Classification
/// looks at one annotation at a time, so running it again on the same
/// input always reproduces the same split.
pub fn partition_with<F>(annotations: &[AnnotationInfo], classify: F) -> Partition<'_>
where
    F: Fn(&AnnotationInfo) -> TermKind,
{
    let mut split = Partition {
        drugs: Vec::new(),
        diseases: Vec::new(),
        drug_dictionary: "",
        disease_dictionary: "",
    };

    for annotation in annotations {
        match classify(annotation) {
            TermKind::Drug => {
                split.drug_dictionary = annotation.dictionary.as_str();
                split.drugs.push(annotation);
            }
            TermKind::Disease => {
                split.disease_dictionary = annotation.dictionary.as_str();
                split.diseases.push(annotation);
            }
        }
    }

    split
}

/// One stored claim reference joined to its target annotation. `disease`
/// is `None` when the referenced id has no annotation in the same set, a
/// dangling reference callers must expect.
#[derive(Debug, Serialize)]
pub struct ClaimEdge<'a> {
    pub drug: &'a AnnotationInfo,
    pub disease: Option<&'a AnnotationInfo>,
}

/// Join every stored claim reference to its target annotation.
///
/// The lookup spans the full unpartitioned set, and nothing checks that
/// the referencing side actually classifies as a drug; edges mirror what
/// the backend holds.
pub fn claim_edges(annotations: &[AnnotationInfo]) -> Vec<ClaimEdge<'_>> {
    let by_id: HashMap<&ItemId, &AnnotationInfo> = annotations
        .iter()
        .map(|annotation| (&annotation.annotation_id, annotation))
        .collect();

    let mut edges = Vec::new();
    for annotation in annotations {
        for claim in &annotation.claims {
            let disease = by_id.get(claim).copied();
            if disease.is_none() {
                warn!(claim = %claim, "claim references an annotation outside the set");
            }
            edges.push(ClaimEdge {
                drug: annotation,
                disease,
            });
        }
    }

    edges
}
