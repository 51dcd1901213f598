//! Known-indication filtering.
//!
//! Repurposing candidates are the aggregated diseases the drug is not already
//! indicated for. An empty known set filters nothing, which is also how an
//! unavailable indications source degrades.

use std::collections::HashSet;

use safer_common::entities::{AggregatedDisease, IndicationStatus, LabelledDisease};

/// Drop diseases already in `known_indications`. Order-preserving, scores untouched.
pub fn filter_known_indications(
    diseases: &[AggregatedDisease],
    known_indications: &HashSet<String>,
) -> Vec<AggregatedDisease> {
    diseases
        .iter()
        .filter(|d| !known_indications.contains(&d.disease_id))
        .cloned()
        .collect()
}

/// Tag every disease as a known indication or a repurposing candidate,
/// without removing anything.
pub fn label_indications(
    diseases: &[AggregatedDisease],
    known_indications: &HashSet<String>,
) -> Vec<LabelledDisease> {
    diseases
        .iter()
        .map(|d| LabelledDisease {
            disease: d.clone(),
            status: if known_indications.contains(&d.disease_id) {
                IndicationStatus::KnownIndication
            } else {
                IndicationStatus::RepurposingCandidate
            },
        })
        .collect()
}
