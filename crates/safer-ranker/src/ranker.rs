//! Disease ranking by association strength.

use safer_common::entities::{AggregatedDisease, RankedDisease};

use crate::normalise::desc;

/// Order diseases by `association_score` descending, then by number of
/// supporting targets descending. The sort is stable, so exact ties keep
/// their input order.
pub fn rank_diseases(diseases: &[AggregatedDisease]) -> Vec<RankedDisease> {
    let mut ranked = diseases.to_vec();
    ranked.sort_by(|a, b| {
        desc(a.association_score, b.association_score)
            .then_with(|| b.supporting_targets.len().cmp(&a.supporting_targets.len()))
    });
    ranked
}
