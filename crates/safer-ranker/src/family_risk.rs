//! Signal strength bucketed by biological target family.
//!
//! Auxiliary view for visualisation only; it never feeds the ranking.

use safer_common::entities::{FamilyRiskMap, SafetySignal};
use safer_common::policy::FamilyVocabulary;

/// Sum signal strengths per family.
///
/// Every requested family is present in the output, at `0.0` when nothing
/// matched. A signal adds to each family whose keywords it matches; families
/// outside `families` are ignored and signals without a strength add nothing.
pub fn compute_family_risk<S: AsRef<str>>(
    families: &[S],
    signals: &[SafetySignal],
    vocabulary: &FamilyVocabulary,
) -> FamilyRiskMap {
    let mut scores: FamilyRiskMap = families
        .iter()
        .map(|f| (f.as_ref().to_string(), 0.0))
        .collect();

    for signal in signals {
        let Some(strength) = signal.signal_strength else {
            continue;
        };
        for family in vocabulary.matching_families(&signal.event) {
            if let Some(total) = scores.get_mut(family) {
                *total += strength;
            }
        }
    }

    scores
}
