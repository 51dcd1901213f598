//! Safety-aware rescoring.
//!
//! safer_score = round(association_score × penalty(risk_level), 4)
//!
//! The penalty is a scoring adjustment, not a safety gate: a tier missing from
//! the penalty table leaves scores unchanged.

use safer_common::entities::{RankedDisease, SaferResult, SafetySummary};
use safer_common::policy::PenaltyTable;
use tracing::debug;

use crate::normalise::{desc, round_dp};

/// Apply the drug's risk penalty to every ranked disease and re-sort by the
/// penalised score. The returned order is authoritative; it is re-derived
/// here rather than inherited from the ranker. Equal final scores keep the
/// ranker's relative order.
pub fn apply_safety_penalty(
    ranked: &[RankedDisease],
    summary: &SafetySummary,
    penalties: &PenaltyTable,
) -> Vec<SaferResult> {
    let risk_level = summary.risk_level;
    let penalty = penalties.penalty_for(risk_level);

    debug!(%risk_level, penalty, diseases = ranked.len(), "Applying safety penalty");

    let mut rescored: Vec<SaferResult> = ranked
        .iter()
        .map(|d| SaferResult {
            disease_id: d.disease_id.clone(),
            disease_name: d.disease_name.clone(),
            association_score: d.association_score,
            supporting_targets: d.supporting_targets.clone(),
            safer_score: round_dp(d.association_score * penalty, 4),
            safety_risk: risk_level,
        })
        .collect();

    rescored.sort_by(|a, b| desc(a.safer_score, b.safer_score));
    rescored
}

#[cfg(test)]
mod tests {
    use super::*;
    use safer_common::entities::{AggregatedDisease, RiskLevel};
    use std::collections::BTreeMap;

    fn disease(id: &str, score: f64) -> AggregatedDisease {
        AggregatedDisease {
            disease_id: id.to_string(),
            disease_name: Some(format!("{id} name")),
            association_score: score,
            supporting_targets: vec!["T1".to_string()],
        }
    }

    fn summary(level: RiskLevel) -> SafetySummary {
        SafetySummary { risk_level: level, ..SafetySummary::default() }
    }

    #[test]
    fn test_penalty_by_tier() {
        let ranked = vec![disease("D1", 0.8)];
        let table = PenaltyTable::default();

        let high = apply_safety_penalty(&ranked, &summary(RiskLevel::High), &table);
        let medium = apply_safety_penalty(&ranked, &summary(RiskLevel::Medium), &table);
        let low = apply_safety_penalty(&ranked, &summary(RiskLevel::Low), &table);

        assert_eq!(high[0].safer_score, 0.4);
        assert_eq!(medium[0].safer_score, 0.6);
        assert_eq!(low[0].safer_score, 0.8);
        assert_eq!(high[0].safety_risk, RiskLevel::High);
        assert_eq!(high[0].association_score, 0.8);
    }

    #[test]
    fn test_rounds_to_four_places() {
        let ranked = vec![disease("D1", 0.123456)];
        let out = apply_safety_penalty(&ranked, &summary(RiskLevel::Medium), &PenaltyTable::default());
        // 0.123456 * 0.75 = 0.092592
        assert_eq!(out[0].safer_score, 0.0926);
    }

    #[test]
    fn test_resorts_after_penalty() {
        let ranked = vec![disease("P", 0.5), disease("Q", 0.9)];

        let mut table = BTreeMap::new();
        table.insert("HIGH".to_string(), 0.5);
        let out = apply_safety_penalty(&ranked, &summary(RiskLevel::High), &PenaltyTable(table));

        // Uniform penalty: Q (0.45) still outranks P (0.25), regardless of input order.
        assert_eq!(out[0].disease_id, "Q");
        assert_eq!(out[0].safer_score, 0.45);
        assert_eq!(out[1].safer_score, 0.25);
    }

    #[test]
    fn test_unpenalized_disease_outranks_penalized_one() {
        // P scored under no penalty, Q under the HIGH penalty.
        let p = apply_safety_penalty(&[disease("P", 0.5)], &summary(RiskLevel::Low), &PenaltyTable::default());
        let q = apply_safety_penalty(&[disease("Q", 0.9)], &summary(RiskLevel::High), &PenaltyTable::default());

        let mut merged: Vec<SaferResult> = q.into_iter().chain(p).collect();
        merged.sort_by(|a, b| desc(a.safer_score, b.safer_score));
        assert_eq!(merged[0].disease_id, "P");
        assert_eq!(merged[1].safer_score, 0.45);
    }

    #[test]
    fn test_missing_tier_is_no_penalty() {
        let ranked = vec![disease("D1", 0.8)];
        let out = apply_safety_penalty(&ranked, &summary(RiskLevel::High), &PenaltyTable(BTreeMap::new()));
        assert_eq!(out[0].safer_score, 0.8);
    }

    #[test]
    fn test_equal_final_scores_keep_ranked_order() {
        let ranked = vec![disease("B", 0.6), disease("A", 0.6)];
        let out = apply_safety_penalty(&ranked, &summary(RiskLevel::Low), &PenaltyTable::default());
        let ids: Vec<&str> = out.iter().map(|r| r.disease_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }
}
