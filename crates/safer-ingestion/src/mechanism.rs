//! Mechanism-of-action → canonical target mapping.
//!
//! Only human Ensembl gene targets (`ENSG…`) with an approved symbol are kept.

use std::collections::BTreeSet;

use safer_common::entities::{CanonicalTarget, DirectionOfEffect};

use crate::models::MechanismRow;

/// Canonicalize targets from raw mechanism rows. A target listed under
/// several mechanisms appears once per mechanism.
pub fn map_targets_from_mechanisms(rows: &[MechanismRow]) -> Vec<CanonicalTarget> {
    let mut targets = Vec::new();

    for row in rows {
        for target in &row.targets {
            let (Some(ensembl_id), Some(symbol)) = (&target.id, &target.approved_symbol) else {
                continue;
            };
            if !ensembl_id.starts_with("ENSG") || symbol.is_empty() {
                continue;
            }

            targets.push(CanonicalTarget {
                ensembl_id: ensembl_id.clone(),
                gene_symbol: symbol.clone(),
                action_type: row.action_type.clone(),
                mechanism: row.mechanism_of_action.clone(),
                direction_of_effect: row
                    .action_type
                    .as_deref()
                    .map(DirectionOfEffect::from_action_type)
                    .unwrap_or(DirectionOfEffect::Unknown),
            });
        }
    }

    targets
}

/// Distinct target ids to fan out over, sorted.
pub fn unique_target_ids(targets: &[CanonicalTarget]) -> Vec<String> {
    targets
        .iter()
        .map(|t| t.ensembl_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MechanismTarget;

    fn target(id: &str, symbol: &str) -> MechanismTarget {
        MechanismTarget { id: Some(id.to_string()), approved_symbol: Some(symbol.to_string()) }
    }

    #[test]
    fn test_keeps_human_gene_targets_only() {
        let rows = vec![MechanismRow {
            mechanism_of_action: Some("Cyclooxygenase inhibitor".into()),
            action_type: Some("INHIBITOR".into()),
            targets: vec![
                target("ENSG00000095303", "PTGS1"),
                target("ENSG00000073756", "PTGS2"),
                target("CHEMBL221", "PTGS1"),
                MechanismTarget { id: Some("ENSG00000000001".into()), approved_symbol: None },
            ],
        }];

        let mapped = map_targets_from_mechanisms(&rows);
        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped[0].gene_symbol, "PTGS1");
        assert_eq!(mapped[0].direction_of_effect, DirectionOfEffect::LossOfFunction);
        assert_eq!(mapped[1].mechanism.as_deref(), Some("Cyclooxygenase inhibitor"));
    }

    #[test]
    fn test_unique_target_ids_sorted_and_deduplicated() {
        let rows = vec![
            MechanismRow {
                mechanism_of_action: None,
                action_type: Some("AGONIST".into()),
                targets: vec![target("ENSG2", "B"), target("ENSG1", "A")],
            },
            MechanismRow {
                mechanism_of_action: None,
                action_type: None,
                targets: vec![target("ENSG2", "B")],
            },
        ];
        let mapped = map_targets_from_mechanisms(&rows);
        assert_eq!(mapped.len(), 3);
        assert_eq!(mapped[2].direction_of_effect, DirectionOfEffect::Unknown);
        assert_eq!(unique_target_ids(&mapped), vec!["ENSG1".to_string(), "ENSG2".to_string()]);
    }
}
