//! Cross-target evidence aggregation.
//!
//! Folds per-target association lists into one record per disease. Scores are
//! merged with `max` so a disease strongly linked through any single target is
//! never diluted by weak links through others. The merge is commutative and
//! associative, so the output does not depend on target processing order.

use std::collections::{BTreeMap, BTreeSet};

use safer_common::entities::{AggregatedDisease, AssociationRecord};
use tracing::debug;

/// Running merge state for one disease.
#[derive(Debug)]
struct DiseaseAccumulator {
    disease_name: Option<String>,
    association_score: f64,
    supporting_targets: BTreeSet<String>,
}

impl DiseaseAccumulator {
    fn new(disease_name: Option<&str>, score: f64, target: &str) -> Self {
        Self {
            disease_name: disease_name.map(String::from),
            association_score: score,
            supporting_targets: BTreeSet::from([target.to_string()]),
        }
    }

    fn merge(&mut self, disease_name: Option<&str>, score: f64, target: &str) {
        self.association_score = self.association_score.max(score);
        self.supporting_targets.insert(target.to_string());

        // Smallest non-null name wins, whatever order the targets arrive in.
        if let Some(name) = disease_name {
            match &self.disease_name {
                Some(current) if current.as_str() <= name => {}
                _ => self.disease_name = Some(name.to_string()),
            }
        }
    }
}

/// Aggregate disease associations across targets.
///
/// Accepts any `(target, records)` iterator, e.g. `&HashMap<String, Vec<_>>`
/// or `&BTreeMap<String, Vec<_>>`. Records without a disease id or a finite
/// score are dropped. Output is sorted by `disease_id`.
pub fn aggregate_disease_associations<'a, I>(per_target: I) -> Vec<AggregatedDisease>
where
    I: IntoIterator<Item = (&'a String, &'a Vec<AssociationRecord>)>,
{
    let mut index: BTreeMap<String, DiseaseAccumulator> = BTreeMap::new();
    let mut dropped = 0usize;

    for (target, records) in per_target {
        for record in records {
            let (Some(disease_id), Some(score)) = (&record.disease_id, record.association_score)
            else {
                dropped += 1;
                continue;
            };
            if !score.is_finite() {
                dropped += 1;
                continue;
            }

            let name = record.disease_name.as_deref();
            match index.get_mut(disease_id) {
                Some(acc) => acc.merge(name, score, target),
                None => {
                    index.insert(disease_id.clone(), DiseaseAccumulator::new(name, score, target));
                }
            }
        }
    }

    if dropped > 0 {
        debug!(dropped, "Dropped malformed association records");
    }

    index
        .into_iter()
        .map(|(disease_id, acc)| AggregatedDisease {
            disease_id,
            disease_name: acc.disease_name,
            association_score: acc.association_score,
            supporting_targets: acc.supporting_targets.into_iter().collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn rec(id: &str, name: &str, score: f64) -> AssociationRecord {
        AssociationRecord::new(id, Some(name), score)
    }

    #[test]
    fn test_max_merge_across_targets() {
        let mut map = HashMap::new();
        map.insert("PTGS1".to_string(), vec![rec("EFO_X", "disease x", 0.3)]);
        map.insert("PTGS2".to_string(), vec![rec("EFO_X", "disease x", 0.9)]);

        let out = aggregate_disease_associations(&map);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].association_score, 0.9);
        assert_eq!(out[0].supporting_targets, vec!["PTGS1".to_string(), "PTGS2".to_string()]);
    }

    #[test]
    fn test_order_independence() {
        let a = ("A".to_string(), vec![rec("D1", "one", 0.4), rec("D2", "two", 0.7)]);
        let b = ("B".to_string(), vec![rec("D1", "one", 0.8), rec("D3", "three", 0.1)]);
        let c = ("C".to_string(), vec![rec("D2", "two", 0.2), rec("D3", "three (alt)", 0.6)]);

        let orders = [
            vec![&a, &b, &c],
            vec![&c, &b, &a],
            vec![&b, &a, &c],
            vec![&c, &a, &b],
        ];

        let results: Vec<Vec<AggregatedDisease>> = orders
            .iter()
            .map(|order| aggregate_disease_associations(order.iter().map(|(t, r)| (t, r))))
            .collect();

        for r in &results[1..] {
            assert_eq!(r, &results[0]);
        }
        let d3 = results[0].iter().find(|d| d.disease_id == "D3").unwrap();
        assert_eq!(d3.disease_name.as_deref(), Some("three"));
        assert_eq!(d3.association_score, 0.6);
    }

    #[test]
    fn test_malformed_records_dropped() {
        let mut map = HashMap::new();
        map.insert(
            "T1".to_string(),
            vec![
                AssociationRecord { disease_id: None, disease_name: Some("nameless".into()), association_score: Some(0.5) },
                AssociationRecord { disease_id: Some("D1".into()), disease_name: None, association_score: None },
                AssociationRecord { disease_id: Some("D2".into()), disease_name: None, association_score: Some(f64::NAN) },
                AssociationRecord { disease_id: Some("D3".into()), disease_name: None, association_score: Some(0.2) },
            ],
        );

        let out = aggregate_disease_associations(&map);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].disease_id, "D3");
        assert_eq!(out[0].disease_name, None);
    }

    #[test]
    fn test_empty_inputs() {
        let empty: HashMap<String, Vec<AssociationRecord>> = HashMap::new();
        assert!(aggregate_disease_associations(&empty).is_empty());

        let mut no_records = HashMap::new();
        no_records.insert("T1".to_string(), vec![]);
        assert!(aggregate_disease_associations(&no_records).is_empty());
    }

    #[test]
    fn test_duplicate_records_within_target_count_once() {
        let mut map = HashMap::new();
        map.insert("T1".to_string(), vec![rec("D1", "one", 0.2), rec("D1", "one", 0.5)]);

        let out = aggregate_disease_associations(&map);
        assert_eq!(out[0].association_score, 0.5);
        assert_eq!(out[0].supporting_targets, vec!["T1".to_string()]);
    }
}
