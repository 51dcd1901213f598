//! Bounded concurrent fan-out over per-target association fetches.
//!
//! Every target yields an outcome (records or a failure reason). Failures and
//! timeouts are isolated to their target and reported; results are merged only
//! after every fetch has settled. Dropping the returned future cancels all
//! outstanding fetches.

use std::collections::BTreeMap;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use safer_common::entities::AssociationRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::sources::AssociationSource;

/// Fan-out limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanoutConfig {
    /// Maximum target fetches in flight
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Per-target fetch timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub per_target_timeout_secs: u64,
}

fn default_max_in_flight() -> usize { 6 }
fn default_timeout_secs()  -> u64   { 15 }

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
            per_target_timeout_secs: default_timeout_secs(),
        }
    }
}

impl FanoutConfig {
    pub fn per_target_timeout(&self) -> Duration {
        Duration::from_secs(self.per_target_timeout_secs)
    }
}

/// Result of fetching one target.
#[derive(Debug, Clone)]
pub enum TargetOutcome {
    Fetched { target_id: String, records: Vec<AssociationRecord> },
    Failed { target_id: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetFailure {
    pub target_id: String,
    pub reason: String,
}

/// Soft-failure summary of a fan-out: attempted vs. succeeded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchReport {
    pub targets_attempted: usize,
    pub targets_succeeded: usize,
    /// Sorted by target id
    pub failures: Vec<TargetFailure>,
}

/// Fetch associations for every target with at most `max_in_flight` requests
/// at once. Only successful targets appear in the returned map.
pub async fn fetch_target_associations<S>(
    source: &S,
    target_ids: &[String],
    cfg: &FanoutConfig,
) -> (BTreeMap<String, Vec<AssociationRecord>>, FetchReport)
where
    S: AssociationSource + ?Sized,
{
    let timeout = cfg.per_target_timeout();

    let outcomes: Vec<TargetOutcome> = stream::iter(target_ids.iter().cloned())
        .map(|target_id| async move {
            match tokio::time::timeout(timeout, source.target_associations(&target_id)).await {
                Ok(Ok(records)) => {
                    debug!(target_id = %target_id, count = records.len(), "Target fetched");
                    TargetOutcome::Fetched { target_id, records }
                }
                Ok(Err(e)) => {
                    warn!(target_id = %target_id, "Target fetch failed: {e}");
                    TargetOutcome::Failed { target_id, reason: e.to_string() }
                }
                Err(_) => {
                    warn!(
                        target_id = %target_id,
                        timeout_secs = timeout.as_secs(),
                        "Target fetch timed out"
                    );
                    TargetOutcome::Failed {
                        target_id,
                        reason: format!("timed out after {}s", timeout.as_secs()),
                    }
                }
            }
        })
        .buffer_unordered(cfg.max_in_flight.max(1))
        .collect()
        .await;

    let mut per_target = BTreeMap::new();
    let mut report = FetchReport {
        targets_attempted: target_ids.len(),
        ..FetchReport::default()
    };

    for outcome in outcomes {
        match outcome {
            TargetOutcome::Fetched { target_id, records } => {
                report.targets_succeeded += 1;
                per_target.insert(target_id, records);
            }
            TargetOutcome::Failed { target_id, reason } => {
                report.failures.push(TargetFailure { target_id, reason });
            }
        }
    }
    report.failures.sort_by(|a, b| a.target_id.cmp(&b.target_id));

    info!(
        attempted = report.targets_attempted,
        succeeded = report.targets_succeeded,
        failed = report.failures.len(),
        "Target fan-out complete"
    );

    (per_target, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockEvidenceSource;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_partial_failure_is_isolated() {
        let source = MockEvidenceSource::new("CHEMBL25")
            .with_target("ENSG1", "A", vec![AssociationRecord::new("D1", None, 0.5)])
            .with_failing_target("ENSG2", "B")
            .with_target("ENSG3", "C", vec![])
            .with_unknown_target("ENSG4", "D");

        let (map, report) = fetch_target_associations(
            &source,
            &ids(&["ENSG1", "ENSG2", "ENSG3", "ENSG4"]),
            &FanoutConfig::default(),
        )
        .await;

        assert_eq!(report.targets_attempted, 4);
        assert_eq!(report.targets_succeeded, 2);
        let failed: Vec<&str> = report.failures.iter().map(|f| f.target_id.as_str()).collect();
        assert_eq!(failed, vec!["ENSG2", "ENSG4"]);
        assert!(map.contains_key("ENSG1"));
        assert!(map.contains_key("ENSG3"));
        assert!(map["ENSG3"].is_empty());
    }

    #[tokio::test]
    async fn test_slow_target_times_out() {
        let source = MockEvidenceSource::new("CHEMBL25")
            .with_target("ENSG1", "A", vec![AssociationRecord::new("D1", None, 0.5)])
            .with_slow_target("ENSG2", "B", Duration::from_secs(30), vec![]);

        let cfg = FanoutConfig { max_in_flight: 2, per_target_timeout_secs: 1 };
        let (map, report) = fetch_target_associations(&source, &ids(&["ENSG1", "ENSG2"]), &cfg).await;

        assert_eq!(map.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].reason.contains("timed out"));
    }

    #[tokio::test]
    async fn test_no_targets() {
        let source = MockEvidenceSource::new("CHEMBL25");
        let (map, report) = fetch_target_associations(&source, &[], &FanoutConfig::default()).await;
        assert!(map.is_empty());
        assert_eq!(report, FetchReport::default());
    }
}
