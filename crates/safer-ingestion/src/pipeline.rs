//! End-to-end repurposing pipeline.
//!
//! Orchestrates the full flow for a single drug query:
//!   1. Validate the ChEMBL id
//!   2. Resolve drug metadata
//!   3. Enumerate and canonicalize the drug's targets
//!   4. Concurrently: fan out per-target association fetches, fetch known
//!      indications, fetch adverse-event signals
//!   5. Aggregate → filter known indications → rank
//!   6. Summarise safety signals, apply the risk penalty
//!   7. Optional family risk map
//!
//! Steps 5–7 are the pure `safer-ranker` core. Per-target failures and
//! degraded indication/safety sources are reported, never fatal.

use std::future::Future;

use chrono::{DateTime, Utc};
use safer_common::chembl::validate_chembl_id;
use safer_common::entities::{
    CanonicalTarget, DrugIndications, DrugMetadata, FamilyRiskMap, LabelledDisease, SaferResult,
    SafetySignal, SafetySummary,
};
use safer_common::policy::RiskPolicy;
use safer_common::{Result, SaferError};
use safer_ranker::{
    aggregate_disease_associations, apply_safety_penalty, compute_family_risk,
    filter_known_indications, label_indications, normalize_safety_signals, rank_diseases,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::fanout::{fetch_target_associations, FanoutConfig, FetchReport};
use crate::mechanism::unique_target_ids;
use crate::sources::EvidenceSource;

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub policy: RiskPolicy,

    #[serde(default)]
    pub fanout: FanoutConfig,

    /// Compute the per-family risk map alongside the ranking.
    #[serde(default = "default_family_risk")]
    pub family_risk: bool,
}

fn default_family_risk() -> bool { true }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            policy: RiskPolicy::default(),
            fanout: FanoutConfig::default(),
            family_risk: default_family_risk(),
        }
    }
}

// ── Progress events ───────────────────────────────────────────────────────────

/// Stage event emitted during a run (cloneable for broadcast).
#[derive(Debug, Clone, Serialize)]
pub struct PipelineProgress {
    pub query_id: Uuid,
    pub stage: String,
    pub message: String,
}

// ── Report ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaferReport {
    pub query_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub drug: DrugMetadata,
    pub targets: Vec<CanonicalTarget>,
    pub indications: DrugIndications,
    /// Every aggregated disease, tagged known indication or repurposing candidate
    pub diseases: Vec<LabelledDisease>,
    /// Repurposing candidates in final (penalised) order
    pub results: Vec<SaferResult>,
    pub safety_summary: SafetySummary,
    pub family_risk: Option<FamilyRiskMap>,
    pub fetch_report: FetchReport,
    pub duration_ms: u64,
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// Run the pipeline for one drug.
pub async fn run_pipeline<S>(source: &S, chembl_id: &str, cfg: &PipelineConfig) -> Result<SaferReport>
where
    S: EvidenceSource + ?Sized,
{
    execute(source, chembl_id, cfg, None).await
}

/// Run the pipeline, emitting stage events on `progress_tx`.
pub async fn run_pipeline_with_progress<S>(
    source: &S,
    chembl_id: &str,
    cfg: &PipelineConfig,
    progress_tx: broadcast::Sender<PipelineProgress>,
) -> Result<SaferReport>
where
    S: EvidenceSource + ?Sized,
{
    execute(source, chembl_id, cfg, Some(progress_tx)).await
}

/// Run the pipeline until `cancel` resolves. On cancellation every in-flight
/// fetch is dropped and `SaferError::Cancelled` is returned; no partial
/// report is produced.
pub async fn run_pipeline_cancellable<S, C>(
    source: &S,
    chembl_id: &str,
    cfg: &PipelineConfig,
    cancel: C,
) -> Result<SaferReport>
where
    S: EvidenceSource + ?Sized,
    C: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = cancel => {
            warn!(chembl_id, "Drug query cancelled");
            Err(SaferError::Cancelled(chembl_id.to_string()))
        }
        report = execute(source, chembl_id, cfg, None) => report,
    }
}

#[instrument(skip(source, cfg, progress_tx))]
async fn execute<S>(
    source: &S,
    chembl_id: &str,
    cfg: &PipelineConfig,
    progress_tx: Option<broadcast::Sender<PipelineProgress>>,
) -> Result<SaferReport>
where
    S: EvidenceSource + ?Sized,
{
    let query_id = Uuid::new_v4();
    let t0 = std::time::Instant::now();

    let emit = |stage: &str, message: String| {
        if let Some(ref tx) = progress_tx {
            let _ = tx.send(PipelineProgress { query_id, stage: stage.to_string(), message });
        }
    };

    // ── 1. Identity ───────────────────────────────────────────────────────────
    let chembl_id = validate_chembl_id(chembl_id)?;
    info!(query_id = %query_id, chembl_id = %chembl_id, "Starting drug query");

    let drug = source
        .resolve_drug(&chembl_id)
        .await
        .map_err(|e| SaferError::Source(format!("drug lookup for {chembl_id} failed: {e}")))?
        .ok_or_else(|| SaferError::DrugNotFound(chembl_id.clone()))?;
    emit("resolve", format!("Resolved {}", drug.name.as_deref().unwrap_or(&chembl_id)));

    // ── 2. Targets ────────────────────────────────────────────────────────────
    let targets = source
        .drug_targets(&chembl_id)
        .await
        .map_err(|e| SaferError::Source(format!("target lookup for {chembl_id} failed: {e}")))?;
    let target_ids = unique_target_ids(&targets);
    if target_ids.is_empty() {
        warn!(chembl_id = %chembl_id, "Drug has no human gene targets");
    }
    info!(targets = target_ids.len(), "Targets enumerated");
    emit("targets", format!("{} targets", target_ids.len()));

    // ── 3. Evidence (concurrent) ──────────────────────────────────────────────
    let (fanout, indications, signals) = tokio::join!(
        fetch_target_associations(source, &target_ids, &cfg.fanout),
        source.drug_indications(&chembl_id),
        source.safety_signals(&chembl_id),
    );
    let (per_target, fetch_report) = fanout;

    let indications = match indications {
        Ok(records) => DrugIndications::from_records(records),
        Err(e) => {
            warn!("Indication source unavailable, filtering nothing: {e}");
            DrugIndications::default()
        }
    };
    let signals: Vec<SafetySignal> = signals.unwrap_or_else(|e| {
        warn!("Safety source unavailable, assuming no signals: {e}");
        Vec::new()
    });
    emit(
        "evidence",
        format!(
            "{}/{} targets fetched, {} adverse events",
            fetch_report.targets_succeeded,
            fetch_report.targets_attempted,
            signals.len()
        ),
    );

    // ── 4. Core ───────────────────────────────────────────────────────────────
    let known = indications.disease_ids();
    let aggregated = aggregate_disease_associations(&per_target);
    let diseases = label_indications(&aggregated, &known);
    let candidates = filter_known_indications(&aggregated, &known);
    let ranked = rank_diseases(&candidates);
    info!(
        aggregated = aggregated.len(),
        candidates = candidates.len(),
        known = known.len(),
        "Diseases aggregated and filtered"
    );

    let safety_summary = normalize_safety_signals(&signals, &cfg.policy.thresholds);
    let results = apply_safety_penalty(&ranked, &safety_summary, &cfg.policy.penalties);
    info!(risk_level = %safety_summary.risk_level, results = results.len(), "Candidates rescored");

    let family_risk = cfg.family_risk.then(|| {
        compute_family_risk(cfg.policy.families.family_names().as_slice(), &signals, &cfg.policy.families)
    });
    emit("rank", format!("{} repurposing candidates", results.len()));

    let duration_ms = t0.elapsed().as_millis() as u64;
    info!(query_id = %query_id, duration_ms, "Drug query complete");

    Ok(SaferReport {
        query_id,
        generated_at: Utc::now(),
        drug,
        targets,
        indications,
        diseases,
        results,
        safety_summary,
        family_risk,
        fetch_report,
        duration_ms,
    })
}
