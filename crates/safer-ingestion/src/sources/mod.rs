//! Evidence source clients.
//!
//! Each upstream collaborator is a small async trait so the pipeline can run
//! against Open Targets, a mock, or any other knowledge base.

pub mod opentargets;
pub mod mock;

use async_trait::async_trait;
use safer_common::entities::{
    AssociationRecord, CanonicalTarget, DrugMetadata, IndicationRecord, SafetySignal,
};

pub use mock::MockEvidenceSource;
pub use opentargets::OpenTargetsClient;

/// Resolves a validated drug id to its metadata.
#[async_trait]
pub trait DrugResolver: Send + Sync {
    /// `Ok(None)` when the source has no record of the drug.
    async fn resolve_drug(&self, chembl_id: &str) -> anyhow::Result<Option<DrugMetadata>>;
}

/// Enumerates the molecular targets a drug acts on.
#[async_trait]
pub trait TargetEnumerator: Send + Sync {
    async fn drug_targets(&self, chembl_id: &str) -> anyhow::Result<Vec<CanonicalTarget>>;
}

/// Per-target disease associations.
#[async_trait]
pub trait AssociationSource: Send + Sync {
    /// Errors when the target is unknown to the source; a known target with
    /// no associations is `Ok(vec![])`.
    async fn target_associations(&self, target_id: &str) -> anyhow::Result<Vec<AssociationRecord>>;
}

/// Indications the drug is approved or in trials for. Every returned disease
/// counts as a known indication. Empty when the drug has none.
#[async_trait]
pub trait IndicationSource: Send + Sync {
    async fn drug_indications(&self, chembl_id: &str) -> anyhow::Result<Vec<IndicationRecord>>;
}

/// Adverse-event signals reported for a drug.
#[async_trait]
pub trait SafetySignalSource: Send + Sync {
    /// Empty when the drug has no recorded adverse events.
    async fn safety_signals(&self, chembl_id: &str) -> anyhow::Result<Vec<SafetySignal>>;
}

/// Everything the pipeline consumes, in one bound.
pub trait EvidenceSource:
    DrugResolver + TargetEnumerator + AssociationSource + IndicationSource + SafetySignalSource
{
}

impl<T> EvidenceSource for T where
    T: DrugResolver + TargetEnumerator + AssociationSource + IndicationSource + SafetySignalSource
{
}
