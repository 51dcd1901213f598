//! In-memory evidence source for tests and offline runs.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use safer_common::entities::{
    AssociationRecord, CanonicalTarget, DirectionOfEffect, DrugMetadata, IndicationRecord,
    SafetySignal,
};

use super::{AssociationSource, DrugResolver, IndicationSource, SafetySignalSource, TargetEnumerator};

/// Mock source with hardcoded evidence for one drug.
pub struct MockEvidenceSource {
    drug: Option<DrugMetadata>,
    targets: Vec<CanonicalTarget>,
    associations: HashMap<String, Vec<AssociationRecord>>,
    failing_targets: HashSet<String>,
    delays: HashMap<String, Duration>,
    indications: Vec<IndicationRecord>,
    signals: Vec<SafetySignal>,
    fail_targets_lookup: bool,
    fail_indications: bool,
    fail_signals: bool,
}

impl MockEvidenceSource {
    /// Source that knows `chembl_id` and nothing else yet.
    pub fn new(chembl_id: &str) -> Self {
        Self {
            drug: Some(DrugMetadata {
                chembl_id: chembl_id.to_string(),
                name: Some(format!("{chembl_id} (mock)")),
                drug_type: Some("Small molecule".to_string()),
                description: None,
                max_clinical_phase: Some(4.0),
            }),
            targets: Vec::new(),
            associations: HashMap::new(),
            failing_targets: HashSet::new(),
            delays: HashMap::new(),
            indications: Vec::new(),
            signals: Vec::new(),
            fail_targets_lookup: false,
            fail_indications: false,
            fail_signals: false,
        }
    }

    /// Source that has never heard of any drug.
    pub fn unknown_drug() -> Self {
        Self { drug: None, ..Self::new("") }
    }

    fn push_target(&mut self, target_id: &str, symbol: &str) {
        self.targets.push(CanonicalTarget {
            ensembl_id: target_id.to_string(),
            gene_symbol: symbol.to_string(),
            action_type: Some("INHIBITOR".to_string()),
            mechanism: None,
            direction_of_effect: DirectionOfEffect::LossOfFunction,
        });
    }

    /// Add a target and its disease associations.
    pub fn with_target(mut self, target_id: &str, symbol: &str, records: Vec<AssociationRecord>) -> Self {
        self.push_target(target_id, symbol);
        self.associations.insert(target_id.to_string(), records);
        self
    }

    /// Add a target whose association fetch fails.
    pub fn with_failing_target(mut self, target_id: &str, symbol: &str) -> Self {
        self.push_target(target_id, symbol);
        self.failing_targets.insert(target_id.to_string());
        self
    }

    /// Add a target that answers only after `delay`.
    pub fn with_slow_target(
        mut self,
        target_id: &str,
        symbol: &str,
        delay: Duration,
        records: Vec<AssociationRecord>,
    ) -> Self {
        self.delays.insert(target_id.to_string(), delay);
        self.with_target(target_id, symbol, records)
    }

    /// Add a target the drug acts on but the association source has never seen.
    pub fn with_unknown_target(mut self, target_id: &str, symbol: &str) -> Self {
        self.push_target(target_id, symbol);
        self
    }

    pub fn with_indication(mut self, disease_id: &str, name: &str, max_phase: f64) -> Self {
        self.indications.push(IndicationRecord {
            disease_id: disease_id.to_string(),
            disease_name: Some(name.to_string()),
            max_phase: Some(max_phase),
            therapeutic_areas: Vec::new(),
        });
        self
    }

    pub fn with_signals(mut self, signals: Vec<SafetySignal>) -> Self {
        self.signals = signals;
        self
    }

    pub fn failing_target_lookup(mut self) -> Self {
        self.fail_targets_lookup = true;
        self
    }

    pub fn failing_indications(mut self) -> Self {
        self.fail_indications = true;
        self
    }

    pub fn failing_signals(mut self) -> Self {
        self.fail_signals = true;
        self
    }
}

#[async_trait]
impl DrugResolver for MockEvidenceSource {
    async fn resolve_drug(&self, chembl_id: &str) -> anyhow::Result<Option<DrugMetadata>> {
        Ok(self.drug.clone().filter(|d| d.chembl_id == chembl_id))
    }
}

#[async_trait]
impl TargetEnumerator for MockEvidenceSource {
    async fn drug_targets(&self, chembl_id: &str) -> anyhow::Result<Vec<CanonicalTarget>> {
        if self.fail_targets_lookup {
            bail!("mechanism source unavailable for {}", chembl_id);
        }
        Ok(self.targets.clone())
    }
}

#[async_trait]
impl AssociationSource for MockEvidenceSource {
    async fn target_associations(&self, target_id: &str) -> anyhow::Result<Vec<AssociationRecord>> {
        if let Some(delay) = self.delays.get(target_id) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_targets.contains(target_id) {
            bail!("association source unavailable for {}", target_id);
        }
        self.associations
            .get(target_id)
            .cloned()
            .ok_or_else(|| anyhow!("Target {} not found", target_id))
    }
}

#[async_trait]
impl IndicationSource for MockEvidenceSource {
    async fn drug_indications(&self, chembl_id: &str) -> anyhow::Result<Vec<IndicationRecord>> {
        if self.fail_indications {
            bail!("indication source unavailable for {}", chembl_id);
        }
        Ok(self.indications.clone())
    }
}

#[async_trait]
impl SafetySignalSource for MockEvidenceSource {
    async fn safety_signals(&self, chembl_id: &str) -> anyhow::Result<Vec<SafetySignal>> {
        if self.fail_signals {
            bail!("safety source unavailable for {}", chembl_id);
        }
        Ok(self.signals.clone())
    }
}
