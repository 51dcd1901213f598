/// Core record types flowing through the repurposing pipeline.
/// Every stage builds new records; nothing is mutated after construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Target → disease evidence
// ---------------------------------------------------------------------------

/// One target–disease association as reported by an evidence source.
///
/// `disease_id` and `association_score` are required by the aggregator but kept
/// optional here so a malformed upstream row can still be represented (and then
/// dropped) instead of failing the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRecord {
    pub disease_id: Option<String>,
    pub disease_name: Option<String>,
    pub association_score: Option<f64>,
}

impl AssociationRecord {
    pub fn new(disease_id: &str, disease_name: Option<&str>, association_score: f64) -> Self {
        Self {
            disease_id: Some(disease_id.to_string()),
            disease_name: disease_name.map(String::from),
            association_score: Some(association_score),
        }
    }
}

/// A disease after evidence from every target has been merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedDisease {
    pub disease_id: String,
    pub disease_name: Option<String>,
    /// Maximum association score seen across all contributing targets.
    pub association_score: f64,
    /// Sorted, non-empty list of targets that reported this disease.
    pub supporting_targets: Vec<String>,
}

/// Ranked diseases carry no extra fields, only a new order.
pub type RankedDisease = AggregatedDisease;

// ---------------------------------------------------------------------------
// Indication status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicationStatus {
    KnownIndication,
    RepurposingCandidate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledDisease {
    #[serde(flatten)]
    pub disease: AggregatedDisease,
    pub status: IndicationStatus,
}

/// A drug indication with its clinical phase and therapeutic areas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicationRecord {
    pub disease_id: String,
    pub disease_name: Option<String>,
    pub max_phase: Option<f64>,
    #[serde(default)]
    pub therapeutic_areas: Vec<String>,
}

/// Indications split by development stage. Phase 4 means approved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugIndications {
    pub approved: Vec<IndicationRecord>,
    pub investigational: Vec<IndicationRecord>,
}

impl DrugIndications {
    pub fn from_records(records: Vec<IndicationRecord>) -> Self {
        let (approved, investigational) = records
            .into_iter()
            .partition(|r| r.max_phase.map(|p| p >= 4.0).unwrap_or(false));
        Self { approved, investigational }
    }

    /// Disease ids across both buckets, for the known-indication filter.
    pub fn disease_ids(&self) -> std::collections::HashSet<String> {
        self.approved
            .iter()
            .chain(self.investigational.iter())
            .map(|r| r.disease_id.clone())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Safety
// ---------------------------------------------------------------------------

/// One adverse-event signal reported for a drug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetySignal {
    pub event: String,
    pub count: Option<i64>,
    /// Log-likelihood ratio from pharmacovigilance data; absent for some events.
    pub signal_strength: Option<f64>,
}

impl SafetySignal {
    pub fn new(event: &str, signal_strength: Option<f64>) -> Self {
        Self {
            event: event.to_string(),
            count: None,
            signal_strength,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low    => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High   => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drug-level risk summary derived from adverse-event signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetySummary {
    pub max_signal: f64,
    pub mean_signal: f64,
    pub high_risk_events: Vec<String>,
    pub risk_level: RiskLevel,
}

impl Default for SafetySummary {
    /// Zero-evidence summary: no signals means LOW risk, not an error.
    fn default() -> Self {
        Self {
            max_signal: 0.0,
            mean_signal: 0.0,
            high_risk_events: Vec::new(),
            risk_level: RiskLevel::Low,
        }
    }
}

/// Final output unit: a ranked disease with its safety-adjusted score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaferResult {
    pub disease_id: String,
    pub disease_name: Option<String>,
    pub association_score: f64,
    pub supporting_targets: Vec<String>,
    pub safer_score: f64,
    pub safety_risk: RiskLevel,
}

/// Target family name → summed signal strength.
pub type FamilyRiskMap = BTreeMap<String, f64>;

// ---------------------------------------------------------------------------
// Drug identity and mechanism
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugMetadata {
    pub chembl_id: String,
    pub name: Option<String>,
    pub drug_type: Option<String>,
    pub description: Option<String>,
    pub max_clinical_phase: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionOfEffect {
    LossOfFunction,
    GainOfFunction,
    Unknown,
}

impl DirectionOfEffect {
    /// Map a mechanism action type (e.g. "INHIBITOR") to its biological direction.
    pub fn from_action_type(action_type: &str) -> Self {
        match action_type.trim().to_uppercase().as_str() {
            "INHIBITOR" | "ANTAGONIST" | "BLOCKER" => DirectionOfEffect::LossOfFunction,
            "AGONIST" | "ACTIVATOR"                => DirectionOfEffect::GainOfFunction,
            _                                      => DirectionOfEffect::Unknown,
        }
    }
}

/// A human gene target the drug acts on, canonicalized from mechanism data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTarget {
    pub ensembl_id: String,
    pub gene_symbol: String,
    pub action_type: Option<String>,
    pub mechanism: Option<String>,
    pub direction_of_effect: DirectionOfEffect,
}
