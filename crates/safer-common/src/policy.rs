//! Risk policy for safety-aware rescoring.
//!
//! Thresholds, penalty factors and the target-family vocabulary are plain
//! configuration so alternative policies can be evaluated without code changes.
//! Policies can be loaded from TOML, YAML or JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::entities::RiskLevel;
use crate::error::{Result, SaferError};

/// Complete risk policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskPolicy {
    /// Signal-strength classification thresholds
    #[serde(default)]
    pub thresholds: RiskThresholds,

    /// Risk tier → multiplicative penalty
    #[serde(default)]
    pub penalties: PenaltyTable,

    /// Keyword vocabulary for target-family bucketing
    #[serde(default)]
    pub families: FamilyVocabulary,
}

impl RiskPolicy {
    /// Load a policy file, picking the format from the extension
    /// (`.toml`, `.yaml`/`.yml`, otherwise JSON).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SaferError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let policy = match ext.as_str() {
            "toml" => toml::from_str(&content)
                .map_err(|e| SaferError::Config(format!("Invalid TOML policy: {}", e)))?,
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| SaferError::Config(format!("Invalid YAML policy: {}", e)))?,
            _ => serde_json::from_str(&content)?,
        };

        Ok(policy)
    }
}

// ── Thresholds ────────────────────────────────────────────────────────────────

/// Fixed thresholds applied to adverse-event signal strengths (logLR).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// max_signal at or above this is HIGH
    #[serde(default = "default_high_signal")]
    pub high_signal: f64,

    /// max_signal at or above this (and below `high_signal`) is MEDIUM
    #[serde(default = "default_medium_signal")]
    pub medium_signal: f64,

    /// An individual event at or above this is listed as high risk
    #[serde(default = "default_high_risk_event")]
    pub high_risk_event: f64,
}

fn default_high_signal()     -> f64 { 1000.0 }
fn default_medium_signal()   -> f64 { 100.0 }
fn default_high_risk_event() -> f64 { 500.0 }

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high_signal: default_high_signal(),
            medium_signal: default_medium_signal(),
            high_risk_event: default_high_risk_event(),
        }
    }
}

// ── Penalties ─────────────────────────────────────────────────────────────────

/// Risk tier name ("LOW", "MEDIUM", "HIGH") → penalty factor.
///
/// Keyed by name rather than by [`RiskLevel`] so partial tables deserialize
/// cleanly; a tier missing from the table gets no penalty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PenaltyTable(pub BTreeMap<String, f64>);

impl Default for PenaltyTable {
    fn default() -> Self {
        let mut table = BTreeMap::new();
        table.insert(RiskLevel::Low.as_str().to_string(), 1.0);
        table.insert(RiskLevel::Medium.as_str().to_string(), 0.75);
        table.insert(RiskLevel::High.as_str().to_string(), 0.5);
        Self(table)
    }
}

impl PenaltyTable {
    /// Penalty for a tier. Unknown tiers fail open with 1.0.
    pub fn penalty_for(&self, level: RiskLevel) -> f64 {
        self.0.get(level.as_str()).copied().unwrap_or(1.0)
    }
}

// ── Target families ───────────────────────────────────────────────────────────

/// One biological target family and the event keywords that map to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyRule {
    pub family: String,
    /// Lower-case substrings matched against the lower-cased event text
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyVocabulary(pub Vec<FamilyRule>);

impl Default for FamilyVocabulary {
    fn default() -> Self {
        let rule = |family: &str, keywords: &[&str]| FamilyRule {
            family: family.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        };
        Self(vec![
            rule("Inflammatory", &["haemorrhage", "hemorrhage", "bleeding"]),
            rule("Cardiovascular", &["cardiac", "heart"]),
            rule("Metabolic", &["diabetes", "glucose"]),
            rule("Immune", &["infection", "immune"]),
        ])
    }
}

impl FamilyVocabulary {
    /// All family names in vocabulary order.
    pub fn family_names(&self) -> Vec<String> {
        self.0.iter().map(|r| r.family.clone()).collect()
    }

    /// Families whose keywords appear in `event` (case-insensitive).
    pub fn matching_families<'a>(&'a self, event: &str) -> impl Iterator<Item = &'a str> + 'a {
        let event = event.to_lowercase();
        self.0
            .iter()
            .filter(move |rule| {
                rule.keywords
                    .iter()
                    .any(|k| event.contains(k.to_lowercase().as_str()))
            })
            .map(|rule| rule.family.as_str())
    }
}
