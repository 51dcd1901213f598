//! safer-common — Shared types, errors, and policy used across all SAFER crates.

pub mod error;
pub mod entities;
pub mod policy;
pub mod chembl;
pub mod sandbox;

// Re-export commonly used types
pub use entities::{
    AggregatedDisease, AssociationRecord, DrugMetadata, FamilyRiskMap, RankedDisease,
    RiskLevel, SaferResult, SafetySignal, SafetySummary,
};
pub use error::{Result, SaferError};
pub use policy::{FamilyVocabulary, PenaltyTable, RiskPolicy, RiskThresholds};
