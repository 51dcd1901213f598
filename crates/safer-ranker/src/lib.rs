//! safer-ranker — Evidence fusion and safety-aware disease ranking.
//!
//! Every stage here is a pure, synchronous function of its inputs:
//!   aggregate → filter known indications → rank → (safety summary) → rescore
//! with the family risk map as an auxiliary view of the safety signals.

pub mod aggregator;
pub mod filter;
pub mod ranker;
pub mod safety;
pub mod rescorer;
pub mod family_risk;
pub mod normalise;

pub use aggregator::aggregate_disease_associations;
pub use family_risk::compute_family_risk;
pub use filter::{filter_known_indications, label_indications};
pub use ranker::rank_diseases;
pub use rescorer::apply_safety_penalty;
pub use safety::{classify_risk, normalize_safety_signals};
