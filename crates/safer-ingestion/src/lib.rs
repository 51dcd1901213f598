//! safer-ingestion — Evidence retrieval and the end-to-end repurposing pipeline.
//! Covers:
//! - Evidence source traits (drug identity, targets, associations, indications, safety)
//! - Open Targets Platform GraphQL client
//! - Mechanism-of-action → target canonicalization
//! - Bounded concurrent per-target fan-out with partial-failure reporting
//! - Pipeline orchestration feeding `safer-ranker`

pub mod sources;
pub mod models;
pub mod mechanism;
pub mod fanout;
pub mod pipeline;

pub use fanout::{FanoutConfig, FetchReport, TargetFailure};
pub use pipeline::{run_pipeline, run_pipeline_cancellable, PipelineConfig, SaferReport};
pub use sources::EvidenceSource;
