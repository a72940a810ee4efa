//! Reconciliation, validation and the two-stage review pipeline for deedcheck.

pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod reconcile;
pub mod retrieval;
pub mod validate;

pub use error::{ReviewError, ValidationError};
pub use pipeline::{LlmClient, PipelineConfig, ReviewOutcome, ReviewPipeline};
pub use prompt::{critic_prompt, generator_prompt};
pub use reconcile::{ReconcileReport, Reconciler};
pub use retrieval::{
    ChunkHit, PrecedentIndex, PrecedentSummary, format_precedents_for_prompt, group_precedents,
    retrieve_precedents,
};
pub use validate::{validate_issue, validate_review};
