//! Two-stage review: fingerprint and extract, retrieve precedents, generate,
//! critique, reconcile, validate.
//!
//! The precedent store and the model are collaborators behind traits. JSON
//! extraction from model text and retries belong to the [`LlmClient`]
//! implementation; the pipeline only sees parsed values.

use async_trait::async_trait;
use deedcheck_core::{RawCase, ReviewObject};
use deedcheck_extract::ParsedCase;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ReviewError;
use crate::prompt::{critic_prompt, generator_prompt};
use crate::reconcile::{DEFAULT_SIMILARITY_THRESHOLD, ReconcileReport, Reconciler};
use crate::retrieval::{
    PrecedentIndex, PrecedentSummary, format_precedents_for_prompt, retrieve_precedents,
};
use crate::validate::validate_review;

/// A model that answers a prompt with one JSON value.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate_json(&self, prompt: &str) -> Result<Value, ReviewError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Chunks requested from the precedent index.
    pub retrieval_k: usize,
    /// Precedent cases kept after grouping.
    pub retrieval_n: usize,
    pub similarity_threshold: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retrieval_k: 15,
            retrieval_n: 8,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// A validated review with the intermediate values that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    pub review: ReviewObject,
    pub report: ReconcileReport,
    pub fingerprint: String,
    pub precedents_used: usize,
}

pub struct ReviewPipeline<P, L> {
    index: P,
    llm: L,
    config: PipelineConfig,
}

impl<P: PrecedentIndex, L: LlmClient> ReviewPipeline<P, L> {
    pub fn new(index: P, llm: L) -> Self {
        Self::with_config(index, llm, PipelineConfig::default())
    }

    pub fn with_config(index: P, llm: L, config: PipelineConfig) -> Self {
        Self { index, llm, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn index(&self) -> &P {
        &self.index
    }

    pub fn llm(&self) -> &L {
        &self.llm
    }

    pub async fn review(&self, case: &RawCase) -> Result<ReviewOutcome, ReviewError> {
        let parsed = ParsedCase::parse(case);
        let fingerprint = parsed.fingerprint();
        let case_extract = serde_json::to_string_pretty(&parsed.case_extract())?;
        tracing::info!(%fingerprint, "stage 1/5: fingerprint and extract");

        let state = parsed.state_filter();
        let precedents: Vec<PrecedentSummary> = retrieve_precedents(
            &self.index,
            &fingerprint,
            self.config.retrieval_k,
            self.config.retrieval_n,
            state.as_deref(),
        )
        .await?;
        let precedent_text = format_precedents_for_prompt(&precedents);
        tracing::info!(precedents = precedents.len(), "stage 2/5: precedents retrieved");

        let candidate = self
            .llm
            .generate_json(&generator_prompt(&case_extract, &precedent_text))
            .await?;
        tracing::info!(
            candidate_issues = count_issues(&candidate),
            "stage 3/5: generator finished"
        );

        let candidate_json = serde_json::to_string_pretty(&candidate)?;
        let critic = self
            .llm
            .generate_json(&critic_prompt(&case_extract, &precedent_text, &candidate_json))
            .await?;
        tracing::info!(issues = count_issues(&critic), "stage 4/5: critic finished");

        let mut review = ReviewObject::from_value(critic)?;
        let report = Reconciler::new(self.config.similarity_threshold).reconcile(&mut review);
        validate_review(&review)?;
        tracing::info!(
            risk = review.overall_risk_level.as_deref().unwrap_or_default(),
            issues = report.issues_out,
            "stage 5/5: review validated"
        );

        Ok(ReviewOutcome {
            review,
            report,
            fingerprint,
            precedents_used: precedents.len(),
        })
    }
}

/// Issues in a raw model answer, counting only array-valued sections.
fn count_issues(value: &Value) -> usize {
    value
        .get("sections")
        .and_then(Value::as_object)
        .map(|sections| {
            sections
                .values()
                .filter_map(Value::as_array)
                .map(Vec::len)
                .sum()
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_defaults_and_partial_override() {
        assert_eq!(
            PipelineConfig::default(),
            PipelineConfig {
                retrieval_k: 15,
                retrieval_n: 8,
                similarity_threshold: 0.7,
            }
        );
        let config: PipelineConfig = serde_json::from_value(json!({"retrieval_n": 3})).unwrap();
        assert_eq!(config.retrieval_n, 3);
        assert_eq!(config.retrieval_k, 15);
    }

    #[test]
    fn counts_raw_issues() {
        let value = json!({"sections": {"a": [1, 2], "b": [], "c": "x"}});
        assert_eq!(count_issues(&value), 2);
        assert_eq!(count_issues(&json!("nope")), 0);
    }
}
