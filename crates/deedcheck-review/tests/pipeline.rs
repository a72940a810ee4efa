use std::sync::Mutex;

use async_trait::async_trait;
use deedcheck_core::RawCase;
use deedcheck_core::precedent::ChunkMetadata;
use deedcheck_review::{
    ChunkHit, LlmClient, PrecedentIndex, ReviewError, ReviewPipeline, ValidationError,
};
use serde_json::{Value, json};

#[derive(Default)]
struct FakeIndex {
    calls: Mutex<Vec<(String, usize, Option<String>)>>,
}

#[async_trait]
impl PrecedentIndex for FakeIndex {
    async fn nearest_chunks(
        &self,
        query: &str,
        k: usize,
        filter_state: Option<&str>,
    ) -> Result<Vec<ChunkHit>, ReviewError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), k, filter_state.map(str::to_string)));
        let metadata = ChunkMetadata {
            case_id: "TS_gift_001".into(),
            state: "Telangana".into(),
            ..Default::default()
        };
        Ok(vec![ChunkHit {
            id: "TS_gift_001_review_notes".into(),
            chunk_type: "review_notes".into(),
            text: "Boundary mismatch accepted after deed check".into(),
            metadata,
            distance: 0.2,
        }])
    }
}

/// Answers the generator with `candidate` and the critic with `critic`,
/// recording both prompts.
struct ScriptedLlm {
    answers: Mutex<Vec<Value>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    fn new(candidate: Value, critic: Value) -> Self {
        Self {
            answers: Mutex::new(vec![critic, candidate]),
            prompts: Mutex::default(),
        }
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn generate_json(&self, prompt: &str) -> Result<Value, ReviewError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| ReviewError::Llm("no scripted answer left".into()))
    }
}

fn case() -> RawCase {
    RawCase::from_json(
        r#"{
            "attachments": ["GIFT SETTLEMENT DEED\nSurvey No. 212/A situated at Kapra village"],
            "encumbranceDetails": [{"description": "[N]: Road [S]: House of Ravi"}],
            "reportJson": {"state": "Telangana", "district": "Medchal", "surveyNoDeed": "212/A"},
            "meta": {"state": "TS"}
        }"#,
    )
    .unwrap()
}

fn issue(id: &str, severity: &str, from_report: &str, from_source: &str) -> Value {
    json!({
        "id": id,
        "severity": severity,
        "location": "Schedule - North boundary",
        "rule": "B. Boundaries must match deed",
        "message_for_maker": "North boundary differs from the deed",
        "suggested_fix": "Copy the boundary from the deed",
        "evidence": {"from_report": from_report, "from_source_docs": from_source}
    })
}

fn review_with(schedule: Vec<Value>) -> Value {
    json!({
        "overall_summary": "Boundary needs correction",
        "overall_risk_level": "NEEDS_FIX_BEFORE_RELEASE",
        "sections": {
            "property_details": [],
            "schedule_of_property": schedule,
            "documents_scrutinized": [],
            "encumbrance_certificate": [],
            "flow_of_title": [],
            "mutation_and_tax": [],
            "conclusion_and_remarks": [],
            "layout_and_flowchart": []
        }
    })
}

#[tokio::test]
async fn reviews_case_end_to_end() {
    let critic = review_with(vec![
        issue("X-1", "minor", "North: Road", "[N]: Road"),
        issue("X-2", "critical", "North: Road.", "[N]: Road"),
        issue("X-3", "major", "South: House of Ravi", ""),
    ]);
    let llm = ScriptedLlm::new(review_with(vec![]), critic);
    let pipeline = ReviewPipeline::new(FakeIndex::default(), llm);

    let outcome = pipeline.review(&case()).await.unwrap();

    let schedule = &outcome.review.sections["schedule_of_property"];
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].id.as_deref(), Some("SP-01"));
    assert_eq!(schedule[0].severity.as_deref(), Some("critical"));
    assert_eq!(outcome.report.duplicates_merged, 1);
    assert_eq!(outcome.report.dropped_for_evidence, 1);
    assert_eq!(outcome.precedents_used, 1);
    assert!(outcome.fingerprint.starts_with("State: Telangana"));

    let calls = pipeline_index_calls(&pipeline);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, outcome.fingerprint);
    assert_eq!(calls[0].1, 15);
    assert_eq!(calls[0].2.as_deref(), Some("TS"));
}

fn pipeline_index_calls(
    pipeline: &ReviewPipeline<FakeIndex, ScriptedLlm>,
) -> Vec<(String, usize, Option<String>)> {
    pipeline.index().calls.lock().unwrap().clone()
}

#[tokio::test]
async fn prompts_carry_precedents_and_candidate() {
    let candidate = review_with(vec![issue("TEMP-01", "major", "North: Road", "[N]: Road")]);
    let llm = ScriptedLlm::new(candidate, review_with(vec![]));
    let pipeline = ReviewPipeline::new(FakeIndex::default(), llm);
    pipeline.review(&case()).await.unwrap();

    let prompts = pipeline.llm().prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("--- Precedent 1: TS_gift_001 ---"));
    assert!(prompts[0].contains("[Review Notes] Boundary mismatch accepted"));
    assert!(prompts[1].contains("TEMP-01"));
}

#[tokio::test]
async fn invalid_risk_level_is_fatal() {
    let mut critic = review_with(vec![]);
    critic["overall_risk_level"] = json!("REJECT");
    let llm = ScriptedLlm::new(review_with(vec![]), critic);
    let err = ReviewPipeline::new(FakeIndex::default(), llm)
        .review(&case())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReviewError::Validation(ValidationError::InvalidRiskLevel(ref level)) if level == "REJECT"
    ));
}

#[tokio::test]
async fn non_array_section_is_malformed() {
    let mut critic = review_with(vec![]);
    critic["sections"]["flow_of_title"] = json!("none");
    let llm = ScriptedLlm::new(review_with(vec![]), critic);
    let err = ReviewPipeline::new(FakeIndex::default(), llm)
        .review(&case())
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::Malformed(_)));
    assert!(err.to_string().contains("flow_of_title"));
}
