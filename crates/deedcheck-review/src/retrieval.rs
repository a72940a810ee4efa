//! Precedent retrieval over an external chunk index, and prompt formatting.
//!
//! The index returns the nearest chunks for a fingerprint; chunks are grouped
//! back into per-case summaries here, nearest case first.

use std::collections::HashMap;

use async_trait::async_trait;
use deedcheck_core::precedent::{ChunkMetadata, chunk_type_title};
use serde::{Deserialize, Serialize};

use crate::error::ReviewError;

/// One chunk returned by the index, with its distance to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkHit {
    pub id: String,
    pub chunk_type: String,
    pub text: String,
    pub metadata: ChunkMetadata,
    pub distance: f32,
}

/// An external similarity index over precedent chunks.
#[async_trait]
pub trait PrecedentIndex: Send + Sync {
    /// The `k` nearest chunks to `query`, optionally restricted to one state.
    async fn nearest_chunks(
        &self,
        query: &str,
        k: usize,
        filter_state: Option<&str>,
    ) -> Result<Vec<ChunkHit>, ReviewError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecedentChunkText {
    pub chunk_type: String,
    pub text: String,
}

/// Chunks of one precedent case, with metadata from the first chunk seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecedentSummary {
    pub case_id: String,
    pub state: String,
    pub district: String,
    pub sro: String,
    pub survey_no: String,
    pub deed_types: String,
    pub chunks: Vec<PrecedentChunkText>,
    pub min_distance: f32,
}

/// Group chunk hits by case, keep the `n` cases with the smallest distance.
///
/// Chunks keep their hit order within a case. Cases at equal distance keep
/// first-seen order.
pub fn group_precedents(hits: Vec<ChunkHit>, n: usize) -> Vec<PrecedentSummary> {
    let mut order: Vec<PrecedentSummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for hit in hits {
        let case_id = if hit.metadata.case_id.is_empty() {
            "unknown".to_string()
        } else {
            hit.metadata.case_id.clone()
        };
        let slot = *index.entry(case_id.clone()).or_insert_with(|| {
            order.push(PrecedentSummary {
                case_id,
                state: hit.metadata.state.clone(),
                district: hit.metadata.district.clone(),
                sro: hit.metadata.sro.clone(),
                survey_no: hit.metadata.survey_no.clone(),
                deed_types: hit.metadata.deed_types.clone(),
                chunks: Vec::new(),
                min_distance: hit.distance,
            });
            order.len() - 1
        });
        let summary = &mut order[slot];
        summary.min_distance = summary.min_distance.min(hit.distance);
        summary.chunks.push(PrecedentChunkText {
            chunk_type: hit.chunk_type,
            text: hit.text,
        });
    }

    order.sort_by(|a, b| a.min_distance.total_cmp(&b.min_distance));
    order.truncate(n);
    order
}

/// Fetch `k` chunks for `query` and consolidate them into at most `n` cases.
pub async fn retrieve_precedents(
    index: &dyn PrecedentIndex,
    query: &str,
    k: usize,
    n: usize,
    filter_state: Option<&str>,
) -> Result<Vec<PrecedentSummary>, ReviewError> {
    let hits = index.nearest_chunks(query, k, filter_state).await?;
    let chunk_count = hits.len();
    let precedents = group_precedents(hits, n);
    tracing::info!(
        chunks = chunk_count,
        precedents = precedents.len(),
        filter_state = filter_state.unwrap_or("-"),
        "retrieved precedents"
    );
    Ok(precedents)
}

pub const NO_PRECEDENTS: &str = "No similar precedents found.";

/// Render precedents as numbered plain-text blocks for the prompts.
pub fn format_precedents_for_prompt(precedents: &[PrecedentSummary]) -> String {
    if precedents.is_empty() {
        return NO_PRECEDENTS.to_string();
    }
    precedents
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let mut lines = vec![
                format!("--- Precedent {}: {} ---", i + 1, p.case_id),
                format!("Location: {}, {}, SRO: {}", p.state, p.district, p.sro),
                format!("Survey: {} | Deed Types: {}", p.survey_no, p.deed_types),
            ];
            lines.extend(
                p.chunks
                    .iter()
                    .map(|c| format!("[{}] {}", chunk_type_title(&c.chunk_type), c.text)),
            );
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(case_id: &str, chunk_type: &str, distance: f32) -> ChunkHit {
        ChunkHit {
            id: format!("{case_id}_{chunk_type}"),
            chunk_type: chunk_type.into(),
            text: format!("{chunk_type} of {case_id}"),
            metadata: ChunkMetadata {
                case_id: case_id.into(),
                state: "TS".into(),
                district: "Medchal".into(),
                sro: "Kapra".into(),
                survey_no: "212".into(),
                extent: "145".into(),
                deed_types: "Gift Settlement".into(),
            },
            distance,
        }
    }

    #[test]
    fn groups_by_case_and_sorts_by_min_distance() {
        let grouped = group_precedents(
            vec![
                hit("A", "fingerprint", 0.40),
                hit("B", "key_fields", 0.35),
                hit("A", "review_notes", 0.10),
                hit("C", "exceptions", 0.90),
            ],
            2,
        );
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].case_id, "A");
        assert_eq!(grouped[0].min_distance, 0.10);
        assert_eq!(grouped[0].chunks.len(), 2);
        assert_eq!(grouped[0].chunks[1].chunk_type, "review_notes");
        assert_eq!(grouped[1].case_id, "B");
    }

    #[test]
    fn blank_case_id_groups_as_unknown() {
        let grouped = group_precedents(vec![hit("", "fingerprint", 0.1)], 5);
        assert_eq!(grouped[0].case_id, "unknown");
    }

    #[test]
    fn formats_blocks() {
        let grouped = group_precedents(
            vec![hit("A", "key_fields", 0.1), hit("A", "review_notes", 0.2)],
            8,
        );
        assert_eq!(
            format_precedents_for_prompt(&grouped),
            "--- Precedent 1: A ---\n\
             Location: TS, Medchal, SRO: Kapra\n\
             Survey: 212 | Deed Types: Gift Settlement\n\
             [Key Fields] key_fields of A\n\
             [Review Notes] review_notes of A"
        );
    }

    #[test]
    fn empty_precedents() {
        assert_eq!(format_precedents_for_prompt(&[]), NO_PRECEDENTS);
    }
}
