//! Reviewed precedent cases and their split into retrievable chunks.

use serde::{Deserialize, Serialize};

use crate::case::CaseMeta;
use crate::de::{lenient_seq, null_default, opt_text, text_or_empty};

/// A previously reviewed case, as curated by the second-level reviewers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrecedentCase {
    #[serde(default, deserialize_with = "opt_text")]
    pub case_id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub meta: CaseMeta,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub fingerprint: String,
    #[serde(default, deserialize_with = "null_default")]
    pub key_fields: KeyFields,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub ec_summary: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub review_notes: String,
    /// Things reviewers decided must not be flagged.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub exceptions: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub flow_summary: String,
}

impl PrecedentCase {
    pub fn id(&self) -> &str {
        self.case_id.as_deref().unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyFields {
    #[serde(default, deserialize_with = "opt_text")]
    pub survey_no: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub house_no: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub extent: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub extent_unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub doc_nos: Vec<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub deed_types: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub mortgage_flag: bool,
}

/// Render key fields as `Label: value | Label: value`.
pub fn format_key_fields(fields: &KeyFields) -> String {
    let mut parts = Vec::new();
    if let Some(survey) = &fields.survey_no {
        parts.push(format!("Survey No: {survey}"));
    }
    if let Some(house) = &fields.house_no {
        parts.push(format!("House No: {house}"));
    }
    if let Some(extent) = &fields.extent {
        let unit = fields.extent_unit.as_deref().unwrap_or_default();
        parts.push(format!("Extent: {extent} {unit}").trim_end().to_string());
    }
    if !fields.doc_nos.is_empty() {
        parts.push(format!("Documents: {}", fields.doc_nos.join(", ")));
    }
    if !fields.deed_types.is_empty() {
        parts.push(format!("Deed Types: {}", fields.deed_types.join(", ")));
    }
    if fields.mortgage_flag {
        parts.push("Mortgage: Active".to_string());
    }
    parts.join(" | ")
}

// ── Chunks ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    Fingerprint,
    KeyFields,
    EcSummary,
    ReviewNotes,
    Exceptions,
    FlowSummary,
}

impl ChunkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fingerprint => "fingerprint",
            Self::KeyFields => "key_fields",
            Self::EcSummary => "ec_summary",
            Self::ReviewNotes => "review_notes",
            Self::Exceptions => "exceptions",
            Self::FlowSummary => "flow_summary",
        }
    }
}

/// Title-case a snake_case chunk type: `key_fields` → `Key Fields`.
pub fn chunk_type_title(chunk_type: &str) -> String {
    chunk_type
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Metadata shared by every chunk of one precedent. The store filters on
/// `state`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub case_id: String,
    pub state: String,
    pub district: String,
    pub sro: String,
    pub survey_no: String,
    pub extent: String,
    /// Comma-joined deed types.
    pub deed_types: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecedentChunk {
    /// Stable upsert key: `<case_id>_<chunk_type>`.
    pub id: String,
    pub chunk_type: ChunkType,
    pub text: String,
    pub metadata: ChunkMetadata,
}

/// Split a precedent into typed chunks for embedding. Parts with no content
/// produce no chunk.
pub fn chunk_precedent(precedent: &PrecedentCase) -> Vec<PrecedentChunk> {
    let case_id = precedent.id().to_string();
    let key = &precedent.key_fields;
    let metadata = ChunkMetadata {
        case_id: case_id.clone(),
        state: precedent.meta.state.clone().unwrap_or_default(),
        district: precedent.meta.district.clone().unwrap_or_default(),
        sro: precedent.meta.sro.clone().unwrap_or_default(),
        survey_no: key.survey_no.clone().unwrap_or_default(),
        extent: key.extent.clone().unwrap_or_default(),
        deed_types: key.deed_types.join(","),
    };

    let labelled = |label: &str, body: &str| {
        (!body.trim().is_empty()).then(|| format!("{label}: {body}"))
    };
    let parts = [
        (
            ChunkType::Fingerprint,
            (!precedent.fingerprint.trim().is_empty()).then(|| precedent.fingerprint.clone()),
        ),
        (ChunkType::KeyFields, {
            let text = format_key_fields(key);
            (!text.is_empty()).then_some(text)
        }),
        (ChunkType::EcSummary, labelled("EC Summary", &precedent.ec_summary)),
        (ChunkType::ReviewNotes, labelled("L2 Review Notes", &precedent.review_notes)),
        (
            ChunkType::Exceptions,
            labelled("Exceptions (do not flag)", &precedent.exceptions),
        ),
        (
            ChunkType::FlowSummary,
            labelled("Title Flow Summary", &precedent.flow_summary),
        ),
    ];

    let chunks: Vec<PrecedentChunk> = parts
        .into_iter()
        .filter_map(|(chunk_type, text)| {
            text.map(|text| PrecedentChunk {
                id: format!("{case_id}_{}", chunk_type.as_str()),
                chunk_type,
                text,
                metadata: metadata.clone(),
            })
        })
        .collect();
    tracing::debug!(case_id = %case_id, chunks = chunks.len(), "chunked precedent");
    chunks
}
