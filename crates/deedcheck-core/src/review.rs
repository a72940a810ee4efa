//! The review object exchanged with the critic stage.
//!
//! Issues are deliberately loose: every scalar is optional so that a
//! half-formed critic response still parses and can be reconciled. Strictness
//! lives in the validator, not here.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::de::opt_text;

// ── Severity and risk ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Self::Critical, Self::Major, Self::Minor];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "critical" => Some(Self::Critical),
            "major" => Some(Self::Major),
            "minor" => Some(Self::Minor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Major => "major",
            Self::Minor => "minor",
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 3,
            Self::Major => 2,
            Self::Minor => 1,
        }
    }
}

/// Rank used when comparing duplicate issues.
///
/// A missing severity counts as minor; an unrecognised label ranks below
/// everything.
pub fn severity_rank(label: Option<&str>) -> u8 {
    match label {
        None => Severity::Minor.rank(),
        Some(label) => Severity::from_label(label).map_or(0, |s| s.rank()),
    }
}

/// Overall verdict for a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Ok,
    NeedsFixBeforeRelease,
    Blocker,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [Self::Ok, Self::NeedsFixBeforeRelease, Self::Blocker];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NeedsFixBeforeRelease => "NEEDS_FIX_BEFORE_RELEASE",
            Self::Blocker => "BLOCKER",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == label)
    }

    /// `"OK" | "NEEDS_FIX_BEFORE_RELEASE" | "BLOCKER"`, for prompt text.
    pub fn choices() -> String {
        Self::ALL
            .iter()
            .map(|r| format!("\"{}\"", r.as_str()))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

// ── Sections ──

/// The eight fixed sections of a title-scrutiny review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    PropertyDetails,
    ScheduleOfProperty,
    DocumentsScrutinized,
    EncumbranceCertificate,
    FlowOfTitle,
    MutationAndTax,
    ConclusionAndRemarks,
    LayoutAndFlowchart,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Self::PropertyDetails,
        Self::ScheduleOfProperty,
        Self::DocumentsScrutinized,
        Self::EncumbranceCertificate,
        Self::FlowOfTitle,
        Self::MutationAndTax,
        Self::ConclusionAndRemarks,
        Self::LayoutAndFlowchart,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::PropertyDetails => "property_details",
            Self::ScheduleOfProperty => "schedule_of_property",
            Self::DocumentsScrutinized => "documents_scrutinized",
            Self::EncumbranceCertificate => "encumbrance_certificate",
            Self::FlowOfTitle => "flow_of_title",
            Self::MutationAndTax => "mutation_and_tax",
            Self::ConclusionAndRemarks => "conclusion_and_remarks",
            Self::LayoutAndFlowchart => "layout_and_flowchart",
        }
    }

    /// Two-letter issue-id prefix.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::PropertyDetails => "PD",
            Self::ScheduleOfProperty => "SP",
            Self::DocumentsScrutinized => "DS",
            Self::EncumbranceCertificate => "EC",
            Self::FlowOfTitle => "FT",
            Self::MutationAndTax => "MT",
            Self::ConclusionAndRemarks => "CR",
            Self::LayoutAndFlowchart => "LF",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }
}

/// Issue-id prefix for a section key; `XX` for keys outside the fixed set.
pub fn section_prefix(key: &str) -> &'static str {
    Section::from_key(key).map_or("XX", |s| s.prefix())
}

// ── Issues ──

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub from_report: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub from_source_docs: Option<String>,
}

impl Evidence {
    /// Both sides present and non-blank.
    pub fn is_complete(&self) -> bool {
        let filled = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&self.from_report) && filled(&self.from_source_docs)
    }
}

/// One finding raised against the maker's report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub message_for_maker: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
    #[serde(default, deserialize_with = "lenient_evidence", skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
    /// Any other keys the critic attached, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Issue {
    pub fn severity_rank(&self) -> u8 {
        severity_rank(self.severity.as_deref())
    }

    pub fn from_report(&self) -> &str {
        self.evidence
            .as_ref()
            .and_then(|e| e.from_report.as_deref())
            .unwrap_or_default()
    }

    pub fn has_complete_evidence(&self) -> bool {
        self.evidence.as_ref().is_some_and(Evidence::is_complete)
    }
}

fn lenient_evidence<'de, D>(deserializer: D) -> Result<Option<Evidence>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

// ── Review object ──

/// The critic's verdict: summary, risk level and issues per section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewObject {
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub overall_summary: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub overall_risk_level: Option<String>,
    #[serde(default, deserialize_with = "section_map")]
    pub sections: BTreeMap<String, Vec<Issue>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ReviewObject {
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn issue_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    /// Per-section severity counts, in fixed section order followed by any
    /// unexpected sections.
    pub fn summary(&self) -> ReviewSummary {
        let mut sections: Vec<SectionCounts> = Section::ALL
            .iter()
            .map(|s| SectionCounts::tally(s.key(), self.sections.get(s.key())))
            .collect();
        sections.extend(
            self.sections
                .iter()
                .filter(|(key, _)| Section::from_key(key).is_none())
                .map(|(key, issues)| SectionCounts::tally(key, Some(issues))),
        );
        ReviewSummary {
            risk_level: self.overall_risk_level.clone(),
            total: self.issue_count(),
            sections,
        }
    }
}

/// Sections must be arrays; elements that are not issue-shaped become empty
/// issues, which the evidence filter later drops.
fn section_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<Issue>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(map) = Option::<BTreeMap<String, Value>>::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    map.into_iter()
        .map(|(key, value)| match value {
            Value::Array(items) => {
                let issues = items
                    .into_iter()
                    .map(|item| serde_json::from_value(item).unwrap_or_default())
                    .collect();
                Ok((key, issues))
            }
            other => Err(D::Error::custom(format!(
                "section `{key}` must be an array, found {}",
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Summary ──

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionCounts {
    pub section: String,
    pub total: usize,
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
}

impl SectionCounts {
    fn tally(section: &str, issues: Option<&Vec<Issue>>) -> Self {
        let mut counts = Self {
            section: section.to_string(),
            ..Default::default()
        };
        for issue in issues.into_iter().flatten() {
            counts.total += 1;
            match issue.severity.as_deref().and_then(Severity::from_label) {
                Some(Severity::Critical) => counts.critical += 1,
                Some(Severity::Major) => counts.major += 1,
                Some(Severity::Minor) => counts.minor += 1,
                None => {}
            }
        }
        counts
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub risk_level: Option<String>,
    pub total: usize,
    pub sections: Vec<SectionCounts>,
}
