//! Wire types for a merged case: OCR attachments, EC entries and the maker's report.

use serde::{Deserialize, Serialize};

use crate::de::{lenient_seq, null_default, opt_text, text_or_empty};

/// One merged case as received from upstream. Never mutated after parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCase {
    /// OCR'd text blocks, in document order.
    #[serde(default, deserialize_with = "lenient_seq")]
    pub attachments: Vec<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub encumbrance_details: Vec<EcEntry>,
    #[serde(default, deserialize_with = "null_default")]
    pub report_json: ReportJson,
    #[serde(default, deserialize_with = "null_default")]
    pub meta: CaseMeta,
}

impl RawCase {
    /// Parse a case from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Optional routing metadata attached by the intake system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseMeta {
    #[serde(default, deserialize_with = "opt_text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub sro: Option<String>,
}

/// A single encumbrance-certificate row. Every sub-field is free text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcEntry {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub identifiers: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub deed_value: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub dates: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub parties: String,
}

impl EcEntry {
    /// All sub-fields in a fixed order, for scans that do not care which
    /// column a marker landed in.
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.description,
            &self.identifiers,
            &self.deed_value,
            &self.dates,
            &self.parties,
        ]
    }

    /// Sub-fields joined by newlines.
    pub fn joined(&self) -> String {
        self.fields().join("\n")
    }
}

/// The maker-drafted report: a flat field map plus three lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportJson {
    #[serde(default, deserialize_with = "opt_text")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub applicant: Option<String>,
    #[serde(default, rename = "ownerName1", deserialize_with = "opt_text")]
    pub owner_name: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub registration_no: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub nature_of_deed: Option<String>,
    #[serde(default, rename = "registeredSRO", deserialize_with = "opt_text")]
    pub registered_sro: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub survey_no_deed: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub house_no_old: Option<String>,
    #[serde(default, rename = "houseNoGP", deserialize_with = "opt_text")]
    pub house_no_gp: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub flat_no: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub flat_no_deed: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub plot_no: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub assessment_no: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub property_extent: Option<String>,
    /// The village name; upstream calls it an alias.
    #[serde(default, deserialize_with = "opt_text")]
    pub alias_name: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub taluk: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub mutation: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub accessibility: Option<String>,
    /// Upstream spelling preserved.
    #[serde(default, rename = "mortgateDocumentAge", deserialize_with = "opt_text")]
    pub document_age: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub loan_amount: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub branch: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub lan: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub policy: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub mortgagor_relationship: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub boundaries: Vec<ReportBoundary>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub sections: Vec<ReportSection>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub required_documents: Vec<RequiredDocument>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportBoundary {
    #[serde(default, deserialize_with = "opt_text")]
    pub schedule_no: Option<String>,
    #[serde(default, rename = "boundaryN", deserialize_with = "opt_text")]
    pub north: Option<String>,
    #[serde(default, rename = "boundaryS", deserialize_with = "opt_text")]
    pub south: Option<String>,
    #[serde(default, rename = "boundaryE", deserialize_with = "opt_text")]
    pub east: Option<String>,
    #[serde(default, rename = "boundaryW", deserialize_with = "opt_text")]
    pub west: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default, deserialize_with = "opt_text")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredDocument {
    #[serde(default, deserialize_with = "opt_text")]
    pub doc_type: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub doc_number: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub doc_date: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub sub_type: Option<String>,
}
