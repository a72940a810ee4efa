//! Source parsers and cross-source views for deedcheck.
//!
//! A [`RawCase`] is parsed once into a [`ParsedCase`]: three independent
//! partial records plus routing metadata. The fingerprint and the case
//! extract are both pure functions of that parsed form.

pub mod case_extract;
pub mod deed;
pub mod ec;
pub mod fingerprint;
pub mod noise;
pub mod patterns;
pub mod report;
pub mod state;
pub mod text;

pub use case_extract::{CaseExtract, build_case_extract};
pub use deed::parse_deed;
pub use ec::{EntryParser, parse_ec};
pub use fingerprint::build_fingerprint;
pub use report::parse_report;
pub use state::detect_state;

use deedcheck_core::{
    CaseMeta, ExtractedDeedRecord, ExtractedEcRecord, ExtractedReportRecord, RawCase,
};
use serde::Serialize;

/// The three extracted records of one case.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedCase {
    pub deed: ExtractedDeedRecord,
    pub ec: ExtractedEcRecord,
    pub report: ExtractedReportRecord,
    #[serde(skip)]
    pub meta: CaseMeta,
}

impl ParsedCase {
    /// Run the three parsers. They share no state, so order is irrelevant.
    pub fn parse(case: &RawCase) -> Self {
        let parsed = Self {
            deed: parse_deed(&case.attachments),
            ec: parse_ec(&case.encumbrance_details),
            report: parse_report(&case.report_json),
            meta: case.meta.clone(),
        };
        tracing::info!(
            attachments = case.attachments.len(),
            ec_entries = case.encumbrance_details.len(),
            state = parsed.ec.detected_state.as_str(),
            "parsed case"
        );
        parsed
    }

    /// State filter for precedent retrieval: the intake metadata first, then
    /// the report, then the detected EC format.
    pub fn state_filter(&self) -> Option<String> {
        self.meta
            .state
            .clone()
            .or_else(|| self.report.property_details.state.clone())
            .or_else(|| self.ec.detected_state.display_name().map(str::to_string))
    }

    pub fn fingerprint(&self) -> String {
        build_fingerprint(self)
    }

    pub fn case_extract(&self) -> CaseExtract {
        build_case_extract(self)
    }
}
