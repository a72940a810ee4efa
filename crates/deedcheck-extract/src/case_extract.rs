//! Cross-source comparison view for the generator prompt.
//!
//! Values are never merged here. Every leaf keeps the name of the source it
//! came from (`_report`, `_from_deed`, `_from_ec`) so the reviewer can see
//! where two sources disagree.

use deedcheck_core::record::ScrutinizedDocument;
use deedcheck_core::{Boundaries, DetectedState, Transaction};
use serde::Serialize;

use crate::ParsedCase;
use crate::fingerprint::is_doc_no_shaped;
use crate::text::truncate_text;

pub const SNIPPET_CHARS: usize = 1500;
pub const EC_DESCRIPTION_CHARS: usize = 500;
pub const SECTION_CHARS: usize = 500;
pub const MAX_SECTIONS: usize = 5;
pub const MAX_DOCUMENTS: usize = 10;
pub const MAX_TRANSACTIONS: usize = 5;

const DATES_NOTE: &str =
    "Execution date is when the deed was signed; registration date is when it was registered at the SRO";
const VALUES_NOTE: &str =
    "Market value is the government-assessed value; consideration value is the declared transaction value";

#[derive(Debug, Clone, Serialize)]
pub struct CaseExtract {
    pub case_info: CaseInfoView,
    pub owner_applicant: OwnerApplicant,
    pub title_deed: TitleDeed,
    pub dates: Dates,
    pub values: Values,
    pub schedule: Schedule,
    pub boundaries: BoundaryViews,
    pub ec_summary: EcSummary,
    pub report_sections: Vec<String>,
    pub documents_scrutinized: Vec<ScrutinizedDocument>,
    pub mutation_status_report: Option<String>,
    pub accessibility_report: Option<String>,
    pub property_type_report: Option<String>,
    pub source_doc_snippet: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseInfoView {
    pub code_report: Option<String>,
    pub branch_report: Option<String>,
    pub lan_report: Option<String>,
    pub policy_report: Option<String>,
    pub loan_amount_report: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OwnerApplicant {
    pub applicant_report: Option<String>,
    pub owner_report: Option<String>,
    pub relationship_report: Option<String>,
    pub executant_from_deed: Option<String>,
    pub claimant_from_deed: Option<String>,
    pub executant_from_ec: Option<String>,
    pub claimant_from_ec: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TitleDeed {
    pub doc_no_report: Option<String>,
    pub doc_no_from_deed: Option<String>,
    pub doc_no_from_ec: Option<String>,
    pub deed_type_report: Option<String>,
    pub deed_type_from_deed: Option<String>,
    pub deed_type_from_ec: Option<String>,
    pub sro_report: Option<String>,
    pub sro_from_deed: Option<String>,
    pub sro_from_ec: Option<String>,
    pub document_age_report: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dates {
    pub execution_date_from_deed: Option<String>,
    pub execution_date_from_ec: Option<String>,
    pub registration_date_from_deed: Option<String>,
    pub registration_date_from_ec: Option<String>,
    pub note: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Values {
    pub market_value_from_deed: Option<String>,
    pub market_value_from_ec: Option<String>,
    pub consideration_value_from_ec: Option<String>,
    pub note: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    pub survey_no_report: Option<String>,
    pub survey_no_from_deed: Option<String>,
    pub survey_no_from_ec: Option<String>,
    pub house_no_report: Option<String>,
    pub house_no_from_deed: Option<String>,
    pub house_no_from_ec: Option<String>,
    pub flat_no_report: Option<String>,
    pub plot_no_report: Option<String>,
    pub plot_no_from_ec: Option<String>,
    pub assessment_no_report: Option<String>,
    pub village_report: Option<String>,
    pub village_from_deed: Option<String>,
    pub mandal_from_deed: Option<String>,
    pub taluk_report: Option<String>,
    pub district_report: Option<String>,
    pub district_from_deed: Option<String>,
    pub state_report: Option<String>,
    pub extent_report: Option<String>,
    pub extent_from_deed: Option<String>,
    pub extent_from_ec: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoundaryViews {
    pub from_report: Boundaries,
    pub from_deed: Boundaries,
    pub from_ec: Boundaries,
}

#[derive(Debug, Clone, Serialize)]
pub struct EcSummary {
    pub detected_state: DetectedState,
    pub transactions_count: usize,
    pub transactions: Vec<Transaction>,
    pub mortgage_flag: bool,
    pub property_description: String,
}

fn survey(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !is_doc_no_shaped(v))
}

pub fn build_case_extract(case: &ParsedCase) -> CaseExtract {
    let ParsedCase {
        deed, ec, report, ..
    } = case;
    let pd = &report.property_details;
    let txn = ec.first_transaction();

    CaseExtract {
        case_info: CaseInfoView {
            code_report: pd.code.clone(),
            branch_report: report.case_info.branch.clone(),
            lan_report: report.case_info.lan.clone(),
            policy_report: report.case_info.policy.clone(),
            loan_amount_report: pd.loan_amount.clone(),
        },
        owner_applicant: OwnerApplicant {
            applicant_report: pd.applicant.clone(),
            owner_report: pd.owner.clone(),
            relationship_report: report.case_info.mortgagor_relationship.clone(),
            executant_from_deed: deed.executant.clone(),
            claimant_from_deed: deed.claimant.clone(),
            executant_from_ec: txn.and_then(|t| t.executant.clone()),
            claimant_from_ec: txn.and_then(|t| t.claimant.clone()),
        },
        title_deed: TitleDeed {
            doc_no_report: pd.doc_no.clone(),
            doc_no_from_deed: deed.doc_no.clone(),
            doc_no_from_ec: txn.and_then(|t| t.doc_no.clone()),
            deed_type_report: pd.deed_type.clone(),
            deed_type_from_deed: deed.deed_type.clone(),
            deed_type_from_ec: txn.and_then(|t| t.deed_type.clone()),
            sro_report: pd.sro.clone(),
            sro_from_deed: deed.sro.clone(),
            sro_from_ec: ec.sro.clone(),
            document_age_report: pd.document_age.clone(),
        },
        dates: Dates {
            execution_date_from_deed: deed.execution_date.clone(),
            execution_date_from_ec: txn.and_then(|t| t.execution_date.clone()),
            registration_date_from_deed: deed.registration_date.clone(),
            registration_date_from_ec: txn.and_then(|t| t.registration_date.clone()),
            note: DATES_NOTE,
        },
        values: Values {
            market_value_from_deed: deed.market_value.clone(),
            market_value_from_ec: ec.market_value.clone(),
            consideration_value_from_ec: ec.consideration_value.clone(),
            note: VALUES_NOTE,
        },
        schedule: Schedule {
            survey_no_report: survey(&report.schedule.survey_no),
            survey_no_from_deed: survey(&deed.survey_no),
            survey_no_from_ec: survey(&ec.survey_no),
            house_no_report: pd.house_no.clone().or_else(|| pd.flat_no.clone()),
            house_no_from_deed: deed.house_no.clone(),
            house_no_from_ec: ec.house_no.clone(),
            flat_no_report: pd.flat_no.clone(),
            plot_no_report: pd.plot_no.clone(),
            plot_no_from_ec: ec.plot_no.clone(),
            assessment_no_report: pd.assessment_no.clone(),
            village_report: report.schedule.village.clone(),
            village_from_deed: deed.village.clone(),
            mandal_from_deed: deed.mandal.clone(),
            taluk_report: pd.taluk.clone(),
            district_report: report.schedule.district.clone(),
            district_from_deed: deed.district.clone(),
            state_report: report.schedule.state.clone(),
            extent_report: report.schedule.extent.clone(),
            extent_from_deed: deed.extent.clone(),
            extent_from_ec: ec.extent.clone(),
        },
        boundaries: BoundaryViews {
            from_report: report.boundaries.clone(),
            from_deed: deed.boundaries.clone(),
            from_ec: ec.boundaries.clone(),
        },
        ec_summary: EcSummary {
            detected_state: ec.detected_state,
            transactions_count: ec.transactions.len(),
            transactions: ec.transactions.iter().take(MAX_TRANSACTIONS).cloned().collect(),
            mortgage_flag: ec.mortgage_flag,
            property_description: truncate_text(
                ec.property_description.as_deref().unwrap_or_default(),
                EC_DESCRIPTION_CHARS,
            ),
        },
        report_sections: report
            .sections_text
            .iter()
            .take(MAX_SECTIONS)
            .map(|s| truncate_text(s, SECTION_CHARS))
            .collect(),
        documents_scrutinized: report
            .documents_scrutinized
            .iter()
            .take(MAX_DOCUMENTS)
            .cloned()
            .collect(),
        mutation_status_report: pd.mutation.clone(),
        accessibility_report: pd.accessibility.clone(),
        property_type_report: pd.property_type.clone(),
        source_doc_snippet: truncate_text(snippet_source(case), SNIPPET_CHARS),
    }
}

/// Cleaned deed content, or the raw attachment text when cleaning left nothing.
fn snippet_source(case: &ParsedCase) -> &str {
    if case.deed.cleaned_text.trim().is_empty() {
        &case.deed.raw_text
    } else {
        &case.deed.cleaned_text
    }
}
