//! Report-field parser: direct mapping from the maker's report.

use deedcheck_core::record::{CaseInfo, PropertyDetails, ScheduleDetails, ScrutinizedDocument};
use deedcheck_core::{
    Boundaries, Direction, ExtractedReportRecord, ReportJson, normalize_doc_no,
    normalize_survey_no,
};

use crate::patterns::non_blank;

pub fn parse_report(report: &ReportJson) -> ExtractedReportRecord {
    let property_details = PropertyDetails {
        code: report.code.clone(),
        applicant: report.applicant.clone(),
        owner: report.owner_name.clone(),
        doc_no: normalized(&report.registration_no, normalize_doc_no),
        deed_type: report.nature_of_deed.clone(),
        sro: report.registered_sro.clone(),
        survey_no: normalized(&report.survey_no_deed, normalize_survey_no),
        house_no: report.house_no_old.clone().or_else(|| report.house_no_gp.clone()),
        flat_no: report.flat_no.clone().or_else(|| report.flat_no_deed.clone()),
        plot_no: report.plot_no.clone(),
        assessment_no: report.assessment_no.clone(),
        extent: report.property_extent.clone(),
        village: report.alias_name.clone(),
        taluk: report.taluk.clone(),
        district: report.district.clone(),
        state: report.state.clone(),
        mutation: report.mutation.clone(),
        accessibility: report.accessibility.clone(),
        document_age: report.document_age.clone(),
        loan_amount: report.loan_amount.clone(),
        property_type: report.property_type.clone(),
    };

    let mut boundaries = Boundaries::default();
    let first = report.boundaries.first();
    if let Some(b) = first {
        for (direction, value) in [
            (Direction::North, &b.north),
            (Direction::South, &b.south),
            (Direction::East, &b.east),
            (Direction::West, &b.west),
        ] {
            if let Some(value) = value {
                boundaries.fill(direction, value);
            }
        }
    }

    let schedule = ScheduleDetails {
        schedule_no: first.and_then(|b| b.schedule_no.clone()),
        survey_no: property_details.survey_no.clone(),
        house_no: property_details.house_no.clone(),
        extent: property_details.extent.clone(),
        village: property_details.village.clone(),
        district: property_details.district.clone(),
        state: property_details.state.clone(),
    };

    let case_info = CaseInfo {
        branch: report.branch.clone(),
        lan: report.lan.clone(),
        policy: report.policy.clone(),
        mortgagor_relationship: report.mortgagor_relationship.clone(),
    };

    let sections_text = report
        .sections
        .iter()
        .filter_map(|s| s.content.as_deref().and_then(non_blank))
        .collect();

    let documents_scrutinized = report
        .required_documents
        .iter()
        .map(|d| ScrutinizedDocument {
            doc_type: d.doc_type.clone(),
            number: d.doc_number.clone(),
            date: d.doc_date.clone(),
            subtype: d.sub_type.clone(),
        })
        .collect();

    tracing::debug!(
        doc_no = ?property_details.doc_no,
        survey_no = ?property_details.survey_no,
        "parsed report"
    );

    ExtractedReportRecord {
        property_details,
        case_info,
        schedule,
        boundaries,
        sections_text,
        documents_scrutinized,
    }
}

fn normalized(value: &Option<String>, normalize: fn(&str) -> String) -> Option<String> {
    value.as_deref().map(normalize).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deedcheck_core::RawCase;

    fn report(json: &str) -> ReportJson {
        RawCase::from_json(&format!(r#"{{"reportJson": {json}}}"#))
            .unwrap()
            .report_json
    }

    #[test]
    fn maps_and_normalises() {
        let parsed = parse_report(&report(
            r#"{
                "ownerName1": "Lakshmi Devi",
                "registrationNo": "01101 of 2026",
                "surveyNoDeed": "Sy. No. 212/A",
                "houseNoGP": "5-87",
                "flatNoDeed": "F2",
                "aliasName": "Kapra",
                "state": "Telangana",
                "loanAmount": 1500000,
                "branch": "Hyderabad",
                "mortgagorRelationship": "Self",
                "boundaries": [
                    {"scheduleNo": 1, "boundaryN": "Road", "boundaryS": " ", "boundaryE": "House of Ravi"},
                    {"boundaryN": "Ignored"}
                ],
                "sections": [{"content": "Title is clear"}, {"content": ""}, {}],
                "requiredDocuments": [{"docType": "Gift Deed", "docNumber": "1101/2026", "subType": "Original"}]
            }"#,
        ));
        let pd = &parsed.property_details;
        assert_eq!(pd.owner.as_deref(), Some("Lakshmi Devi"));
        assert_eq!(pd.doc_no.as_deref(), Some("1101/2026"));
        assert_eq!(pd.survey_no.as_deref(), Some("212/A"));
        assert_eq!(pd.house_no.as_deref(), Some("5-87"));
        assert_eq!(pd.flat_no.as_deref(), Some("F2"));
        assert_eq!(pd.loan_amount.as_deref(), Some("1500000"));
        assert_eq!(parsed.case_info.branch.as_deref(), Some("Hyderabad"));
        assert_eq!(parsed.case_info.mortgagor_relationship.as_deref(), Some("Self"));

        assert_eq!(parsed.boundaries.north.as_deref(), Some("Road"));
        assert_eq!(parsed.boundaries.south, None);
        assert_eq!(parsed.boundaries.east.as_deref(), Some("House of Ravi"));
        assert_eq!(parsed.schedule.schedule_no.as_deref(), Some("1"));
        assert_eq!(parsed.schedule.village.as_deref(), Some("Kapra"));
        assert_eq!(parsed.schedule.survey_no.as_deref(), Some("212/A"));

        assert_eq!(parsed.sections_text, vec!["Title is clear".to_string()]);
        assert_eq!(parsed.documents_scrutinized.len(), 1);
        assert_eq!(parsed.documents_scrutinized[0].subtype.as_deref(), Some("Original"));
    }

    #[test]
    fn old_house_number_preferred() {
        let parsed = parse_report(&report(r#"{"houseNoOld": "1-2", "houseNoGP": "5-87"}"#));
        assert_eq!(parsed.property_details.house_no.as_deref(), Some("1-2"));
    }

    #[test]
    fn label_only_survey_is_absent() {
        let parsed = parse_report(&report(r#"{"surveyNoDeed": "Survey No."}"#));
        assert_eq!(parsed.property_details.survey_no, None);
    }

    #[test]
    fn empty_report() {
        let parsed = parse_report(&ReportJson::default());
        assert_eq!(parsed, ExtractedReportRecord::default());
    }
}
