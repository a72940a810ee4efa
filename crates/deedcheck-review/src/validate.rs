//! Schema checks on a reconciled review. Failures are reported, never fixed.

use deedcheck_core::{Issue, ReviewObject, RiskLevel, Section, Severity};

use crate::error::ValidationError;

/// Check the review envelope, then every issue in it.
pub fn validate_review(review: &ReviewObject) -> Result<(), ValidationError> {
    if review.overall_summary.is_none() {
        return Err(ValidationError::MissingKey("overall_summary"));
    }
    let Some(risk) = review.overall_risk_level.as_deref() else {
        return Err(ValidationError::MissingKey("overall_risk_level"));
    };
    if RiskLevel::from_label(risk).is_none() {
        return Err(ValidationError::InvalidRiskLevel(risk.to_string()));
    }
    for section in Section::ALL {
        if !review.sections.contains_key(section.key()) {
            return Err(ValidationError::MissingSection(section.key()));
        }
    }
    for (section, issues) in &review.sections {
        for issue in issues {
            validate_issue(issue, section)?;
        }
    }
    Ok(())
}

/// Seven required fields, a known severity and two-sided evidence.
pub fn validate_issue(issue: &Issue, section: &str) -> Result<(), ValidationError> {
    let id = issue.id.as_deref().unwrap_or("?");
    let missing = |field| ValidationError::MissingField {
        section: section.to_string(),
        issue: id.to_string(),
        field,
    };

    let required = [
        ("id", &issue.id),
        ("severity", &issue.severity),
        ("location", &issue.location),
        ("rule", &issue.rule),
        ("message_for_maker", &issue.message_for_maker),
        ("suggested_fix", &issue.suggested_fix),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.is_none()) {
        return Err(missing(*field));
    }
    let Some(evidence) = &issue.evidence else {
        return Err(missing("evidence"));
    };

    if let Some(severity) = issue.severity.as_deref()
        && Severity::from_label(severity).is_none()
    {
        return Err(ValidationError::InvalidSeverity {
            section: section.to_string(),
            issue: id.to_string(),
            severity: severity.to_string(),
        });
    }

    let blank = |s: &Option<String>| s.as_deref().is_none_or(|s| s.trim().is_empty());
    for (field, value) in [
        ("from_report", &evidence.from_report),
        ("from_source_docs", &evidence.from_source_docs),
    ] {
        if blank(value) {
            return Err(ValidationError::MissingEvidence {
                section: section.to_string(),
                issue: id.to_string(),
                field,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_review() -> ReviewObject {
        let mut sections = serde_json::Map::new();
        for section in Section::ALL {
            sections.insert(section.key().into(), json!([]));
        }
        sections.insert(
            "property_details".into(),
            json!([{
                "id": "PD-01",
                "severity": "major",
                "location": "Survey No",
                "rule": "Survey number must match the deed",
                "message_for_maker": "Survey number differs",
                "suggested_fix": "Use 212/A",
                "evidence": {"from_report": "212/B", "from_source_docs": "212/A"}
            }]),
        );
        ReviewObject::from_value(json!({
            "overall_summary": "One mismatch",
            "overall_risk_level": "NEEDS_FIX_BEFORE_RELEASE",
            "sections": sections,
        }))
        .unwrap()
    }

    #[test]
    fn accepts_valid_review() {
        assert_eq!(validate_review(&valid_review()), Ok(()));
    }

    #[test]
    fn rejects_unknown_risk_level() {
        let mut review = valid_review();
        review.overall_risk_level = Some("REJECT".into());
        assert_eq!(
            validate_review(&review),
            Err(ValidationError::InvalidRiskLevel("REJECT".into()))
        );
    }

    #[test]
    fn rejects_missing_summary() {
        let mut review = valid_review();
        review.overall_summary = None;
        assert_eq!(
            validate_review(&review),
            Err(ValidationError::MissingKey("overall_summary"))
        );
    }

    #[test]
    fn names_missing_section() {
        let mut review = valid_review();
        review.sections.remove("layout_and_flowchart");
        assert_eq!(
            validate_review(&review),
            Err(ValidationError::MissingSection("layout_and_flowchart"))
        );
    }

    #[test]
    fn names_missing_issue_field() {
        let mut review = valid_review();
        review.sections.get_mut("property_details").unwrap()[0].rule = None;
        let err = validate_review(&review).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                section: "property_details".into(),
                issue: "PD-01".into(),
                field: "rule",
            }
        );
        assert_eq!(
            err.to_string(),
            "issue PD-01 in property_details missing required field: rule"
        );
    }

    #[test]
    fn rejects_bad_severity_and_blank_evidence() {
        let base = valid_review().sections["property_details"][0].clone();

        let mut issue = base.clone();
        issue.severity = Some("urgent".into());
        assert!(matches!(
            validate_issue(&issue, "property_details"),
            Err(ValidationError::InvalidSeverity { .. })
        ));

        let mut issue = base.clone();
        issue.evidence.as_mut().unwrap().from_source_docs = Some(" ".into());
        assert!(matches!(
            validate_issue(&issue, "property_details"),
            Err(ValidationError::MissingEvidence { field: "from_source_docs", .. })
        ));

        let mut issue = base;
        issue.evidence = None;
        assert!(matches!(
            validate_issue(&issue, "property_details"),
            Err(ValidationError::MissingField { field: "evidence", .. })
        ));
    }

    #[test]
    fn non_array_section_is_malformed() {
        let err = ReviewObject::from_value(json!({
            "overall_summary": "x",
            "overall_risk_level": "OK",
            "sections": {"property_details": "none"}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("property_details"));
    }
}
