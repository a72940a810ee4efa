//! Plain-text summaries for reviewed cases.

use deedcheck_core::ReviewObject;
use deedcheck_core::review::ReviewSummary;
use deedcheck_review::ReconcileReport;

const SUMMARY_CHARS: usize = 200;

pub fn print_reconcile_report(report: &ReconcileReport) {
    println!(
        "Reconciled: {} in, {} merged, {} dropped for evidence, {} out",
        report.issues_in, report.duplicates_merged, report.dropped_for_evidence, report.issues_out
    );
}

pub fn print_summary(review: &ReviewObject) {
    print!("{}", render_summary(review));
}

fn render_summary(review: &ReviewObject) -> String {
    let ReviewSummary {
        risk_level,
        total,
        sections,
    } = review.summary();

    let mut out = String::new();
    out.push_str("\n=== Review Summary ===\n");
    out.push_str(&format!("Risk Level: {}\n", risk_level.as_deref().unwrap_or("N/A")));
    let summary: String = review
        .overall_summary
        .as_deref()
        .unwrap_or("N/A")
        .chars()
        .take(SUMMARY_CHARS)
        .collect();
    out.push_str(&format!("Summary: {summary}\n\nIssues by Section:\n"));
    for s in &sections {
        if s.total == 0 {
            out.push_str(&format!("  {:<26} 0\n", s.section));
        } else {
            out.push_str(&format!(
                "  {:<26} {} (C:{} M:{} m:{})\n",
                s.section, s.total, s.critical, s.major, s.minor
            ));
        }
    }
    out.push_str(&format!("\nTotal Issues: {total}\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_counts_per_section() {
        let review = ReviewObject::from_value(json!({
            "overall_summary": "Boundary mismatch",
            "overall_risk_level": "BLOCKER",
            "sections": {
                "schedule_of_property": [
                    {"severity": "critical"},
                    {"severity": "minor"}
                ]
            }
        }))
        .unwrap();
        let text = render_summary(&review);
        assert!(text.contains("Risk Level: BLOCKER"));
        assert!(text.contains("schedule_of_property       2 (C:1 M:0 m:1)"));
        assert!(text.contains("property_details           0"));
        assert!(text.ends_with("Total Issues: 2\n"));
    }
}
