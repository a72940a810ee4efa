//! Issue reconciliation: dedupe, renumber, evidence filter, renumber again.
//!
//! Every stage is deterministic and a reconciled review is a fixed point:
//! reconciling it a second time changes nothing.

use std::collections::BTreeMap;

use deedcheck_core::review::section_prefix;
use deedcheck_core::{Issue, ReviewObject};
use serde::Serialize;
use similar::TextDiff;

pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.7;

/// Character-level similarity of two strings, case-insensitive, in `[0, 1]`.
/// An empty side scores zero.
pub fn similarity_ratio(a: &str, b: &str) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    TextDiff::from_chars(a.as_str(), b.as_str()).ratio()
}

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub issues_in: usize,
    pub duplicates_merged: usize,
    pub dropped_for_evidence: usize,
    pub issues_out: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    similarity_threshold: f32,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl Reconciler {
    pub fn new(similarity_threshold: f32) -> Self {
        Self {
            similarity_threshold,
        }
    }

    pub fn similarity_threshold(&self) -> f32 {
        self.similarity_threshold
    }

    /// Same location (case-insensitive) and `from_report` evidence more
    /// similar than the threshold.
    pub fn is_duplicate(&self, a: &Issue, b: &Issue) -> bool {
        let location = |i: &Issue| i.location.as_deref().unwrap_or_default().to_lowercase();
        location(a) == location(b)
            && similarity_ratio(a.from_report(), b.from_report()) > self.similarity_threshold
    }

    /// One pass in input order. A duplicate of an earlier kept issue either
    /// replaces it in place (strictly higher severity) or is discarded.
    fn dedupe_pass(&self, issues: Vec<Issue>) -> (Vec<Issue>, usize) {
        let mut kept: Vec<Issue> = Vec::with_capacity(issues.len());
        let mut merged = 0;
        for issue in issues {
            match kept.iter().position(|existing| self.is_duplicate(&issue, existing)) {
                Some(idx) => {
                    merged += 1;
                    if issue.severity_rank() > kept[idx].severity_rank() {
                        kept[idx] = issue;
                    }
                }
                None => kept.push(issue),
            }
        }
        (kept, merged)
    }

    /// Deduplicate one section until no pair of survivors are duplicates.
    ///
    /// A replacement can make the survivor a duplicate of a different earlier
    /// issue, so passes repeat; each productive pass shrinks the list.
    pub fn dedupe(&self, mut issues: Vec<Issue>) -> (Vec<Issue>, usize) {
        let mut total = 0;
        loop {
            let (next, merged) = self.dedupe_pass(issues);
            issues = next;
            total += merged;
            if merged == 0 {
                return (issues, total);
            }
        }
    }

    /// Run all four stages over every section of `review`, in place.
    pub fn reconcile(&self, review: &mut ReviewObject) -> ReconcileReport {
        let mut report = ReconcileReport {
            issues_in: review.issue_count(),
            ..Default::default()
        };

        for issues in review.sections.values_mut() {
            let (deduped, merged) = self.dedupe(std::mem::take(issues));
            *issues = deduped;
            report.duplicates_merged += merged;
        }
        renumber(&mut review.sections);
        report.dropped_for_evidence = filter_evidence(&mut review.sections);
        renumber(&mut review.sections);

        report.issues_out = review.issue_count();
        tracing::info!(
            issues_in = report.issues_in,
            merged = report.duplicates_merged,
            dropped = report.dropped_for_evidence,
            issues_out = report.issues_out,
            "reconciled review"
        );
        report
    }
}

/// Assign `<PREFIX>-NN` ids in list order, per section.
pub fn renumber(sections: &mut BTreeMap<String, Vec<Issue>>) {
    for (section, issues) in sections.iter_mut() {
        let prefix = section_prefix(section);
        for (i, issue) in issues.iter_mut().enumerate() {
            issue.id = Some(format!("{prefix}-{:02}", i + 1));
        }
    }
}

/// Drop issues without both evidence strings. Returns how many were dropped.
pub fn filter_evidence(sections: &mut BTreeMap<String, Vec<Issue>>) -> usize {
    let mut dropped = 0;
    for (section, issues) in sections.iter_mut() {
        let before = issues.len();
        issues.retain(|issue| {
            let keep = issue.has_complete_evidence();
            if !keep {
                tracing::warn!(
                    section = %section,
                    id = issue.id.as_deref().unwrap_or("?"),
                    "dropping issue without complete evidence"
                );
            }
            keep
        });
        dropped += before - issues.len();
    }
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use deedcheck_core::review::Evidence;
    use proptest::prelude::*;

    fn issue(severity: &str, location: &str, from_report: &str) -> Issue {
        Issue {
            id: Some("tmp".into()),
            severity: Some(severity.into()),
            location: Some(location.into()),
            rule: Some("R1".into()),
            message_for_maker: Some("check".into()),
            suggested_fix: Some("fix".into()),
            evidence: Some(Evidence {
                from_report: Some(from_report.into()),
                from_source_docs: Some("deed page 2".into()),
            }),
            ..Default::default()
        }
    }

    fn review(section: &str, issues: Vec<Issue>) -> ReviewObject {
        let mut review = ReviewObject::default();
        review.sections.insert(section.into(), issues);
        review
    }

    #[test]
    fn similarity() {
        assert_eq!(similarity_ratio("", "abc"), 0.0);
        assert_eq!(similarity_ratio("ABC", "abc"), 1.0);
        assert!(similarity_ratio("survey 212/a", "survey 212/b") > 0.9);
        assert!(similarity_ratio("survey", "extent of land") < 0.7);
    }

    #[test]
    fn minor_and_critical_duplicates_keep_critical() {
        let mut r = review(
            "property_details",
            vec![
                issue("minor", "Survey No", "Report states survey number 212/A"),
                issue("critical", "survey no", "Report states survey number 212/B"),
            ],
        );
        let report = Reconciler::default().reconcile(&mut r);
        let issues = &r.sections["property_details"];
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity.as_deref(), Some("critical"));
        assert_eq!(issues[0].id.as_deref(), Some("PD-01"));
        assert_eq!(report.duplicates_merged, 1);
    }

    #[test]
    fn replacement_happens_in_place() {
        let mut r = review(
            "flow_of_title",
            vec![
                issue("minor", "Deed", "Owner name spelt Laksmi"),
                issue("major", "EC", "EC lists a mortgage in 2019"),
                issue("critical", "deed", "Owner name spelt Lakshmi"),
            ],
        );
        Reconciler::default().reconcile(&mut r);
        let issues = &r.sections["flow_of_title"];
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].severity.as_deref(), Some("critical"));
        assert_eq!(issues[0].id.as_deref(), Some("FT-01"));
        assert_eq!(issues[1].location.as_deref(), Some("EC"));
        assert_eq!(issues[1].id.as_deref(), Some("FT-02"));
    }

    #[test]
    fn equal_severity_keeps_first() {
        let first = issue("major", "Extent", "Extent 145 sq yds");
        let mut second = issue("major", "Extent", "Extent 145 sq yds.");
        second.rule = Some("R2".into());
        let (kept, merged) = Reconciler::default().dedupe(vec![first, second]);
        assert_eq!(merged, 1);
        assert_eq!(kept[0].rule.as_deref(), Some("R1"));
    }

    #[test]
    fn different_locations_never_merge() {
        let (kept, _) = Reconciler::default().dedupe(vec![
            issue("major", "Extent", "same words"),
            issue("major", "Boundaries", "same words"),
        ]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn missing_severity_ranks_as_minor_unknown_below() {
        let mut unknown = issue("urgent", "X", "the same evidence");
        let mut missing = issue("minor", "X", "the same evidence");
        missing.severity = None;
        let (kept, _) = Reconciler::default().dedupe(vec![unknown.clone(), missing.clone()]);
        assert_eq!(kept[0].severity, None);

        unknown.severity = Some("minor".into());
        let (kept, _) = Reconciler::default().dedupe(vec![missing, unknown]);
        assert_eq!(kept[0].severity, None);
    }

    #[test]
    fn evidence_filter_then_contiguous_ids() {
        let mut no_docs = issue("major", "B", "boundary north differs");
        no_docs.evidence.as_mut().unwrap().from_source_docs = Some("  ".into());
        let mut r = review(
            "schedule_of_property",
            vec![
                issue("major", "A", "extent differs"),
                no_docs,
                Issue::default(),
                issue("minor", "C", "survey differs"),
            ],
        );
        let report = Reconciler::default().reconcile(&mut r);
        let ids: Vec<_> = r.sections["schedule_of_property"]
            .iter()
            .map(|i| i.id.clone().unwrap())
            .collect();
        assert_eq!(ids, ["SP-01", "SP-02"]);
        assert_eq!(report.dropped_for_evidence, 2);
        assert_eq!(report.issues_in, 4);
        assert_eq!(report.issues_out, 2);
    }

    #[test]
    fn unknown_section_prefix() {
        let mut r = review("extra_notes", vec![issue("minor", "A", "x")]);
        Reconciler::default().reconcile(&mut r);
        assert_eq!(r.sections["extra_notes"][0].id.as_deref(), Some("XX-01"));
    }

    #[test]
    fn threshold_is_configurable() {
        let a = issue("minor", "L", "abcdefghij");
        let b = issue("major", "L", "abcdefghXY");
        assert!(!Reconciler::new(0.9).is_duplicate(&a, &b));
        assert!(Reconciler::new(0.5).is_duplicate(&a, &b));
    }

    fn arb_issue() -> impl Strategy<Value = Issue> {
        (
            prop::sample::select(vec!["critical", "major", "minor", "bogus"]),
            prop::sample::select(vec!["Survey", "survey", "Extent", "Boundary"]),
            prop::sample::select(vec![
                "",
                "survey number 212/A",
                "survey number 212/B",
                "extent 145 sq yds",
                "extent 154 sq yds",
                "north boundary road",
            ]),
            any::<bool>(),
        )
            .prop_map(|(severity, location, evidence, has_docs)| {
                let mut i = issue(severity, location, evidence);
                if !has_docs {
                    i.evidence.as_mut().unwrap().from_source_docs = None;
                }
                i
            })
    }

    fn arb_review() -> impl Strategy<Value = ReviewObject> {
        prop::collection::btree_map(
            prop::sample::select(vec![
                "property_details".to_string(),
                "encumbrance_certificate".to_string(),
                "misc".to_string(),
            ]),
            prop::collection::vec(arb_issue(), 0..12),
            0..3,
        )
        .prop_map(|sections| ReviewObject {
            sections,
            ..Default::default()
        })
    }

    proptest! {
        #[test]
        fn reconcile_is_a_fixed_point(mut r in arb_review()) {
            let reconciler = Reconciler::default();
            reconciler.reconcile(&mut r);
            let once = r.clone();
            let report = reconciler.reconcile(&mut r);
            prop_assert_eq!(&r, &once);
            prop_assert_eq!(report.duplicates_merged, 0);
            prop_assert_eq!(report.dropped_for_evidence, 0);
        }

        #[test]
        fn ids_contiguous_and_evidence_complete(mut r in arb_review()) {
            Reconciler::default().reconcile(&mut r);
            for (section, issues) in &r.sections {
                let prefix = section_prefix(section);
                for (i, issue) in issues.iter().enumerate() {
                    let expected = format!("{prefix}-{:02}", i + 1);
                    prop_assert_eq!(issue.id.as_deref(), Some(expected.as_str()));
                    prop_assert!(issue.has_complete_evidence());
                }
            }
        }
    }
}
