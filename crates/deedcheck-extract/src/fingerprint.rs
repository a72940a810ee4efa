//! Retrieval fingerprint: `Label: value` segments joined by ` | `.
//!
//! Each field lists its candidate sources in preference order; the first
//! non-empty candidate wins and a field with no candidate is left out. The
//! field order is fixed, so equal extracted values always give byte-equal
//! fingerprints.

use std::sync::LazyLock;

use regex::Regex;

use crate::ParsedCase;
use crate::patterns::compile;

pub const SEPARATOR: &str = " | ";

static DOC_NO_SHAPE: LazyLock<Regex> = LazyLock::new(|| compile(r"^\d+/\d{4}$"));

/// Whether a candidate survey number is really a document number
/// (`<digits>/<4-digit year>`).
pub fn is_doc_no_shaped(value: &str) -> bool {
    DOC_NO_SHAPE.is_match(value.trim())
}

/// One fingerprint segment and its candidates, most reliable first.
struct Field<'a> {
    label: &'static str,
    candidates: Vec<Option<&'a str>>,
}

impl<'a> Field<'a> {
    fn new(label: &'static str, candidates: Vec<Option<&'a str>>) -> Self {
        Self { label, candidates }
    }

    fn resolve(&self) -> Option<&'a str> {
        self.candidates
            .iter()
            .flatten()
            .copied()
            .map(str::trim)
            .find(|v| !v.is_empty())
    }
}

fn fields(case: &ParsedCase) -> Vec<Field<'_>> {
    let pd = &case.report.property_details;
    let ec = &case.ec;
    let deed = &case.deed;
    let txn = ec.first_transaction();

    vec![
        Field::new(
            "State",
            vec![pd.state.as_deref(), ec.detected_state.display_name()],
        ),
        Field::new("District", vec![pd.district.as_deref(), deed.district.as_deref()]),
        Field::new(
            "SRO",
            vec![pd.sro.as_deref(), ec.sro.as_deref(), deed.sro.as_deref()],
        ),
        Field::new(
            "Survey",
            [
                ec.survey_no.as_deref(),
                pd.survey_no.as_deref(),
                deed.survey_no.as_deref(),
            ]
            .into_iter()
            .map(|v| v.filter(|s| !is_doc_no_shaped(s)))
            .collect(),
        ),
        Field::new("Village", vec![pd.village.as_deref(), deed.village.as_deref()]),
        Field::new(
            "Extent",
            vec![ec.extent.as_deref(), pd.extent.as_deref(), deed.extent.as_deref()],
        ),
        Field::new(
            "Deed",
            vec![
                txn.and_then(|t| t.deed_type.as_deref()),
                pd.deed_type.as_deref(),
                deed.deed_type.as_deref(),
            ],
        ),
        Field::new(
            "DocNo",
            vec![
                txn.and_then(|t| t.doc_no.as_deref()),
                pd.doc_no.as_deref(),
                deed.doc_no.as_deref(),
            ],
        ),
        Field::new("Mortgage", vec![ec.mortgage_flag.then_some("Active")]),
        Field::new("Owner", vec![pd.owner.as_deref(), pd.applicant.as_deref()]),
        Field::new(
            "ValueRange",
            vec![
                ec.market_value.as_deref().and_then(value_range),
                deed.market_value.as_deref().and_then(value_range),
            ],
        ),
        Field::new("Mutation", vec![pd.mutation.as_deref()]),
    ]
}

/// Bucket a rupee amount: `<1L`, `1-5L`, `5-10L` or `>10L`.
pub fn value_range(value: &str) -> Option<&'static str> {
    let rupees: u64 = value.trim().replace(',', "").parse().ok()?;
    Some(match rupees {
        0..100_000 => "<1L",
        100_000..500_000 => "1-5L",
        500_000..1_000_000 => "5-10L",
        _ => ">10L",
    })
}

pub fn build_fingerprint(case: &ParsedCase) -> String {
    let segments: Vec<String> = fields(case)
        .iter()
        .filter_map(|field| field.resolve().map(|v| format!("{}: {}", field.label, v)))
        .collect();
    let fingerprint = segments.join(SEPARATOR);
    tracing::debug!(segments = segments.len(), %fingerprint, "built fingerprint");
    fingerprint
}
