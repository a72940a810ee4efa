//! Value-level normalisation for Indian title-document fields.
//!
//! Each function is total: it never panics and never fails, and returns its
//! input (cleaned) when no known shape is recognised.
//!
//! # Conventions handled
//!
//! - Names: relationship abbreviations `S/o`, `D/o`, `W/o`, `H/o`, `C/o`
//! - Document numbers: `39 of 2026`, `039/2026`, `39-2026`
//! - Extents: `145 Sq. Yds`, `1200 sq.ft`, `2.5 acres`, `10 guntas`
//! - Survey numbers: `Survey No. 225/2`, `Sy.No.12`, `S. No: 7`
//! - Dates: `06/Jan/2026`, `06-01-2026`, `2026-01-06`

use std::sync::LazyLock;

use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("normaliser pattern is a valid regex")
}

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));

/// Relationship abbreviations, applied in this order. No rule's output can
/// be matched by a later rule.
static RELATIONSHIPS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bs/o\b", "son of"),
        (r"(?i)\bd/o\b", "daughter of"),
        (r"(?i)\bw/o\b", "wife of"),
        (r"(?i)\bh/o\b", "husband of"),
        (r"(?i)\bc/o\b", "care of"),
    ]
    .into_iter()
    .map(|(p, r)| (compile(p), r))
    .collect()
});

static DOC_NO: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)([0-9]+)\s*(?:of|[/\-])\s*([0-9]+)"));

static FIRST_NUMBER: LazyLock<Regex> = LazyLock::new(|| compile(r"[0-9]*\.?[0-9]+"));

/// Extent units, checked in order; the first hit names the unit.
static EXTENT_UNITS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)sq\.?\s*yds?\.?|square\s*yards?", "sq.yds"),
        (r"(?i)sq\.?\s*ft\.?|square\s*feet|sqft", "sq.ft"),
        (r"(?i)sq\.?\s*m\.?|square\s*met", "sq.m"),
        (r"(?i)cents?", "cents"),
        (r"(?i)acres?", "acres"),
        (r"(?i)guntas?", "guntas"),
    ]
    .into_iter()
    .map(|(p, u)| (compile(p), u))
    .collect()
});

static SURVEY_LABELS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)survey\s*no\.?\s*:?\s*",
        r"(?i)sy\.?\s*no\.?\s*:?\s*",
        r"(?i)s\.?\s*no\.?\s*:?\s*",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

static DATE_MONTH_NAME: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([0-9]{1,2})[/\-]([A-Za-z]{3})[/\-]([0-9]{4})"));
static DATE_DMY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"([0-9]{1,2})[/\-]([0-9]{1,2})[/\-]([0-9]{4})"));
static DATE_YMD: LazyLock<Regex> =
    LazyLock::new(|| compile(r"([0-9]{4})[/\-]([0-9]{1,2})[/\-]([0-9]{1,2})"));

const MONTHS: [(&str, &str); 12] = [
    ("jan", "01"),
    ("feb", "02"),
    ("mar", "03"),
    ("apr", "04"),
    ("may", "05"),
    ("jun", "06"),
    ("jul", "07"),
    ("aug", "08"),
    ("sep", "09"),
    ("oct", "10"),
    ("nov", "11"),
    ("dec", "12"),
];

/// Normalise a person's name for comparison.
///
/// Lowercases, collapses whitespace and expands relationship abbreviations:
/// `"RAMU  S/O  Venkat"` → `"ramu son of venkat"`.
pub fn normalize_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut out = WHITESPACE.replace_all(&lowered, " ").into_owned();
    for (pattern, replacement) in RELATIONSHIPS.iter() {
        out = pattern.replace_all(&out, *replacement).into_owned();
    }
    out
}

/// Normalise a document number to `<number>/<year>` with leading zeros removed.
///
/// `"039 of 2026"` → `"39/2026"`. Inputs without a number pair are returned
/// with all whitespace removed. The function is idempotent.
pub fn normalize_doc_no(doc_no: &str) -> String {
    if let Some(canonical) = canonical_doc_no(doc_no.trim()) {
        return canonical;
    }
    let compact = WHITESPACE.replace_all(doc_no, "").into_owned();
    // Removing whitespace can join a split "o f" into "of"; re-check so a
    // second pass is always a no-op.
    canonical_doc_no(&compact).unwrap_or(compact)
}

fn canonical_doc_no(text: &str) -> Option<String> {
    let caps = DOC_NO.captures(text)?;
    Some(format!(
        "{}/{}",
        strip_leading_zeros(&caps[1]),
        strip_leading_zeros(&caps[2])
    ))
}

fn strip_leading_zeros(digits: &str) -> &str {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() { "0" } else { trimmed }
}

/// Split an extent string into a numeric value and a canonical unit.
///
/// The first numeric token supplies the value. When `unit` is `None` the
/// unit is detected from the text. Returns `(0.0, "")` when there is no number.
pub fn normalize_extent(extent: &str, unit: Option<&str>) -> (f64, String) {
    let given = unit.unwrap_or_default().to_string();
    let text = extent.trim().to_lowercase();
    let Some(value) = FIRST_NUMBER
        .find(&text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
    else {
        return (0.0, given);
    };
    if unit.is_some_and(|u| !u.is_empty()) {
        return (value, given);
    }
    let detected = EXTENT_UNITS
        .iter()
        .find(|(pattern, _)| pattern.is_match(&text))
        .map(|(_, unit)| unit.to_string())
        .unwrap_or_default();
    (value, detected)
}

/// Strip leading survey labels: `"Sy. No. 225/2"` → `"225/2"`.
pub fn normalize_survey_no(survey_no: &str) -> String {
    let mut out = survey_no.trim().to_string();
    for label in SURVEY_LABELS.iter() {
        out = label.replace_all(&out, "").into_owned();
    }
    out.trim().to_string()
}

/// Normalise a date to `DD-MM-YYYY` where a known shape is found.
///
/// Recognises `DD/Mon/YYYY` and numeric `DD-MM-YYYY` / `YYYY-MM-DD` (either
/// separator). Anything else comes back trimmed but otherwise unchanged.
pub fn normalize_date(date: &str) -> String {
    let date = date.trim();

    if let Some(caps) = DATE_MONTH_NAME.captures(date) {
        let month = caps[2].to_lowercase();
        let month = MONTHS
            .iter()
            .find(|(name, _)| *name == month)
            .map(|(_, num)| num.to_string())
            .unwrap_or_else(|| caps[2].to_string());
        return format!("{:0>2}-{}-{}", &caps[1], month, &caps[3]);
    }

    if DATE_DMY.find(date).is_some_and(|m| m.start() == 0) {
        return DATE_DMY.replace_all(date, "${1}-${2}-${3}").into_owned();
    }
    if DATE_YMD.find(date).is_some_and(|m| m.start() == 0) {
        return DATE_YMD.replace_all(date, "${3}-${2}-${1}").into_owned();
    }

    date.to_string()
}
