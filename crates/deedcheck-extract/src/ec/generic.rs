//! Bracket/label EC layout (Telangana/AP registry print-outs), also the
//! fallback for every region without a dedicated parser.

use std::sync::LazyLock;

use deedcheck_core::{Boundaries, Direction, EcEntry};
use regex::{Captures, Regex};

use super::{EntryParser, PartialEcEntry};
use crate::patterns::{
    PatternList, amount, compile, group1, non_blank, registered_doc_pair, whole,
};
use crate::text::take_chars;

/// Characters of the EC description kept on each transaction.
pub const TRANSACTION_DESCRIPTION_CHARS: usize = 300;

static BRACKET_BOUNDARY: LazyLock<[(Direction, Regex); 4]> = LazyLock::new(|| {
    [
        (Direction::North, compile(r"\[N\][:\s]*([^\[\]]+?)(?:\[|$)")),
        (Direction::South, compile(r"\[S\][:\s]*([^\[\]]+?)(?:\[|$)")),
        (Direction::East, compile(r"\[E\][:\s]*([^\[\]]+?)(?:\[|$)")),
        (Direction::West, compile(r"\[W\][:\s]*([^\[\]]+?)(?:\[|$)")),
    ]
});

static EXTENT: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.extent",
        &[(r"(?i)EXTENT[:\s]*([\d.]+)\s*SQ\.?\s*(?:YDS?|FT|M)\b", whole)],
    )
});

static SURVEY_NO: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.survey_no",
        &[(r"(?i)SURVEY\s*(?:No\.?)?[:\s]*(\d+[A-Za-z0-9/\-]*)", group1)],
    )
});

static HOUSE_NO: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.house_no",
        &[(r"(?i)HOUSE\s*(?:No\.?)?[:\s]*(\d[\d\-/]*)", group1)],
    )
});

static PLOT_NO: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.plot_no",
        &[(r"(?i)PLOT\s*(?:No\.?)?[:\s]*(\d[A-Za-z0-9\-/]*)", group1)],
    )
});

static DOC_NO: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.doc_no",
        &[
            (r"(\d+)/(\d{4})\s*\[", registered_doc_pair),
            (r"(\d+)/(\d{4})(?:\s|$)", registered_doc_pair),
            (r"(\d{2,5})/(\d{4})", registered_doc_pair),
        ],
    )
});

static SRO: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.sro",
        &[
            (r"(?i)SRO\s*\n?\s*([A-Z][A-Z\s]+?)(?:\(|\n|$)", group1),
            (r"(?i)of\s*SRO\s*\n?\s*([A-Z][A-Z\s]+)", group1),
        ],
    )
});

static DEED_CODE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)^\s*(\d+)\s*\n?\s*([A-Za-z][A-Za-z ]*?)\s*(?:\bMkt\b|\bCons\b|[^A-Za-z ]|$)")
});

static MARKET_VALUE: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.market_value",
        &[(r"(?i)Mkt\.?\s*Value[:\s]*Rs\.?\s*([\d,]+)", amount)],
    )
});

static CONSIDERATION_VALUE: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.consideration_value",
        &[(r"(?i)Cons\.?\s*Value[:\s]*Rs\.?\s*([\d,]+)", amount)],
    )
});

static REGISTRATION_DATE: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.registration_date",
        &[
            (r"\(R\)\s*([\d\-/]+)", group1),
            (
                r"(?i)Date\s*of\s*Reg(?:d|istration)?\.?[:\s\-]*(\d{1,2}[\-/.][0-9A-Za-z]{1,3}[\-/.]\d{4})",
                group1,
            ),
        ],
    )
});

static EXECUTION_DATE: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.execution_date",
        &[
            (r"\(E\)\s*([\d\-/]+)", group1),
            (
                r"(?i)Date\s*of\s*Exec(?:ution)?\.?[:\s\-]*(\d{1,2}[\-/.][0-9A-Za-z]{1,3}[\-/.]\d{4})",
                group1,
            ),
        ],
    )
});

static EXECUTANT: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.executant",
        &[(r"\(DE\)\s*([A-Za-z\s]+?)(?:\(|$|\n|\d)", group1)],
    )
});

static CLAIMANT: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.claimant",
        &[(r"\(DR\)\s*([A-Za-z\s]+?)(?:\(|$|\n|\d)", group1)],
    )
});

/// Registry deed names mapped to canonical deed types, checked in order
/// against the text after the numeric deed code.
const DEED_NAMES: &[(&str, &str)] = &[
    ("gift", "Gift Settlement"),
    ("sale", "Sale Deed"),
    ("mortgage", "Mortgage Deed"),
    ("partition", "Partition Deed"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct GenericEntryParser;

impl EntryParser for GenericEntryParser {
    fn parse(&self, entry: &EcEntry) -> PartialEcEntry {
        let desc = entry.description.as_str();
        let mut partial = PartialEcEntry {
            property_description: non_blank(desc),
            boundaries: bracket_boundaries(desc),
            extent: EXTENT.first_match(desc),
            survey_no: SURVEY_NO.first_match(desc),
            house_no: HOUSE_NO.first_match(desc),
            plot_no: PLOT_NO.first_match(desc),
            sro: SRO.first_match(&entry.identifiers),
            ..Default::default()
        };

        let txn = &mut partial.transaction;
        txn.doc_no = DOC_NO.first_match(&entry.identifiers);
        if let Some((code, deed_type)) = deed_code(&entry.deed_value) {
            txn.deed_code = Some(code);
            txn.deed_type = Some(deed_type);
        }
        txn.market_value = MARKET_VALUE.first_match(&entry.deed_value);
        txn.consideration_value = CONSIDERATION_VALUE.first_match(&entry.deed_value);
        txn.registration_date = REGISTRATION_DATE.first_match(&entry.dates);
        txn.execution_date = EXECUTION_DATE.first_match(&entry.dates);
        txn.executant = EXECUTANT.first_match(&entry.parties);
        txn.claimant = CLAIMANT.first_match(&entry.parties);
        txn.description = non_blank(take_chars(desc, TRANSACTION_DESCRIPTION_CHARS));
        partial
    }
}

/// `[N]: ... [S]: ...` boundary columns.
pub(crate) fn bracket_boundaries(text: &str) -> Boundaries {
    let mut boundaries = Boundaries::default();
    for (direction, pattern) in BRACKET_BOUNDARY.iter() {
        if let Some(value) = pattern.captures(text).as_ref().and_then(group1) {
            boundaries.fill(*direction, &value);
        }
    }
    boundaries
}

/// Split `"<code> <deed name>"` into the code and a canonical deed type.
fn deed_code(deed_value: &str) -> Option<(String, String)> {
    let caps: Captures<'_> = DEED_CODE.captures(deed_value)?;
    let code = caps.get(1)?.as_str().to_string();
    let raw = caps.get(2)?.as_str().trim();
    let lower = raw.to_lowercase();
    let deed_type = DEED_NAMES
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map_or_else(|| raw.to_string(), |(_, canonical)| canonical.to_string());
    Some((code, deed_type))
}
