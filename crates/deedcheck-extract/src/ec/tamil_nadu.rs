//! Tamil Nadu EC layout: labelled blocks (`Docno/Docyear`, `Executant(s)`,
//! `Nature of Document`) and boundaries written with Tamil direction words or
//! their bracketed abbreviations.
//!
//! Anything this layout does not yield falls back to the generic patterns.

use std::sync::LazyLock;

use deedcheck_core::{Boundaries, Direction, EcEntry};
use regex::Regex;

use super::generic::GenericEntryParser;
use super::{EntryParser, PartialEcEntry};
use crate::patterns::{PatternList, amount, compile, group1, non_blank, registered_doc_pair};

/// Direction markers: Tamil words, their bracketed abbreviations (including
/// the OCR vowel-sign swaps), and English labels followed by `:` or `-`.
static DIRECTION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)(வடக்கு|தெற்கு|கிழக்கு|மேற்கு|\((?:வ|தெ|ெத|கி|மே|ேம)\)|\b(?:north|south|east|west)\b(?:\s*side)?\s*[:\-])",
    )
});

static DOC_NO: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.tn.doc_no",
        &[(
            r"(?i)Docno\s*/\s*Docyear\s*[:\-]?\s*(\d+)\s*/\s*(\d{4})",
            registered_doc_pair,
        )],
    )
});

static EXTENT: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.tn.extent",
        &[(
            r"(?i)\b(?:Extent|Area)\b\s*[:\-]?\s*(\d[\d.,]*\s*(?:sq\.?\s*(?:ft|feet|yds?|yards|m(?:tr?s?|etres?)?)\b|cents?\b|acres?\b|hectares?\b|ares?\b))",
            group1,
        )],
    )
});

static SURVEY_NO: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.tn.survey_no",
        &[(
            r"(?i)\b(?:Survey\s*(?:No\.?|Number)?|S\.\s*No\.?)\s*[:\-]?\s*(\d+[A-Za-z0-9/\-]*(?:\s*,\s*\d+[A-Za-z0-9/\-]*)*)",
            group1,
        )],
    )
});

static PLOT_NO: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.tn.plot_no",
        &[(
            r"(?i)\b(?:Plot|Site)\s*(?:No\.?)?\s*[:\-]?\s*(\d[A-Za-z0-9/\-]*)",
            group1,
        )],
    )
});

static DOOR_NO: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.tn.door_no",
        &[(
            r"(?i)\b(?:Door|House)\s*(?:No\.?)?\s*[:\-]?\s*(\d[A-Za-z0-9/\-]*)",
            group1,
        )],
    )
});

static SRO: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.tn.sro",
        &[(
            r"(?i)\bSRO\s*[:\-]\s*([A-Za-z][A-Za-z .]*?)\s*(?:\(|,|\n|$)",
            group1,
        )],
    )
});

static NATURE: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.tn.nature",
        &[(r"(?i)Nature\s*of\s*(?:Document|Deed)\s*[:\-]?\s*([^\n,]+)", group1)],
    )
});

static MARKET_VALUE: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.tn.market_value",
        &[(r"(?i)Market\s*Value\s*[:\-]?\s*(?:Rs\.?)?\s*(\d[\d,]*)", amount)],
    )
});

static CONSIDERATION_VALUE: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.tn.consideration_value",
        &[(
            r"(?i)Consideration\s*Value\s*[:\-]?\s*(?:Rs\.?)?\s*(\d[\d,]*)",
            amount,
        )],
    )
});

static EXECUTANT: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.tn.executant",
        &[(
            r"(?i)Executant\(s\)\s*[:\-]?\s*(?:1\s*[.)]\s*)?([^\n,]+?)(?:\s*\d+\s*[.)]|,|\n|$)",
            group1,
        )],
    )
});

static CLAIMANT: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "ec.tn.claimant",
        &[(
            r"(?i)Claimant\(s\)\s*[:\-]?\s*(?:1\s*[.)]\s*)?([^\n,]+?)(?:\s*\d+\s*[.)]|,|\n|$)",
            group1,
        )],
    )
});

/// Registry document names, most specific first.
const DEED_TYPES: &[(&str, &str)] = &[
    ("deposit of title", "Deposit of Title Deeds"),
    ("mortgage", "Mortgage Deed"),
    ("conveyance", "Sale Deed"),
    ("gift settlement", "Gift Settlement"),
    ("settlement", "Settlement Deed"),
    ("gift", "Gift Deed"),
    ("partition", "Partition Deed"),
    ("release", "Release Deed"),
    ("sale", "Sale Deed"),
    ("power of attorney", "Power of Attorney"),
    ("receipt", "Receipt"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct TamilNaduEntryParser;

impl EntryParser for TamilNaduEntryParser {
    fn parse(&self, entry: &EcEntry) -> PartialEcEntry {
        let joined = entry.joined();
        let desc = entry.description.as_str();
        let fields = entry.fields();

        let mut partial = PartialEcEntry {
            boundaries: direction_boundaries(desc),
            extent: EXTENT.first_match(desc),
            survey_no: SURVEY_NO.first_match(desc),
            house_no: DOOR_NO.first_match(desc),
            plot_no: PLOT_NO.first_match(desc),
            sro: SRO.first_match_in(fields),
            ..Default::default()
        };

        let txn = &mut partial.transaction;
        txn.doc_no = DOC_NO.first_match(&joined);
        // A labelled nature is kept verbatim when it has no canonical name;
        // an unlabelled first line is only trusted when it translates.
        txn.deed_type = match NATURE.first_match(&joined) {
            Some(nature) => Some(translate_deed_type(&nature).unwrap_or(nature)),
            None => non_blank(entry.deed_value.lines().next().unwrap_or_default())
                .and_then(|line| translate_deed_type(&line)),
        };
        txn.market_value = MARKET_VALUE.first_match(&joined);
        txn.consideration_value = CONSIDERATION_VALUE.first_match(&joined);
        txn.executant = EXECUTANT.first_match(&joined);
        txn.claimant = CLAIMANT.first_match(&joined);

        partial.fill_from(GenericEntryParser.parse(entry));
        partial
    }
}

/// Map a registry document name to a canonical deed type, if it has one.
fn translate_deed_type(nature: &str) -> Option<String> {
    let lower = nature.to_lowercase();
    DEED_TYPES
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, canonical)| canonical.to_string())
}

fn direction_of(marker: &str) -> Option<Direction> {
    let m = marker.trim_start_matches('(').to_lowercase();
    let starts = |prefixes: &[&str]| prefixes.iter().any(|p| m.starts_with(p));
    if starts(&["வ", "north"]) {
        Some(Direction::North)
    } else if starts(&["தெ", "ெத", "south"]) {
        Some(Direction::South)
    } else if starts(&["கி", "east"]) {
        Some(Direction::East)
    } else if starts(&["மே", "ேம", "west"]) {
        Some(Direction::West)
    } else {
        None
    }
}

/// Each direction marker's value runs to the next marker or end of line.
pub(crate) fn direction_boundaries(text: &str) -> Boundaries {
    let markers: Vec<_> = DIRECTION_MARKER.find_iter(text).collect();
    let mut boundaries = Boundaries::default();
    for (i, marker) in markers.iter().enumerate() {
        let Some(direction) = direction_of(marker.as_str()) else {
            continue;
        };
        let end = markers.get(i + 1).map_or(text.len(), |next| next.start());
        let value = &text[marker.end()..end];
        let value = value.split('\n').next().unwrap_or_default();
        let value = value
            .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | '–'))
            .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '.'));
        boundaries.fill(direction, value);
    }
    boundaries
}
