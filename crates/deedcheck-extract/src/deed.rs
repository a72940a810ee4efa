//! Deed-text parser: OCR'd attachments to an [`ExtractedDeedRecord`].

use std::sync::LazyLock;

use deedcheck_core::{Boundaries, Direction, ExtractedDeedRecord};
use regex::{Captures, Regex};

use crate::noise::{filter_stamp_noise, isolate_schedule, locate_deed_content};
use crate::patterns::{Extractor, PatternList, amount, compile, doc_pair, group1, non_blank};
use crate::text::take_chars;

const RAW_TEXT_CHARS: usize = 5000;
const CLEANED_TEXT_CHARS: usize = 4000;

// ── Pattern lists ──

static DOC_NO: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "deed.doc_no",
        &[
            (
                r"(?i)(?:Doct?\s*No[/\s]*Year|Doc\.?\s*No\.?)[:\s]*(\d+)[/\s]*(?:of\s*)?(\d{4})",
                doc_pair,
            ),
            (r"(?i)CS\s*No[/\s]*Year[:\s]*(\d+)[/\s]*(\d{4})", doc_pair),
            (r"(?i)document\s*No\.?\s*(\d+)\s*(?:of|/)\s*(\d{4})", doc_pair),
            (
                r"(?i)(?:DOC\.?\s*NO\.?|Doc\s*No)[:\s]*(\d+)[/\s]*(?:of\s*)?(\d{4})",
                doc_pair,
            ),
        ],
    )
});

static EXECUTION_DATE: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "deed.execution_date",
        &[
            (
                r"(?i)dated?\s+(\d{1,2})(?:st|nd|rd|th)?\s*(?:of\s*)?([A-Za-z]+),?\s*(\d{4})",
                day_month_year,
            ),
            (r"Date[:\s]*(\d{2}[-/]\d{2}[-/]\d{4})", dashed_date),
        ],
    )
});

static REGISTRATION_DATE: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "deed.registration_date",
        &[(
            r"(?i)(?:registered\s*on|Presentation\s*Endorsement)[^\d]*(\d{1,2})(?:st|nd|rd|th)?\s*(?:day\s*of\s*)?([A-Za-z]+),?\s*(\d{4})",
            day_month_year,
        )],
    )
});

static DEED_TYPE: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "deed.deed_type",
        &[
            (r"(?i)(deed\s*of\s*(?:gift|donation)\s*of\s*immovable\s*property)", group1),
            (r"(?i)(gift\s*settlement\s*deed)", group1),
            (r"(?i)(settlement\s*deed)", group1),
            (r"(?i)(sale\s*deed)", group1),
            (r"(?i)(partition\s*deed)", group1),
            (r"(?i)(release\s*deed)", group1),
            (r"(?i)(mortgage\s*deed)", group1),
        ],
    )
});

static MARKET_VALUE: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "deed.market_value",
        &[(
            r"(?i)(?:valued\s*at|worth|market\s*value)[:\s]*Rs\.?\s*([\d,]+)",
            amount,
        )],
    )
});

static SIGNED_BY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)Signed\s*by[:\-\s]*([A-Za-z\s]+?)(?:,|Age)"));

static EXECUTANT_TAG: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "deed.executant",
        &[(r"\(DE\)\s*([A-Za-z\s]+?)(?:\(|$|\n)", group1)],
    )
});

static CLAIMANT_TAG: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "deed.claimant",
        &[(r"\(DR\)\s*([A-Za-z\s]+?)(?:\(|$|\n)", group1)],
    )
});

static SURVEY_NO: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "deed.survey_no",
        &[
            (
                r"(?i)(?:Survey\s*(?:No\.?|Number)?|Sy\.?\s*No\.?|S\.?\s*No\.?)[:\s]*(\d+(?:[/\-]\d+)?)",
                group1,
            ),
            (r"(?i)survey\s*number\s*(\d+)", group1),
            (r"(?i)comprised\s*in\s*survey\s*(?:number\s*)?(\d+)", group1),
        ],
    )
});

const BEARING_HOUSE: &str = r"(?i)bearing\s*(?:house\s*)?(?:number|no\.?)\s*(\d+[-/]?\d*)";

static HOUSE_NO_SCHEDULE: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "deed.house_no.schedule",
        &[
            (BEARING_HOUSE, group1),
            (
                r"(?i)(?:Door\.?\s*No\.?|House\.?\s*No\.?|D\.?\s*No\.?)[:\s]*(\d+[-/]\d+)",
                group1,
            ),
            (r"(?i)no\.?\s*(\d+[-/]\d+)", group1),
        ],
    )
});

static HOUSE_NO_DEED: LazyLock<PatternList> =
    LazyLock::new(|| PatternList::new("deed.house_no.deed", &[(BEARING_HOUSE, group1)]));

/// Extent patterns capture `<number> <unit>`. The first three key off
/// "admeasuring" and are also tried against the whole deed.
const EXTENT_SPECS: &[&str] = &[
    r"(?i)admeasuring\s*(?:an\s*)?(?:extent\s*(?:of\s*)?)?(\d+\.?\d*\s*Sq\.?\s*(?:Yds?|Yards?))",
    r"(?i)admeasuring\s*(?:an\s*)?(?:extent\s*(?:of\s*)?)?(\d+\.?\d*\s*Sq\.?\s*(?:Ft|Feet))",
    r"(?i)admeasuring\s*(?:an\s*)?(?:extent\s*(?:of\s*)?)?(\d+\.?\d*\s*Sq\.?\s*M)",
    r"(?i)extent\s*(?:of\s*)?(\d+\.?\d*\s*Sq\.?\s*(?:Yds?|Yards?))",
    r"(?i)extent\s*(?:of\s*)?(\d+\.?\d*\s*Sq\.?\s*(?:Ft|Feet))",
    r"(?i)(?:residential\s*)?area\s*(?:of\s*)?(\d+\.?\d*\s*Sq\.?\s*(?:Yds?|M|Ft))",
];

static EXTENT_SCHEDULE: LazyLock<PatternList> = LazyLock::new(|| {
    let specs: Vec<(&str, Extractor)> =
        EXTENT_SPECS.iter().map(|p| (*p, group1 as Extractor)).collect();
    PatternList::new("deed.extent.schedule", &specs)
});

static EXTENT_DEED: LazyLock<PatternList> = LazyLock::new(|| {
    let specs: Vec<(&str, Extractor)> =
        EXTENT_SPECS[..3].iter().map(|p| (*p, group1 as Extractor)).collect();
    PatternList::new("deed.extent.deed", &specs)
});

static VILLAGE: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "deed.village",
        &[
            (
                r"(?i)\b(?:Village|Vill)\b\.?[:\s]*([A-Za-z\s]+?)(?:,|\n|\bMandal|\bDistrict|\bPanchayat)",
                group1,
            ),
            (
                r"(?i)situated\s*(?:at|in)\s*([A-Za-z\s]+?)(?:\s*Village|\s*Panchayat)",
                group1,
            ),
        ],
    )
});

static MANDAL: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "deed.mandal",
        &[(r"(?i)\bMandal\b[:\s]*([A-Za-z\s]+?)(?:,|\n|\bDistrict)", group1)],
    )
});

static DISTRICT: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "deed.district",
        &[(
            r"(?i)\b(?:District|Dist)\b\.?[:\s]*([A-Za-z\s]+?)(?:,|\n|\bState|\bregistered|\.|$)",
            group1,
        )],
    )
});

static SRO: LazyLock<PatternList> = LazyLock::new(|| {
    PatternList::new(
        "deed.sro",
        &[
            (r"(?i)Sub-?Registrar[,\s]*([A-Z\s]+?)(?:\(|\n|along)", group1),
            (r"(?i)SRO[:\s]*([A-Za-z\s]+?)(?:\(|\n|,)", group1),
            (
                r"(?i)registered\s*(?:at|before)\s*(?:the\s*)?(?:Sub-?Registrar|SRO)[,\s]*([A-Za-z\s]+)",
                group1,
            ),
        ],
    )
});

static BOUNDED_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?is)(?:bound(?:aries|ed)|between\s*this)[:\s]*(.*?)(?:this\s*area|between\s*this|The\s*dimensions|\n\n)",
    )
});

/// `(direction, pattern)`; a value must name a landmark to count and stays on
/// one line. Single-letter labels need a colon or dash after them.
static BOUNDARY_WORDS: LazyLock<Vec<(Direction, Regex)>> = LazyLock::new(|| {
    const LANDMARK: &str =
        r"([A-Za-z \t']*?(?:house|road|land|property|nayak|plot)[A-Za-z \t']*?)";
    [
        (Direction::North, "North", "N", "South|East|West"),
        (Direction::South, "South", "S", "North|East|West"),
        (Direction::East, "East", "E", "North|South|West"),
        (Direction::West, "West", "W", "North|South|East"),
    ]
    .into_iter()
    .map(|(direction, word, letter, others)| {
        let pattern = format!(
            r"(?i)\b(?:{word}\b|{letter}\s*[:\-])[:\-\s]*{LANDMARK}(?:[,.;\n]|\b(?:{others})\b|$)"
        );
        (direction, compile(&pattern))
    })
    .collect()
});

static BOUNDARY_BRACKETS: LazyLock<Vec<(Direction, Regex)>> = LazyLock::new(|| {
    [
        (Direction::North, r"\[N\][:\s]*([^\[\]]+?)(?:\[|\n|$)"),
        (Direction::South, r"\[S\][:\s]*([^\[\]]+?)(?:\[|\n|$)"),
        (Direction::East, r"\[E\][:\s]*([^\[\]]+?)(?:\[|\n|$)"),
        (Direction::West, r"\[W\][:\s]*([^\[\]]+?)(?:\[|\n|$)"),
    ]
    .into_iter()
    .map(|(direction, pattern)| (direction, compile(pattern)))
    .collect()
});

static BOUNDARY_NOISE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)rupee|judicial|stamp|india|twenty|hundred"));
static BRACKET_NOISE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)rupee|judicial|stamp"));

// ── Extractors ──

/// `12`, `January`, `2026` → `12-Jan-2026`.
fn day_month_year(caps: &Captures<'_>) -> Option<String> {
    let month = take_chars(caps.get(2)?.as_str(), 3);
    Some(format!("{}-{}-{}", &caps[1], month, caps.get(3)?.as_str()))
}

fn dashed_date(caps: &Captures<'_>) -> Option<String> {
    Some(caps.get(1)?.as_str().replace('/', "-"))
}

// ── Parser ──

/// Parse the ordered attachment blocks of one case.
pub fn parse_deed(attachments: &[String]) -> ExtractedDeedRecord {
    if attachments.is_empty() {
        return ExtractedDeedRecord::default();
    }

    let full_text = attachments.join("\n");
    let filtered = filter_stamp_noise(&full_text);
    let deed = locate_deed_content(&filtered);
    let schedule = isolate_schedule(deed);

    let signed: Vec<String> = SIGNED_BY
        .captures_iter(&full_text)
        .filter_map(|caps| non_blank(&caps[1]))
        .take(2)
        .collect();
    let mut signed = signed.into_iter();

    let record = ExtractedDeedRecord {
        raw_text: take_chars(&full_text, RAW_TEXT_CHARS).to_string(),
        cleaned_text: take_chars(deed, CLEANED_TEXT_CHARS).to_string(),
        doc_no: DOC_NO.first_match(&full_text),
        deed_type: DEED_TYPE.first_match(&full_text),
        executant: signed
            .next()
            .or_else(|| EXECUTANT_TAG.first_match(&full_text)),
        claimant: signed.next().or_else(|| CLAIMANT_TAG.first_match(&full_text)),
        extent: EXTENT_SCHEDULE
            .first_match(schedule)
            .or_else(|| EXTENT_DEED.first_match(deed)),
        survey_no: SURVEY_NO.first_match(deed),
        house_no: HOUSE_NO_SCHEDULE
            .first_match(schedule)
            .or_else(|| HOUSE_NO_DEED.first_match(deed)),
        village: VILLAGE.first_match(deed),
        mandal: MANDAL.first_match(deed),
        district: DISTRICT.first_match(deed),
        boundaries: deed_boundaries(deed, &full_text),
        execution_date: EXECUTION_DATE.first_match(&full_text),
        registration_date: REGISTRATION_DATE.first_match(&full_text),
        sro: SRO.first_match(&full_text),
        market_value: MARKET_VALUE.first_match(&full_text),
    };

    tracing::debug!(
        doc_no = record.doc_no.as_deref().unwrap_or("-"),
        extent = record.extent.as_deref().unwrap_or("-"),
        survey_no = record.survey_no.as_deref().unwrap_or("-"),
        "parsed deed text"
    );
    record
}

/// Boundaries from the "bounded by" span of the deed content, falling back to
/// `[N]`-style brackets anywhere in the raw text.
fn deed_boundaries(deed: &str, full_text: &str) -> Boundaries {
    let span = BOUNDED_SPAN
        .captures(deed)
        .and_then(|caps| caps.get(1))
        .map_or(deed, |m| m.as_str());

    let mut boundaries = Boundaries::default();
    for (direction, pattern) in BOUNDARY_WORDS.iter() {
        if let Some(caps) = pattern.captures(span) {
            let value = caps[1].trim();
            if !BOUNDARY_NOISE.is_match(value) {
                boundaries.fill(*direction, value);
            }
        }
    }

    if boundaries.is_empty() {
        for (direction, pattern) in BOUNDARY_BRACKETS.iter() {
            if let Some(caps) = pattern.captures(full_text) {
                let value = caps[1].trim();
                if !BRACKET_NOISE.is_match(value) {
                    boundaries.fill(*direction, value);
                }
            }
        }
    }
    boundaries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ExtractedDeedRecord {
        parse_deed(&[text.to_string()])
    }

    const GIFT_DEED: &str = "\
INDIA NON JUDICIAL
TWENTY RUPEES
Stamp S.No: 12AB 3456
This GIFT SETTLEMENT DEED is made and executed on this dated 6th of January, 2026
Doct No/Year: 1101/2026
The donor resides at H.No. 9-12, Kapra, Medchal District.
SCHEDULE OF PROPERTY
All that the house bearing house number 5-87 situated at Kapra Village, Kapra Mandal,
admeasuring an extent of 145 Sq. Yds. and bounded by: North: Neighbour's house, South: Road,
East: Vacant land of Ramesh, West: Open plot

WITNESSES:
1. Ravi
Signed by: Lakshmi Devi, Age 54
Signed by: Anil Kumar, Age 30
registered on 7th day of January, 2026 before the Sub-Registrar KAPRA (1510)
market value Rs. 12,50,000
";

    #[test]
    fn gift_deed_fields() {
        let record = parse(GIFT_DEED);
        assert_eq!(record.doc_no.as_deref(), Some("1101/2026"));
        assert_eq!(record.deed_type.as_deref(), Some("GIFT SETTLEMENT DEED"));
        assert_eq!(record.extent.as_deref(), Some("145 Sq. Yds"));
        assert_eq!(record.house_no.as_deref(), Some("5-87"));
        assert_eq!(record.village.as_deref(), Some("Kapra"));
        assert_eq!(record.executant.as_deref(), Some("Lakshmi Devi"));
        assert_eq!(record.claimant.as_deref(), Some("Anil Kumar"));
        assert_eq!(record.execution_date.as_deref(), Some("6-Jan-2026"));
        assert_eq!(record.registration_date.as_deref(), Some("7-Jan-2026"));
        assert_eq!(record.sro.as_deref(), Some("KAPRA"));
        assert_eq!(record.market_value.as_deref(), Some("1250000"));
    }

    #[test]
    fn stamp_noise_kept_out_of_cleaned_text() {
        let record = parse(GIFT_DEED);
        assert!(record.raw_text.contains("INDIA NON JUDICIAL"));
        assert!(!record.cleaned_text.contains("NON JUDICIAL"));
        assert!(record.cleaned_text.contains("GIFT SETTLEMENT DEED"));
    }

    #[test]
    fn bounded_span_boundaries() {
        let b = parse(GIFT_DEED).boundaries;
        assert_eq!(b.north.as_deref(), Some("Neighbour's house"));
        assert_eq!(b.south.as_deref(), Some("Road"));
        assert_eq!(b.east.as_deref(), Some("Vacant land of Ramesh"));
        assert_eq!(b.west.as_deref(), Some("Open plot"));
    }

    #[test]
    fn schedule_extent_beats_noise_elsewhere() {
        let text = "Sale deed. The vendor earlier sold an extent of 900 Sq. Ft to others.\n\
                    SCHEDULE: Plot admeasuring an extent of 145 Sq. Yds in Survey No. 12/3.\n\
                    WITNESSES: none";
        let record = parse(text);
        assert_eq!(record.extent.as_deref(), Some("145 Sq. Yds"));
        assert_eq!(record.survey_no.as_deref(), Some("12/3"));
    }

    #[test]
    fn bracket_boundaries_fallback() {
        let record = parse("Sale deed\n[N]: Road [S]: Plot 4 [E]: Stamp vendor [W]: Canal");
        assert_eq!(record.boundaries.north.as_deref(), Some("Road"));
        assert_eq!(record.boundaries.south.as_deref(), Some("Plot 4"));
        assert_eq!(record.boundaries.east, None);
        assert_eq!(record.boundaries.west.as_deref(), Some("Canal"));
    }

    #[test]
    fn registration_tags_fill_parties() {
        let record = parse("Sale deed presented\n(DE) RAMU NAIDU\n(DR) SITA DEVI (Claimant)");
        assert_eq!(record.executant.as_deref(), Some("RAMU NAIDU"));
        assert_eq!(record.claimant.as_deref(), Some("SITA DEVI"));
    }

    #[test]
    fn misses_are_absent() {
        let record = parse("nothing useful here at all");
        assert_eq!(record.doc_no, None);
        assert_eq!(record.extent, None);
        assert!(record.boundaries.is_empty());
        assert_eq!(parse_deed(&[]), ExtractedDeedRecord::default());
    }

    #[test]
    fn all_static_patterns_compile() {
        for list in [
            &*DOC_NO,
            &*EXECUTION_DATE,
            &*REGISTRATION_DATE,
            &*DEED_TYPE,
            &*MARKET_VALUE,
            &*EXECUTANT_TAG,
            &*CLAIMANT_TAG,
            &*SURVEY_NO,
            &*HOUSE_NO_SCHEDULE,
            &*HOUSE_NO_DEED,
            &*EXTENT_SCHEDULE,
            &*EXTENT_DEED,
            &*VILLAGE,
            &*MANDAL,
            &*DISTRICT,
            &*SRO,
        ] {
            assert!(!list.patterns().is_empty(), "{}", list.name());
        }
        assert_eq!(BOUNDARY_WORDS.len(), 4);
        assert_eq!(BOUNDARY_BRACKETS.len(), 4);
        let _ = (&*SIGNED_BY, &*BOUNDED_SPAN, &*BOUNDARY_NOISE, &*BRACKET_NOISE);
    }
}
