//! Stamp-paper noise removal and deed/schedule section location.
//!
//! OCR of Indian deeds starts with e-stamp paper: denominations, emblems and
//! Hindi boilerplate that mention rupees, numbers and "India" everywhere.
//! Field patterns run against the located deed content, and property fields
//! against the schedule section, so that party addresses and stamp text do
//! not win.

use std::sync::LazyLock;

use regex::Regex;

use crate::patterns::compile;
use crate::text::{back_chars, char_offset, take_chars};

/// Characters of context kept before the earliest deed-start marker.
const DEED_LEAD_IN: usize = 100;
/// A schedule-end marker closer than this to the start is part of the heading.
const SCHEDULE_MIN_SPAN: usize = 50;
const SCHEDULE_MAX_CHARS: usize = 2000;

static STAMP_NOISE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)twenty\s*rupees?",
        r"(?i)hundred\s*rupees?",
        r"(?i)fifty\s*rupees?",
        r"(?i)thousand\s*rupees?",
        r"(?i)india\s*non\s*judicial",
        r"(?i)non\s*judicial\s*stamp",
        r"(?i)stamp\s*s\.?\s*no\.?\s*[:\s]*\d+[a-z]*\s*\d+",
        r"(?i)denomination[:\s]*rs\.?\s*\d+",
        r"(?i)purchased\s*by",
        r"(?i)for\s*whom",
        r"(?i)satyameva?\s*jayate?",
        r"सत्यमेव\s*जयते",
        r"भारत\s*सरकार",
        r"(?i)government\s*of\s*india",
        r"(?i)PEES?\s*OPER",
        r"(?i)WEN\s*EN",
        r"(?i)\d+/\d+\s*Rs\.",
        r"रू\.\d+",
        r"बीस\s*रूप",
        r"भारतीय",
        r"ग्रीयायिक",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

static NUMERIC_LINE: LazyLock<Regex> = LazyLock::new(|| compile(r"^[\d\s./\-]+$"));

static DEED_START: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)deed\s*of\s*(?:gift|sale|donation|partition|settlement)",
        r"(?i)gift\s*settlement\s*deed",
        r"(?i)sale\s*deed",
        r"(?i)signed\s*by[:\s]*",
        r"(?i)schedule[:\s]*",
        r"(?i)property\s*(?:details|description)",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

static SCHEDULE_START: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)schedule\s*(?:of\s*property)?[:\s]*",
        r"(?i)property\s*schedule[:\s]*",
        r"(?i)scheduled\s*property[:\s]*",
        r"(?i)the\s*scheduled\s*property",
        r"(?i)description\s*of\s*(?:the\s*)?property",
        r"(?i)property\s*description",
        r"(?i)situated\s*(?:at|in)",
        r"(?i)comprised\s*in\s*survey",
        r"(?i)bearing\s*(?:house\s*)?number",
        r"(?i)admeasuring\s*(?:an\s*)?extent",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

static SCHEDULE_END: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)witnesses?[:\s]*",
        r"(?i)annexure",
        r"(?i)declaration",
        r"(?i)stamp\s*duty",
        r"(?i)registration\s*fee",
        r"(?i)this\s*(?:is\s*the\s*)?settlement\s*(?:deed|document)",
        r"(?i)signed\s*(?:and\s*)?sealed",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

/// Remove stamp-paper phrases, then drop lines that carry no deed content.
///
/// A line is dropped when it has fewer than three non-blank characters, is
/// only digits and separators, or is longer than ten characters with under
/// 30% ASCII letters.
pub fn filter_stamp_noise(text: &str) -> String {
    let mut cleaned = text.to_string();
    for pattern in STAMP_NOISE.iter() {
        cleaned = pattern.replace_all(&cleaned, " ").into_owned();
    }
    cleaned
        .split('\n')
        .filter(|line| keep_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn keep_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.chars().count() < 3 || NUMERIC_LINE.is_match(trimmed) {
        return false;
    }
    let len = line.chars().count();
    let letters = line.chars().filter(char::is_ascii_alphabetic).count();
    !(len > 10 && (letters as f64) < len as f64 * 0.3)
}

/// Drop everything before the earliest deed-start marker, keeping a short
/// lead-in. Text with no marker is returned whole.
pub fn locate_deed_content(text: &str) -> &str {
    let earliest = DEED_START
        .iter()
        .filter_map(|p| p.find(text).map(|m| m.start()))
        .min();
    match earliest {
        Some(start) => &text[back_chars(text, start, DEED_LEAD_IN)..],
        None => text,
    }
}

/// Isolate the property schedule: from the earliest start marker to the
/// first end marker more than 50 characters in, capped at 2000 characters.
///
/// With no start marker the span begins at the top of `text`. An empty span
/// falls back to the first 2000 characters.
pub fn isolate_schedule(text: &str) -> &str {
    let start = SCHEDULE_START
        .iter()
        .filter_map(|p| p.find(text).map(|m| m.start()))
        .min()
        .unwrap_or(0);
    let rest = &text[start..];

    let end = SCHEDULE_END
        .iter()
        .filter_map(|p| {
            p.find_iter(rest)
                .map(|m| m.start())
                .find(|&idx| char_offset(rest, idx) > SCHEDULE_MIN_SPAN)
        })
        .min()
        .unwrap_or(rest.len());

    let span = take_chars(&rest[..end], SCHEDULE_MAX_CHARS);
    if span.is_empty() {
        take_chars(text, SCHEDULE_MAX_CHARS)
    } else {
        span
    }
}
