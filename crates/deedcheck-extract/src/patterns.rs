//! Ordered pattern lists: the first pattern that yields a value wins.
//!
//! Every field extractor in this crate is a [`PatternList`]. Precedence is the
//! list order, so each list reads top to bottom as "most reliable first".

use regex::{Captures, Regex};

/// Turns a match into a field value. Returning `None` lets the next pattern try.
pub type Extractor = fn(&Captures<'_>) -> Option<String>;

pub struct Pattern {
    regex: Regex,
    extract: Extractor,
}

impl Pattern {
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

pub struct PatternList {
    name: &'static str,
    patterns: Vec<Pattern>,
}

impl PatternList {
    /// Compile a list from `(regex, extractor)` pairs.
    ///
    /// Patterns are compile-time constants; an invalid one is a programming
    /// error and panics on first use.
    pub fn new(name: &'static str, specs: &[(&str, Extractor)]) -> Self {
        let patterns = specs
            .iter()
            .map(|(pattern, extract)| Pattern {
                regex: compile(pattern),
                extract: *extract,
            })
            .collect();
        Self { name, patterns }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Value of the first pattern whose first match extracts something.
    pub fn first_match(&self, text: &str) -> Option<String> {
        self.patterns.iter().find_map(|p| {
            p.regex
                .captures(text)
                .and_then(|caps| (p.extract)(&caps))
        })
    }

    /// Try each text in turn, returning the first hit.
    pub fn first_match_in<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> Option<String> {
        texts.into_iter().find_map(|t| self.first_match(t))
    }
}

pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid extraction pattern {pattern:?}: {e}"))
}

// ── Extractors ──

/// Group 1, trimmed; blank counts as no match.
pub fn group1(caps: &Captures<'_>) -> Option<String> {
    non_blank(caps.get(1)?.as_str())
}

/// The whole match, trimmed.
pub fn whole(caps: &Captures<'_>) -> Option<String> {
    non_blank(caps.get(0)?.as_str())
}

/// Group 1 with thousands separators removed.
pub fn amount(caps: &Captures<'_>) -> Option<String> {
    non_blank(&caps.get(1)?.as_str().replace(',', ""))
}

/// Groups 1 and 2 as `<number>/<year>`, leading zeros dropped from the number.
pub fn doc_pair(caps: &Captures<'_>) -> Option<String> {
    let number = caps.get(1)?.as_str();
    let year = caps.get(2)?.as_str();
    Some(format!("{}/{}", strip_zeros(number), year))
}

/// Like [`doc_pair`], but rejects registry placeholders: a zero document
/// number or a year before 1900.
pub fn registered_doc_pair(caps: &Captures<'_>) -> Option<String> {
    let number = strip_zeros(caps.get(1)?.as_str());
    let year: u32 = caps.get(2)?.as_str().parse().ok()?;
    if number == "0" || year < 1900 {
        return None;
    }
    doc_pair(caps)
}

fn strip_zeros(digits: &str) -> &str {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() { "0" } else { trimmed }
}

pub(crate) fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
