//! Regional EC format detection.
//!
//! Each region has a vocabulary of markers that only its registry software
//! prints. The score for a region is the number of distinct markers found
//! anywhere in the EC text; thresholds are checked in a fixed priority order.

use deedcheck_core::{DetectedState, EcEntry};

const TAMIL_NADU_MARKERS: &[&str] = &[
    "docno/docyear",
    "executant(s)",
    "claimant(s)",
    "conveyance",
    "schedule remarks",
    "document remarks",
    "vol.no",
    "pr number",
    "வடக்கு",
    "தெற்கு",
    "கிழக்கு",
    "மேற்கு",
    "(வ)",
    "(கி)",
    "(மே)",
    "(தெ)",
    "(ெத)",
    "(ேம)",
];

const TELANGANA_AP_MARKERS: &[&str] = &[
    "(de)",
    "(dr)",
    "[n]",
    "[s]",
    "[e]",
    "[w]",
    "mkt.value",
    "mkt. value",
    "cons.value",
    "cons. value",
    "(r)",
    "(e)",
];

const KARNATAKA_MARKERS: &[&str] = &[
    "hobli",
    "khata",
    "kaveri",
    "bhoomi",
    "karnataka",
    "bengaluru",
    "bangalore",
    "mysuru",
    "ಗ್ರಾಮ",
    "ಹೋಬಳಿ",
    "ತಾಲ್ಲೂಕು",
];

const TAMIL_NADU_THRESHOLD: usize = 2;
const TELANGANA_AP_THRESHOLD: usize = 2;
const KARNATAKA_THRESHOLD: usize = 1;

/// Per-region marker counts for one EC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateScores {
    pub tamil_nadu: usize,
    pub telangana_ap: usize,
    pub karnataka: usize,
}

impl StateScores {
    pub fn of(entries: &[EcEntry]) -> Self {
        let text = entries
            .iter()
            .map(EcEntry::joined)
            .collect::<Vec<_>>()
            .join("\n")
            .to_lowercase();
        let count = |markers: &[&str]| markers.iter().filter(|m| text.contains(*m)).count();
        Self {
            tamil_nadu: count(TAMIL_NADU_MARKERS),
            telangana_ap: count(TELANGANA_AP_MARKERS),
            karnataka: count(KARNATAKA_MARKERS),
        }
    }

    /// Tamil Nadu, then Telangana/AP, then Karnataka: the first region to
    /// reach its threshold wins.
    pub fn decide(&self) -> DetectedState {
        if self.tamil_nadu >= TAMIL_NADU_THRESHOLD {
            DetectedState::TamilNadu
        } else if self.telangana_ap >= TELANGANA_AP_THRESHOLD {
            DetectedState::TelanganaAp
        } else if self.karnataka >= KARNATAKA_THRESHOLD {
            DetectedState::Karnataka
        } else {
            DetectedState::Unknown
        }
    }
}

/// Classify the EC format of a case.
pub fn detect_state(entries: &[EcEntry]) -> DetectedState {
    let scores = StateScores::of(entries);
    let state = scores.decide();
    if state == DetectedState::Unknown && !entries.is_empty() {
        tracing::warn!(
            tamil_nadu = scores.tamil_nadu,
            telangana_ap = scores.telangana_ap,
            karnataka = scores.karnataka,
            "EC format not recognised, using generic patterns"
        );
    } else {
        tracing::debug!(state = state.as_str(), ?scores, "detected EC format");
    }
    state
}
