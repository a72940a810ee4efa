//! Structured partial records produced by the three source parsers.
//!
//! A `None` field always means "not found in this source". Consumers must
//! treat absence as unknown, never as a mismatch.

use serde::{Deserialize, Serialize};

/// Regional EC format, decided once per case by the state detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectedState {
    TamilNadu,
    TelanganaAp,
    Karnataka,
    #[default]
    Unknown,
}

impl DetectedState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TamilNadu => "TAMIL_NADU",
            Self::TelanganaAp => "TELANGANA_AP",
            Self::Karnataka => "KARNATAKA",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Human-readable region name, `None` when undetected.
    pub fn display_name(&self) -> Option<&'static str> {
        match self {
            Self::TamilNadu => Some("Tamil Nadu"),
            Self::TelanganaAp => Some("Telangana/AP"),
            Self::Karnataka => Some("Karnataka"),
            Self::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::North, Self::South, Self::East, Self::West];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }
}

/// Four boundary descriptions keyed by compass direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundaries {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub north: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub south: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub east: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub west: Option<String>,
}

impl Boundaries {
    pub fn get(&self, direction: Direction) -> Option<&str> {
        self.slot(direction).as_deref()
    }

    /// Set a direction unless it already holds a value. Blank values are ignored.
    pub fn fill(&mut self, direction: Direction, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let slot = self.slot_mut(direction);
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }

    /// Fill every empty direction from `other`.
    pub fn fill_from(&mut self, other: &Boundaries) {
        for direction in Direction::ALL {
            if let Some(value) = other.get(direction) {
                self.fill(direction, value);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        Direction::ALL.iter().all(|d| self.get(*d).is_none())
    }

    fn slot(&self, direction: Direction) -> &Option<String> {
        match direction {
            Direction::North => &self.north,
            Direction::South => &self.south,
            Direction::East => &self.east,
            Direction::West => &self.west,
        }
    }

    fn slot_mut(&mut self, direction: Direction) -> &mut Option<String> {
        match direction {
            Direction::North => &mut self.north,
            Direction::South => &mut self.south,
            Direction::East => &mut self.east,
            Direction::West => &mut self.west,
        }
    }
}

// ── Deed text ──

/// Fields recovered from the OCR'd deed attachments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDeedRecord {
    /// Head of the joined attachment text, before noise filtering.
    pub raw_text: String,
    /// Head of the located deed content, after noise filtering.
    pub cleaned_text: String,
    pub doc_no: Option<String>,
    pub deed_type: Option<String>,
    pub executant: Option<String>,
    pub claimant: Option<String>,
    pub extent: Option<String>,
    pub survey_no: Option<String>,
    pub house_no: Option<String>,
    pub village: Option<String>,
    pub mandal: Option<String>,
    pub district: Option<String>,
    pub boundaries: Boundaries,
    pub execution_date: Option<String>,
    pub registration_date: Option<String>,
    pub sro: Option<String>,
    pub market_value: Option<String>,
}

// ── Encumbrance certificate ──

/// One registered transaction, one per EC entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub doc_no: Option<String>,
    pub deed_code: Option<String>,
    pub deed_type: Option<String>,
    pub registration_date: Option<String>,
    pub execution_date: Option<String>,
    pub executant: Option<String>,
    pub claimant: Option<String>,
    pub market_value: Option<String>,
    pub consideration_value: Option<String>,
    pub description: Option<String>,
}

impl Transaction {
    /// Whether this deed creates a charge: a mortgage, or a deposit of title
    /// deeds, which is treated the same way.
    pub fn is_mortgage(&self) -> bool {
        self.deed_type.as_deref().is_some_and(|t| {
            let t = t.to_lowercase();
            t.contains("mortgage") || t.contains("deposit")
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEcRecord {
    pub detected_state: DetectedState,
    pub transactions: Vec<Transaction>,
    pub mortgage_flag: bool,
    pub property_description: Option<String>,
    pub boundaries: Boundaries,
    pub extent: Option<String>,
    pub survey_no: Option<String>,
    pub house_no: Option<String>,
    pub plot_no: Option<String>,
    pub sro: Option<String>,
    pub market_value: Option<String>,
    pub consideration_value: Option<String>,
}

impl ExtractedEcRecord {
    /// The first (oldest-listed) transaction, which the comparison views use.
    pub fn first_transaction(&self) -> Option<&Transaction> {
        self.transactions.first()
    }
}

// ── Report ──

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDetails {
    pub code: Option<String>,
    pub applicant: Option<String>,
    pub owner: Option<String>,
    pub doc_no: Option<String>,
    pub deed_type: Option<String>,
    pub sro: Option<String>,
    pub survey_no: Option<String>,
    pub house_no: Option<String>,
    pub flat_no: Option<String>,
    pub plot_no: Option<String>,
    pub assessment_no: Option<String>,
    pub extent: Option<String>,
    pub village: Option<String>,
    pub taluk: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub mutation: Option<String>,
    pub accessibility: Option<String>,
    pub document_age: Option<String>,
    pub loan_amount: Option<String>,
    pub property_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDetails {
    pub schedule_no: Option<String>,
    pub survey_no: Option<String>,
    pub house_no: Option<String>,
    pub extent: Option<String>,
    pub village: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrutinizedDocument {
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub number: Option<String>,
    pub date: Option<String>,
    pub subtype: Option<String>,
}

/// Loan-file identifiers carried alongside the property fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseInfo {
    pub branch: Option<String>,
    pub lan: Option<String>,
    pub policy: Option<String>,
    pub mortgagor_relationship: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedReportRecord {
    pub property_details: PropertyDetails,
    pub case_info: CaseInfo,
    pub schedule: ScheduleDetails,
    pub boundaries: Boundaries,
    pub sections_text: Vec<String>,
    pub documents_scrutinized: Vec<ScrutinizedDocument>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_keeps_first_value() {
        let mut b = Boundaries::default();
        b.fill(Direction::North, "  Road  ");
        b.fill(Direction::North, "Canal");
        b.fill(Direction::East, "   ");
        assert_eq!(b.get(Direction::North), Some("Road"));
        assert_eq!(b.get(Direction::East), None);
    }

    #[test]
    fn fill_from_only_fills_gaps() {
        let mut a = Boundaries {
            north: Some("Road".into()),
            ..Default::default()
        };
        let b = Boundaries {
            north: Some("Canal".into()),
            west: Some("Plot 12".into()),
            ..Default::default()
        };
        a.fill_from(&b);
        assert_eq!(a.get(Direction::North), Some("Road"));
        assert_eq!(a.get(Direction::West), Some("Plot 12"));
        assert!(!a.is_empty());
    }

    #[test]
    fn deposit_of_title_deeds_counts_as_mortgage() {
        let txn = Transaction {
            deed_type: Some("Deposit of Title Deeds".into()),
            ..Default::default()
        };
        assert!(txn.is_mortgage());
        let txn = Transaction {
            deed_type: Some("Gift Settlement".into()),
            ..Default::default()
        };
        assert!(!txn.is_mortgage());
        assert!(!Transaction::default().is_mortgage());
    }

    #[test]
    fn detected_state_wire_names() {
        let json = serde_json::to_string(&DetectedState::TelanganaAp).unwrap();
        assert_eq!(json, "\"TELANGANA_AP\"");
        assert_eq!(DetectedState::TamilNadu.as_str(), "TAMIL_NADU");
        assert_eq!(DetectedState::Unknown.display_name(), None);
    }
}
