//! EC-record parser with per-region dispatch.
//!
//! The state detector picks one [`EntryParser`] per case. Each entry is parsed
//! independently into a [`PartialEcEntry`]; entries are then folded into the
//! record first-non-empty-wins, while transactions accumulate in EC order.

mod generic;
mod tamil_nadu;

pub use generic::GenericEntryParser;
pub use tamil_nadu::TamilNaduEntryParser;

use deedcheck_core::{Boundaries, DetectedState, EcEntry, ExtractedEcRecord, Transaction};

use crate::state::detect_state;

/// Everything one EC entry contributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialEcEntry {
    pub property_description: Option<String>,
    pub boundaries: Boundaries,
    pub extent: Option<String>,
    pub survey_no: Option<String>,
    pub house_no: Option<String>,
    pub plot_no: Option<String>,
    pub sro: Option<String>,
    pub transaction: Transaction,
}

impl PartialEcEntry {
    /// Fill every empty field from `other`.
    pub fn fill_from(&mut self, other: PartialEcEntry) {
        fill(&mut self.property_description, other.property_description);
        self.boundaries.fill_from(&other.boundaries);
        fill(&mut self.extent, other.extent);
        fill(&mut self.survey_no, other.survey_no);
        fill(&mut self.house_no, other.house_no);
        fill(&mut self.plot_no, other.plot_no);
        fill(&mut self.sro, other.sro);

        let (txn, theirs) = (&mut self.transaction, other.transaction);
        fill(&mut txn.doc_no, theirs.doc_no);
        fill(&mut txn.deed_code, theirs.deed_code);
        fill(&mut txn.deed_type, theirs.deed_type);
        fill(&mut txn.registration_date, theirs.registration_date);
        fill(&mut txn.execution_date, theirs.execution_date);
        fill(&mut txn.executant, theirs.executant);
        fill(&mut txn.claimant, theirs.claimant);
        fill(&mut txn.market_value, theirs.market_value);
        fill(&mut txn.consideration_value, theirs.consideration_value);
        fill(&mut txn.description, theirs.description);
    }
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value;
    }
}

/// One regional EC layout.
pub trait EntryParser: Send + Sync {
    fn parse(&self, entry: &EcEntry) -> PartialEcEntry;
}

/// The parser for a detected region. Regions without a dedicated layout use
/// the generic bracket/label patterns.
pub fn parser_for(state: DetectedState) -> &'static dyn EntryParser {
    match state {
        DetectedState::TamilNadu => &TamilNaduEntryParser,
        DetectedState::TelanganaAp | DetectedState::Karnataka | DetectedState::Unknown => {
            &GenericEntryParser
        }
    }
}

/// Parse a case's EC entries, detecting the regional format first.
pub fn parse_ec(entries: &[EcEntry]) -> ExtractedEcRecord {
    let state = detect_state(entries);
    parse_ec_as(entries, state)
}

/// Parse EC entries with an already-known regional format.
pub fn parse_ec_as(entries: &[EcEntry], state: DetectedState) -> ExtractedEcRecord {
    let parser = parser_for(state);
    let mut record = ExtractedEcRecord {
        detected_state: state,
        ..Default::default()
    };

    for entry in entries {
        let partial = parser.parse(entry);
        fill(&mut record.property_description, partial.property_description);
        record.boundaries.fill_from(&partial.boundaries);
        fill(&mut record.extent, partial.extent);
        fill(&mut record.survey_no, partial.survey_no);
        fill(&mut record.house_no, partial.house_no);
        fill(&mut record.plot_no, partial.plot_no);
        fill(&mut record.sro, partial.sro);
        fill(&mut record.market_value, partial.transaction.market_value.clone());
        fill(
            &mut record.consideration_value,
            partial.transaction.consideration_value.clone(),
        );
        record.transactions.push(partial.transaction);
    }
    record.mortgage_flag = record.transactions.iter().any(Transaction::is_mortgage);

    tracing::debug!(
        state = state.as_str(),
        transactions = record.transactions.len(),
        mortgage = record.mortgage_flag,
        "parsed EC"
    );
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(description: &str, identifiers: &str, deed_value: &str) -> EcEntry {
        EcEntry {
            description: description.into(),
            identifiers: identifiers.into(),
            deed_value: deed_value.into(),
            ..Default::default()
        }
    }

    #[test]
    fn tamil_markers_only_resolve_through_tamil_nadu_parser() {
        let tn = entry("(வ) Road (தெ) Canal", "", "");
        let parsed = parser_for(DetectedState::TamilNadu).parse(&tn);
        assert_eq!(parsed.boundaries.north.as_deref(), Some("Road"));
        assert_eq!(parsed.boundaries.south.as_deref(), Some("Canal"));
        for state in [
            DetectedState::TelanganaAp,
            DetectedState::Karnataka,
            DetectedState::Unknown,
        ] {
            let parsed = parser_for(state).parse(&tn);
            assert_eq!(parsed.boundaries.north, None, "{state:?}");
        }

        let ts = entry("[N]: Road [S]: Canal", "", "");
        let parsed = parser_for(DetectedState::TelanganaAp).parse(&ts);
        assert_eq!(parsed.boundaries.north.as_deref(), Some("Road"));
    }

    #[test]
    fn first_value_wins_and_transactions_accumulate() {
        let ec = [
            entry(
                "EXTENT: 145 SQ.YDS [N]: Road [S]: Plot 12",
                "0/0\n1101/2026 [1]\nof SRO\nKAPRA",
                "1 Gift Settlement\nMkt.Value: Rs. 12,00,000",
            ),
            entry(
                "EXTENT: 200 SQ.YDS [N]: Canal [E]: House of Ravi",
                "77/2019",
                "17 Mortgage\nMkt.Value: Rs. 9,00,000",
            ),
        ];
        let record = parse_ec_as(&ec, DetectedState::TelanganaAp);
        assert_eq!(record.transactions.len(), 2);
        assert_eq!(record.extent.as_deref(), Some("EXTENT: 145 SQ.YDS"));
        assert_eq!(record.boundaries.north.as_deref(), Some("Road"));
        assert_eq!(record.boundaries.east.as_deref(), Some("House of Ravi"));
        assert_eq!(record.market_value.as_deref(), Some("1200000"));
        assert_eq!(record.sro.as_deref(), Some("KAPRA"));
        assert_eq!(record.transactions[0].doc_no.as_deref(), Some("1101/2026"));
        assert_eq!(record.transactions[1].doc_no.as_deref(), Some("77/2019"));
        assert_eq!(record.transactions[1].market_value.as_deref(), Some("900000"));
        assert!(record.mortgage_flag);
    }

    #[test]
    fn gift_settlement_is_not_a_mortgage() {
        let ec = [entry("", "1101/2026 [1]", "1 Gift Settlement ...")];
        let record = parse_ec_as(&ec, DetectedState::TelanganaAp);
        assert_eq!(record.transactions[0].deed_type.as_deref(), Some("Gift Settlement"));
        assert_eq!(record.transactions[0].deed_code.as_deref(), Some("1"));
        assert!(!record.mortgage_flag);
    }

    #[test]
    fn empty_ec() {
        let record = parse_ec(&[]);
        assert_eq!(record.detected_state, DetectedState::Unknown);
        assert!(record.transactions.is_empty());
        assert!(!record.mortgage_flag);
    }

    #[test]
    fn partial_fill_keeps_specific_values() {
        let mut specific = PartialEcEntry {
            extent: Some("1200 Sq.Ft".into()),
            ..Default::default()
        };
        specific.transaction.doc_no = Some("4960/2011".into());
        let generic = PartialEcEntry {
            extent: Some("EXTENT: 9".into()),
            sro: Some("Tambaram".into()),
            transaction: Transaction {
                doc_no: Some("1/2000".into()),
                executant: Some("X".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        specific.fill_from(generic);
        assert_eq!(specific.extent.as_deref(), Some("1200 Sq.Ft"));
        assert_eq!(specific.sro.as_deref(), Some("Tambaram"));
        assert_eq!(specific.transaction.doc_no.as_deref(), Some("4960/2011"));
        assert_eq!(specific.transaction.executant.as_deref(), Some("X"));
    }
}
