//! Generator and critic prompt text.
//!
//! The prompts are data for the external model; nothing here parses model
//! output. Risk levels and section keys are rendered from the same enums the
//! validator checks against, so the two cannot drift apart.

use deedcheck_core::{RiskLevel, Section, Severity};

/// Title-verification checklist shared by both stages.
pub const SOP_CHECKLIST: &str = "\
## SOP RULES FOR TITLE VERIFICATION

### A. PROPERTY DETAILS
- Owner name matches the latest title deed and the EC (spelling, initials, surname)
- Document number and year match the deed exactly
- Deed type (sale, gift, partition, ...) matches the deed
- SRO name matches the deed and the EC
- House, assessment and survey numbers match the deed
- Village, mandal, district and state are complete and correct
- Extent and its unit match the deed and agree across all sections

### B. SCHEDULE OF PROPERTY
- House, assessment and survey numbers, village, mandal, district and state as per the deed
- Boundaries (N/S/E/W) match the deed exactly
- Where EC boundaries differ, the deed is primary; note the difference in Additional Remarks
- Relationship between parties matches the deed recitals
- Conditional settlements (life interest and similar) are captured

### C. DOCUMENTS SCRUTINIZED
- Every document relied upon is listed
- Listed oldest to newest
- Each item has description, date and type (Original/Photocopy/Online/Scanned)

### D. ENCUMBRANCE CERTIFICATE
- EC period covers the policy period
- Relevant document numbers, years and deed types from the EC are reflected
- Mortgages and receipt deeds affecting the property are captured
- An active mortgage makes the conclusion \"subject to discharge/release\"
- An EC supplied by the FI is noted in Additional Remarks

### E. FLOW OF TITLE
- Title chain is continuous from the earliest link document to the current owner
- Each step has registration number, date, parties, extent and identifiers
- Deaths are supported by death certificates
- Representatives (PoA holders, heirs) are stated
- Extent at each step matches that step's deed

### F. MUTATION AND TAX
- Mutation agrees with the HTR
- Tax receipts give payer name, receipt number and period
- Tax in a deceased person's name is mentioned in Additional Remarks

### G. CONCLUSION AND REMARKS
- Restates owner, extent, identifiers and location correctly
- Encumbrances, conditional interests and EC limitations appear as \"subject to\"
- Additional Remarks cover boundary differences, conditional settlements, presumptions and FI-supplied ECs

### H. STATE-SPECIFIC NOTES
- TAMIL NADU:
  - Party names and boundaries in the EC may be in Tamil script
  - Direction abbreviations: (வ)=North, (தெ)=South, (கி)=East, (மே)=West
  - Document numbers appear as \"Docno/Docyear: NNNN/YYYY\"
  - Survey numbers may be lists: \"225/2, 228/1B2B\"
  - Plot/site numbers identify urban property
  - \"Conveyance\" means \"Sale Deed\"; \"Gift Settlement\" means \"Gift Deed\"
  - Parties appear as \"Executant(s):\" and \"Claimant(s):\"
- TELANGANA / ANDHRA PRADESH:
  - EC boundaries appear as [N]: [S]: [E]: [W]:
  - Parties appear as (DE) executant and (DR) claimant
  - Values appear as \"Mkt. Value: Rs. X, Cons. Value: Rs. Y\"
- KARNATAKA:
  - Some fields may contain Kannada script
";

const ISSUE_RULES_GENERATOR: &str = "\
For EVERY issue give BOTH:
1. evidence.from_report: the exact snippet from the report
2. evidence.from_source_docs: the exact snippet from the translated documents or the EC

An issue without both snippets is not valid.";

const FALSE_POSITIVES: &str = "\
Remove issues that are format differences rather than mismatches:
- Tamil-script EC party vs English transliteration in the report, when it is the same person
- \"Conveyance\" vs \"Sale Deed\", \"Gift Settlement\" vs \"Gift Deed\"
- Tamil or bracketed boundary labels vs English labels with the same content
- \"4960/2011\" vs \"4960 of 2011\"
- Survey-number issues whose evidence is a document number (NNNN/YYYY)
- Evidence taken from stamp-paper text or OCR noise (Rs., judicial, denomination)
- Report owner compared to the EC executant instead of the claimant";

fn severities() -> String {
    Severity::ALL
        .iter()
        .map(Severity::as_str)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Output schema block: the envelope, every section key, and one issue.
fn output_schema(example_id: &str) -> String {
    let sections = Section::ALL
        .iter()
        .map(|s| format!("    \"{}\": [ISSUE, ...]", s.key()))
        .collect::<Vec<_>>()
        .join(",\n");
    format!(
        "{{\n  \"overall_summary\": \"...\",\n  \"overall_risk_level\": {risk},\n  \"sections\": {{\n{sections}\n  }}\n}}\n\n\
         Each ISSUE:\n\
         {{\n  \"id\": \"{example_id}\",\n  \"severity\": \"{severity}\",\n  \"location\": \"section and field or paragraph\",\n  \
         \"rule\": \"SOP rule reference\",\n  \"message_for_maker\": \"what is wrong\",\n  \"suggested_fix\": \"how to fix it\",\n  \
         \"evidence\": {{\n    \"from_report\": \"exact snippet from the report\",\n    \"from_source_docs\": \"exact snippet from the source documents\"\n  }}\n}}",
        risk = RiskLevel::choices(),
        severity = severities(),
    )
}

/// Stage one: high-recall issue generation.
pub fn generator_prompt(case_extract_json: &str, precedents: &str) -> String {
    format!(
        "You are a senior Indian real-estate title lawyer checking a maker-drafted title report \
         for a loan against property.\n\n\
         ## TASK\n\
         Compare the report against the source documents and list ALL potential issues. \
         Include uncertain issues; a later stage filters them.\n\n\
         ## EVIDENCE\n{ISSUE_RULES_GENERATOR}\n\n\
         ## STATE FORMATS\n\
         Use `detected_state` in the case extract to read state-specific formats. \
         Never treat a document number (NNNN/YYYY) as a survey number.\n\n\
         {SOP_CHECKLIST}\n\
         ## SIMILAR PRECEDENTS\n{precedents}\n\n\
         A pattern accepted in a precedent suggests lower severity. A recurring high-risk pattern \
         should be prioritised. Precedent exceptions list known false positives.\n\n\
         ## CASE EXTRACT\n\
         `source_doc_snippet` is text from the attachments, `ec_summary` the EC transactions and \
         `report_sections` the maker's draft. Compare `owner_applicant`, `title_deed`, `schedule` \
         and `boundaries` across sources.\n\n\
         {case_extract_json}\n\n\
         ## OUTPUT\n\
         Return one JSON object:\n{schema}\n\n\
         Use an empty array for a section without issues.",
        schema = output_schema("TEMP-01"),
    )
}

/// Stage two: prune, merge, calibrate and renumber the candidate review.
pub fn critic_prompt(case_extract_json: &str, precedents: &str, candidate_json: &str) -> String {
    format!(
        "You are a senior quality-control reviewer for legal opinion reports.\n\n\
         ## TASK\n\
         Turn the CANDIDATE_REVIEW into the final review object:\n\
         1. Remove issues missing either evidence snippet, or whose evidence does not show a mismatch.\n\
         2. Merge issues describing the same mismatch.\n\
         3. Calibrate severity against the precedents.\n\
         4. Renumber ids per section (PD-01, SP-01, EC-01, ...).\n\
         5. Leave a section as [] when nothing remains.\n\n\
         ## FALSE POSITIVES\n{FALSE_POSITIVES}\n\n\
         ## PRECEDENTS\n{precedents}\n\n\
         ## CASE EXTRACT\n{case_extract_json}\n\n\
         ## CANDIDATE_REVIEW\n{candidate_json}\n\n\
         ## OUTPUT\n\
         Return ONLY this JSON object, no markdown:\n{schema}",
        schema = output_schema("PD-01"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_prompts_use_validator_risk_levels() {
        for prompt in [
            generator_prompt("{}", "none"),
            critic_prompt("{}", "none", "{}"),
        ] {
            assert!(prompt.contains("\"OK\" | \"NEEDS_FIX_BEFORE_RELEASE\" | \"BLOCKER\""));
            assert!(!prompt.contains("CLEAR_TO_RELEASE"));
            for section in Section::ALL {
                assert!(prompt.contains(&format!("\"{}\"", section.key())));
            }
        }
    }

    #[test]
    fn payloads_are_embedded() {
        let generator = generator_prompt("{\"case\":1}", "--- Precedent 1: A ---");
        assert!(generator.contains("{\"case\":1}"));
        assert!(generator.contains("--- Precedent 1: A ---"));
        assert!(generator.contains("### H. STATE-SPECIFIC NOTES"));

        let critic = critic_prompt("{}", "p", "{\"candidate\":true}");
        assert!(critic.contains("{\"candidate\":true}"));
        assert!(critic.contains("\"id\": \"PD-01\""));
    }
}
