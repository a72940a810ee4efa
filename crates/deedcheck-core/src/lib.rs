pub mod case;
pub mod de;
pub mod normalize;
pub mod precedent;
pub mod record;
pub mod review;

pub use case::{CaseMeta, EcEntry, RawCase, ReportJson};
pub use normalize::{
    normalize_date, normalize_doc_no, normalize_extent, normalize_name, normalize_survey_no,
};
pub use precedent::{PrecedentCase, PrecedentChunk, chunk_precedent};
pub use record::{
    Boundaries, DetectedState, Direction, ExtractedDeedRecord, ExtractedEcRecord,
    ExtractedReportRecord, Transaction,
};
pub use review::{Issue, ReviewObject, RiskLevel, Section, Severity};
