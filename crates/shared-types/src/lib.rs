pub mod types;

pub use types::{
    AnalyzedClause, ClauseAdvice, ClauseCandidate, ProtocolReport, RiskLevel, UploadResponse,
};
