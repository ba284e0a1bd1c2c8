use super::domain::{CandidateRecord, MandateId, MandateRecord};
use super::ranking::MandateScoringResult;
use super::reasoning::WeekWindow;

/// Read-only access to the CRM rows a mandate is scored from.
pub trait CandidateSource: Send + Sync {
    fn mandate(&self, id: &MandateId) -> Result<Option<MandateRecord>, SourceError>;
    fn candidates_for(&self, id: &MandateId) -> Result<Vec<CandidateRecord>, SourceError>;
}

/// Upstream data-access failure.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("candidate source unavailable: {0}")]
    Unavailable(String),
    #[error("candidate source timed out after {0} ms")]
    Timeout(u64),
}

/// Storage for completed scoring runs so weekly summaries can be rebuilt.
pub trait ScoringResultRepository: Send + Sync {
    fn record(&self, result: MandateScoringResult) -> Result<(), RepositoryError>;
    fn within(&self, window: WeekWindow) -> Result<Vec<MandateScoringResult>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
