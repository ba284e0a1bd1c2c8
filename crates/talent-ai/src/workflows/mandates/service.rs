use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::domain::{CandidateRecord, InvalidInputError, MandateId, MandateRecord};
use super::ranking::{rank_mandate, MandateScoringResult};
use super::reasoning::{attach_reasoning, build_weekly_bias_summary, WeekWindow, WeeklyBiasSummary};
use super::repository::{CandidateSource, RepositoryError, ScoringResultRepository, SourceError};
use super::scoring::{ScoringConfig, ScoringEngine};
use super::signals::{extract_profile, mandate_requirements};

/// Service composing the candidate source, scoring engine, and result store.
pub struct MandateScoringService<S, R> {
    source: Arc<S>,
    results: Arc<R>,
    engine: Arc<ScoringEngine>,
}

impl<S, R> MandateScoringService<S, R>
where
    S: CandidateSource + 'static,
    R: ScoringResultRepository + 'static,
{
    pub fn new(source: Arc<S>, results: Arc<R>, config: ScoringConfig) -> Self {
        Self {
            source,
            results,
            engine: Arc::new(ScoringEngine::new(config)),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        self.engine.config()
    }

    /// Score a stored mandate now and record the result.
    pub fn score_mandate(
        &self,
        mandate_id: &MandateId,
    ) -> Result<MandateScoringResult, ScoringServiceError> {
        self.score_mandate_at(mandate_id, Utc::now())
    }

    /// Score a stored mandate, stamping the result with `scored_at`.
    pub fn score_mandate_at(
        &self,
        mandate_id: &MandateId,
        scored_at: DateTime<Utc>,
    ) -> Result<MandateScoringResult, ScoringServiceError> {
        let mut mandate = self
            .source
            .mandate(mandate_id)
            .map_err(|error| upstream_failure(mandate_id, error))?
            .ok_or_else(|| ScoringServiceError::MandateNotFound(mandate_id.clone()))?;

        let blank_id = mandate
            .mandate_id
            .as_deref()
            .map_or(true, |id| id.trim().is_empty());
        if blank_id {
            mandate.mandate_id = Some(mandate_id.0.clone());
        }

        let records = self
            .source
            .candidates_for(mandate_id)
            .map_err(|error| upstream_failure(mandate_id, error))?;

        let result = self.evaluate(&mandate, &records, scored_at)?;
        self.results.record(result.clone())?;
        Ok(result)
    }

    /// Rank caller-supplied rows without touching the source or the store.
    pub fn rank_records(
        &self,
        mandate: &MandateRecord,
        records: &[CandidateRecord],
    ) -> Result<MandateScoringResult, ScoringServiceError> {
        self.evaluate(mandate, records, Utc::now())
    }

    pub fn weekly_summary(&self, window: WeekWindow) -> Result<WeeklyBiasSummary, ScoringServiceError> {
        let results = self.results.within(window)?;
        Ok(build_weekly_bias_summary(&results, window))
    }

    fn evaluate(
        &self,
        mandate: &MandateRecord,
        records: &[CandidateRecord],
        scored_at: DateTime<Utc>,
    ) -> Result<MandateScoringResult, ScoringServiceError> {
        let requirements = mandate_requirements(mandate)?;
        let mandate_id = &requirements.mandate_id;

        let mut seen = HashSet::new();
        let mut contexts = Vec::with_capacity(records.len());
        for record in records {
            let profile = extract_profile(mandate_id, record)?;
            if !profile.dropped_terms.is_empty() {
                debug!(
                    mandate = %mandate_id,
                    candidate = %profile.context.candidate_id,
                    dropped = profile.dropped_terms.len(),
                    "unmapped candidate terms dropped"
                );
            }
            if !seen.insert(profile.context.candidate_id.clone()) {
                warn!(
                    mandate = %mandate_id,
                    candidate = %profile.context.candidate_id,
                    "duplicate candidate row ignored"
                );
                continue;
            }
            contexts.push(profile.context);
        }

        let scores = self.engine.score_all(&contexts, &requirements);
        let mut ranked = rank_mandate(scores, self.config().divergence_flag_places);
        attach_reasoning(&mut ranked);

        let result = MandateScoringResult::new(mandate_id.clone(), scored_at, ranked);
        info!(
            mandate = %result.mandate_id,
            candidates = result.candidates.len(),
            high_risk = result.high_risk_count(),
            flagged = result.flagged_divergences().count(),
            "mandate scored"
        );
        Ok(result)
    }
}

fn upstream_failure(mandate_id: &MandateId, error: SourceError) -> ScoringServiceError {
    warn!(mandate = %mandate_id, error = %error, "candidate source failed");
    ScoringServiceError::Source(error)
}

/// Error raised by the mandate scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
    #[error("mandate {0} not found")]
    MandateNotFound(MandateId),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
