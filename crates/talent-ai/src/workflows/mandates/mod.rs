//! Bias-aware candidate scoring and ranking for search mandates.
//!
//! Raw CRM rows become canonical signals, signals become expertise, similarity,
//! and reliability scores, and every mandate is ranked twice: once on the
//! composite and once on similarity alone. The gap between the two orderings is
//! what the bias reporting surfaces.

pub mod domain;
pub mod ranking;
pub mod reasoning;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod signals;

#[cfg(test)]
mod tests;

pub use domain::{
    CandidateContext, CandidateId, CandidateRecord, EvidenceRecord, InvalidInputError, MandateId,
    MandateRecord, MandateRequirements, RelationshipFields, SignalType, SourceOutcome,
    SourceSignal, TagClass,
};
pub use ranking::{
    assign_ranks, compute_divergence, rank_candidates_by_composite,
    rank_candidates_by_similarity_only, rank_mandate, CandidateScoreSummary,
    MandateScoringResult, RankAssignment, RankedMandate, RankingDivergence,
};
pub use reasoning::{
    attach_reasoning, build_weekly_bias_summary, summarise_candidate_scores,
    MandateBiasBreakdown, SourceTypeBreakdown, WeekWindow, WeeklyBiasSummary,
};
pub use repository::{CandidateSource, RepositoryError, ScoringResultRepository, SourceError};
pub use router::{mandate_router, RankingRequest};
pub use scoring::{
    bias_risk, candidate_reliability_score, expertise_score, overall_score, similarity_score,
    source_reliability_score, BiasRisk, CandidateScore, ScoreComponent, ScoreFactor,
    ScoringConfig, ScoringConfigError, ScoringEngine,
};
pub use service::{MandateScoringService, ScoringServiceError};
pub use signals::{build_source_profile, mandate_requirements};
