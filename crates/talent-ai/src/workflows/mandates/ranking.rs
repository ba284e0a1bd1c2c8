//! Composite and similarity-only orderings over a mandate's candidates, plus
//! the divergence between them.
//!
//! Both orderings are total: ties fall back to expertise, then candidate id, so
//! repeated runs over the same input produce the same ranks.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CandidateId, MandateId};
use super::scoring::{BiasRisk, CandidateScore, ScoreComponent, TagProvenance};

/// Dense 1-based position of a candidate within one ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankAssignment {
    pub candidate_id: CandidateId,
    pub rank: usize,
}

/// Ranked scoring output for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScoreSummary {
    pub candidate_id: CandidateId,
    pub name: String,
    pub expertise_score: f64,
    pub similarity_score: f64,
    pub reliability_score: f64,
    pub overall_score: f64,
    /// Position in the composite ranking.
    pub expertise_rank: usize,
    /// Position in the similarity-only ranking.
    pub similarity_rank: usize,
    pub bias_risk: BiasRisk,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ScoreComponent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provenance: Vec<TagProvenance>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_tags: Vec<String>,
}

impl CandidateScoreSummary {
    /// Places gained under the similarity-only ordering (negative when the
    /// candidate drops).
    pub fn places_gained_on_similarity(&self) -> i64 {
        self.expertise_rank as i64 - self.similarity_rank as i64
    }

    /// Relational tags credited to this candidate, in tag order.
    pub fn similarity_tags(&self) -> impl Iterator<Item = &TagProvenance> {
        self.provenance
            .iter()
            .filter(|entry| entry.class == super::domain::TagClass::Similarity)
    }
}

/// Per-candidate delta between the composite and similarity-only rankings.
///
/// `movement = similarity_rank - expertise_rank`; a negative movement means the
/// candidate climbs when only relational signal is counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingDivergence {
    pub candidate_id: CandidateId,
    pub expertise_rank: usize,
    pub similarity_rank: usize,
    pub movement: i64,
    pub flagged: bool,
}

/// Both orderings for one mandate, summaries in composite order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankedMandate {
    pub summaries: Vec<CandidateScoreSummary>,
    pub divergence: Vec<RankingDivergence>,
}

/// Output of one scoring request; what the result repository stores and the
/// weekly aggregator consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandateScoringResult {
    pub mandate_id: MandateId,
    pub scored_at: DateTime<Utc>,
    pub candidates: Vec<CandidateScoreSummary>,
    pub divergence: Vec<RankingDivergence>,
}

impl MandateScoringResult {
    pub fn new(mandate_id: MandateId, scored_at: DateTime<Utc>, ranked: RankedMandate) -> Self {
        Self {
            mandate_id,
            scored_at,
            candidates: ranked.summaries,
            divergence: ranked.divergence,
        }
    }

    pub fn high_risk_count(&self) -> usize {
        self.candidates
            .iter()
            .filter(|summary| summary.bias_risk == BiasRisk::High)
            .count()
    }

    pub fn flagged_divergences(&self) -> impl Iterator<Item = &RankingDivergence> {
        self.divergence.iter().filter(|entry| entry.flagged)
    }
}

pub fn rank_candidates_by_composite(candidates: &[CandidateScore]) -> Vec<CandidateScore> {
    sorted(candidates, composite_order)
}

pub fn rank_candidates_by_similarity_only(candidates: &[CandidateScore]) -> Vec<CandidateScore> {
    sorted(candidates, similarity_order)
}

pub fn assign_ranks(ordered: &[CandidateScore]) -> Vec<RankAssignment> {
    ordered
        .iter()
        .enumerate()
        .map(|(index, candidate)| RankAssignment {
            candidate_id: candidate.candidate_id.clone(),
            rank: index + 1,
        })
        .collect()
}

/// Divergence for every candidate present in both rankings, in composite order.
/// A candidate listed twice in `similarity_ranking` keeps its first rank.
pub fn compute_divergence(
    expertise_ranking: &[RankAssignment],
    similarity_ranking: &[RankAssignment],
    flag_places: usize,
) -> Vec<RankingDivergence> {
    let mut similarity_ranks: HashMap<&CandidateId, usize> = HashMap::new();
    for entry in similarity_ranking {
        similarity_ranks.entry(&entry.candidate_id).or_insert(entry.rank);
    }

    expertise_ranking
        .iter()
        .filter_map(|entry| {
            let similarity_rank = *similarity_ranks.get(&entry.candidate_id)?;
            let movement = similarity_rank as i64 - entry.rank as i64;
            Some(RankingDivergence {
                candidate_id: entry.candidate_id.clone(),
                expertise_rank: entry.rank,
                similarity_rank,
                movement,
                flagged: flag_places > 0 && -movement >= flag_places as i64,
            })
        })
        .collect()
}

/// Rank a mandate's scored candidates both ways. Reasoning text is left empty
/// for the explanation builder to fill. Repeated candidate ids keep their
/// first occurrence only.
pub fn rank_mandate(candidates: Vec<CandidateScore>, flag_places: usize) -> RankedMandate {
    let mut seen = HashSet::new();
    let candidates: Vec<CandidateScore> = candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.candidate_id.clone()))
        .collect();
    let composite = rank_candidates_by_composite(&candidates);
    let similarity = rank_candidates_by_similarity_only(&candidates);
    let composite_ranks = assign_ranks(&composite);
    let similarity_ranks = assign_ranks(&similarity);
    let divergence = compute_divergence(&composite_ranks, &similarity_ranks, flag_places);

    let summaries = composite
        .into_iter()
        .zip(divergence.iter())
        .map(|(score, delta)| CandidateScoreSummary {
            candidate_id: score.candidate_id,
            name: score.name,
            expertise_score: score.expertise_score,
            similarity_score: score.similarity_score,
            reliability_score: score.reliability_score,
            overall_score: score.overall_score,
            expertise_rank: delta.expertise_rank,
            similarity_rank: delta.similarity_rank,
            bias_risk: score.bias_risk,
            reasoning: String::new(),
            components: score.components,
            provenance: score.provenance,
            missing_tags: score.missing_tags,
        })
        .collect();

    RankedMandate {
        summaries,
        divergence,
    }
}

fn sorted(
    candidates: &[CandidateScore],
    order: fn(&CandidateScore, &CandidateScore) -> Ordering,
) -> Vec<CandidateScore> {
    let mut ordered = candidates.to_vec();
    ordered.sort_by(order);
    ordered
}

fn composite_order(a: &CandidateScore, b: &CandidateScore) -> Ordering {
    b.overall_score
        .total_cmp(&a.overall_score)
        .then_with(|| b.expertise_score.total_cmp(&a.expertise_score))
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
}

fn similarity_order(a: &CandidateScore, b: &CandidateScore) -> Ordering {
    b.similarity_score
        .total_cmp(&a.similarity_score)
        .then_with(|| b.expertise_score.total_cmp(&a.expertise_score))
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
}
