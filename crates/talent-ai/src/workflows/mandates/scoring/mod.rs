mod config;
mod policy;
mod rules;

pub use config::{BiasRiskThresholds, ScoringConfig, ScoringConfigError, SignalTypeWeights};
pub use policy::{bias_risk, BiasRisk};
pub use rules::{
    candidate_reliability_score, expertise_score, overall_score, similarity_score,
    source_reliability_score, source_reliability_score_with, TagProvenance,
    DEFAULT_SMOOTHING_MIN_HISTORY,
};

use super::domain::{CandidateContext, CandidateId, MandateRequirements};
use serde::{Deserialize, Serialize};

/// Stateless scorer that applies a `ScoringConfig` to candidate evidence.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, context: &CandidateContext, requirements: &MandateRequirements) -> CandidateScore {
        let config = &self.config;
        let weights = &config.signal_type_weights;
        let signals = &context.signals;

        let expertise = expertise_score(signals, &requirements.required_tags, weights);
        let similarity = similarity_score(signals, weights, config.similarity_saturation);
        let reliability = candidate_reliability_score(signals, config);
        let overall = overall_score(expertise, similarity, reliability, config);
        let risk = bias_risk(expertise, similarity, &config.bias_risk);

        let matched = rules::matched_domain_tags(signals, &requirements.required_tags, weights);
        let relational = rules::similarity_tags(signals, weights);

        let missing_tags: Vec<String> = requirements
            .required_tags
            .iter()
            .filter(|tag| !matched.contains_key(*tag))
            .cloned()
            .collect();

        let total_weight = config.composite_weight_total();
        let share = |weight: f64| {
            if total_weight > 0.0 {
                config::sanitize(weight) / total_weight
            } else {
                0.0
            }
        };

        let components = vec![
            ScoreComponent {
                factor: ScoreFactor::Expertise,
                score: expertise,
                weight: config.expertise_weight,
                contribution: expertise * share(config.expertise_weight),
                notes: format!(
                    "{} of {} required tag(s) evidenced",
                    matched.len(),
                    requirements.required_tags.len()
                ),
            },
            ScoreComponent {
                factor: ScoreFactor::Similarity,
                score: similarity,
                weight: config.similarity_weight,
                contribution: similarity * share(config.similarity_weight),
                notes: if relational.is_empty() {
                    "no relational signal".to_string()
                } else {
                    format!(
                        "relational tags: {}",
                        relational.keys().cloned().collect::<Vec<_>>().join(", ")
                    )
                },
            },
            ScoreComponent {
                factor: ScoreFactor::Reliability,
                score: reliability,
                weight: config.reliability_weight,
                contribution: reliability * share(config.reliability_weight),
                notes: format!(
                    "{} source outcome(s) across {} signal(s)",
                    signals
                        .iter()
                        .map(|signal| signal.source_reliability_history().len())
                        .sum::<usize>(),
                    signals.len()
                ),
            },
        ];

        let provenance = matched.into_values().chain(relational.into_values()).collect();

        CandidateScore {
            candidate_id: context.candidate_id.clone(),
            name: context.display_name().to_string(),
            expertise_score: expertise,
            similarity_score: similarity,
            reliability_score: reliability,
            overall_score: overall,
            bias_risk: risk,
            components,
            provenance,
            missing_tags,
        }
    }

    pub fn score_all(
        &self,
        contexts: &[CandidateContext],
        requirements: &MandateRequirements,
    ) -> Vec<CandidateScore> {
        contexts
            .iter()
            .map(|context| self.score(context, requirements))
            .collect()
    }
}

/// Sub-score that contributed to the composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Expertise,
    Similarity,
    Reliability,
}

/// Discrete contribution to the composite, kept for audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub score: f64,
    pub weight: f64,
    pub contribution: f64,
    pub notes: String,
}

/// Unranked scoring output for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub candidate_id: CandidateId,
    pub name: String,
    pub expertise_score: f64,
    pub similarity_score: f64,
    pub reliability_score: f64,
    pub overall_score: f64,
    pub bias_risk: BiasRisk,
    pub components: Vec<ScoreComponent>,
    pub provenance: Vec<TagProvenance>,
    pub missing_tags: Vec<String>,
}

impl CandidateScore {
    /// Bare scores with no audit trail, mostly useful for ranking fixtures.
    pub fn from_scores(
        candidate_id: impl Into<String>,
        expertise_score: f64,
        similarity_score: f64,
        reliability_score: f64,
        config: &ScoringConfig,
    ) -> Self {
        let candidate_id = candidate_id.into();
        Self {
            name: candidate_id.clone(),
            candidate_id: CandidateId(candidate_id),
            expertise_score,
            similarity_score,
            reliability_score,
            overall_score: overall_score(expertise_score, similarity_score, reliability_score, config),
            bias_risk: bias_risk(expertise_score, similarity_score, &config.bias_risk),
            components: Vec::new(),
            provenance: Vec::new(),
            missing_tags: Vec::new(),
        }
    }
}
