use serde::{Deserialize, Serialize};

use super::super::domain::SignalType;

/// Tunable weights and thresholds for candidate scoring.
///
/// Similarity is deliberately weighted below expertise so relationship-driven
/// evidence cannot dominate the composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub expertise_weight: f64,
    pub similarity_weight: f64,
    pub reliability_weight: f64,
    pub signal_type_weights: SignalTypeWeights,
    pub bias_risk: BiasRiskThresholds,
    /// Number of fully weighted distinct similarity tags that saturates the
    /// similarity score at 100.
    pub similarity_saturation: f64,
    /// Histories shorter than this are Laplace smoothed.
    pub reliability_smoothing_min_history: usize,
    /// Places a candidate must climb under the similarity-only ranking before
    /// the divergence is flagged.
    pub divergence_flag_places: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            expertise_weight: 0.60,
            similarity_weight: 0.15,
            reliability_weight: 0.25,
            signal_type_weights: SignalTypeWeights::default(),
            bias_risk: BiasRiskThresholds::default(),
            similarity_saturation: 4.0,
            reliability_smoothing_min_history: 5,
            divergence_flag_places: 2,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        let named = [
            ("expertise_weight", self.expertise_weight),
            ("similarity_weight", self.similarity_weight),
            ("reliability_weight", self.reliability_weight),
            ("signal_type_weights.cv", self.signal_type_weights.cv),
            ("signal_type_weights.notes", self.signal_type_weights.notes),
            ("signal_type_weights.voice", self.signal_type_weights.voice),
            ("signal_type_weights.market", self.signal_type_weights.market),
        ];
        for (field, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringConfigError::InvalidWeight { field, value });
            }
        }

        if self.composite_weight_total() <= 0.0 {
            return Err(ScoringConfigError::ZeroCompositeWeight);
        }

        if !self.similarity_saturation.is_finite() || self.similarity_saturation <= 0.0 {
            return Err(ScoringConfigError::InvalidWeight {
                field: "similarity_saturation",
                value: self.similarity_saturation,
            });
        }

        let thresholds = [
            ("bias_risk.high_gap_threshold", self.bias_risk.high_gap_threshold),
            ("bias_risk.high_similarity_floor", self.bias_risk.high_similarity_floor),
            ("bias_risk.moderate_gap_threshold", self.bias_risk.moderate_gap_threshold),
        ];
        for (field, value) in thresholds {
            if !value.is_finite() {
                return Err(ScoringConfigError::InvalidThreshold { field, value });
            }
        }

        Ok(())
    }

    /// Sum of the composite weights, counting negative or non-finite ones as zero.
    pub fn composite_weight_total(&self) -> f64 {
        sanitize(self.expertise_weight)
            + sanitize(self.similarity_weight)
            + sanitize(self.reliability_weight)
    }
}

/// Evidence weight per signal type; CV evidence counts most, market chatter least.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalTypeWeights {
    pub cv: f64,
    pub notes: f64,
    pub voice: f64,
    pub market: f64,
}

impl Default for SignalTypeWeights {
    fn default() -> Self {
        Self {
            cv: 1.0,
            notes: 0.8,
            voice: 0.6,
            market: 0.4,
        }
    }
}

impl SignalTypeWeights {
    /// Weight for a signal type; negative or non-finite values count as zero.
    pub fn weight_for(&self, signal_type: SignalType) -> f64 {
        let raw = match signal_type {
            SignalType::Cv => self.cv,
            SignalType::Notes => self.notes,
            SignalType::Voice => self.voice,
            SignalType::Market => self.market,
        };
        sanitize(raw)
    }

    pub fn max_weight(&self) -> f64 {
        SignalType::ordered()
            .into_iter()
            .map(|signal_type| self.weight_for(signal_type))
            .fold(0.0, f64::max)
    }
}

/// Score gaps that separate low, moderate, and high bias risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiasRiskThresholds {
    pub high_gap_threshold: f64,
    pub high_similarity_floor: f64,
    pub moderate_gap_threshold: f64,
}

impl Default for BiasRiskThresholds {
    fn default() -> Self {
        Self {
            high_gap_threshold: 25.0,
            high_similarity_floor: 50.0,
            moderate_gap_threshold: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("{field} must be a finite, non-negative number (found {value})")]
    InvalidWeight { field: &'static str, value: f64 },
    #[error("{field} must be a finite number (found {value})")]
    InvalidThreshold { field: &'static str, value: f64 },
    #[error("expertise, similarity, and reliability weights cannot all be zero")]
    ZeroCompositeWeight,
}

pub(crate) fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
