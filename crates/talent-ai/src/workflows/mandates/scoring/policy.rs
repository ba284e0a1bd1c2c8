use serde::{Deserialize, Serialize};

use super::config::BiasRiskThresholds;

/// Categorical flag for rankings driven by relational rather than expertise signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasRisk {
    Low,
    Moderate,
    High,
}

impl BiasRisk {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

/// Classify bias risk from the similarity-over-expertise gap.
///
/// High requires both a gap above `high_gap_threshold` and a similarity score
/// above `high_similarity_floor`; any other gap above `moderate_gap_threshold`
/// is moderate.
pub fn bias_risk(expertise_score: f64, similarity_score: f64, thresholds: &BiasRiskThresholds) -> BiasRisk {
    let gap = similarity_score - expertise_score;
    if !gap.is_finite() {
        return BiasRisk::Low;
    }

    if gap > thresholds.high_gap_threshold && similarity_score > thresholds.high_similarity_floor {
        BiasRisk::High
    } else if gap > thresholds.moderate_gap_threshold {
        BiasRisk::Moderate
    } else {
        BiasRisk::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_gap_and_floor() {
        let thresholds = BiasRiskThresholds::default();

        assert_eq!(bias_risk(40.0, 85.0, &thresholds), BiasRisk::High);
        assert_eq!(bias_risk(60.0, 60.0, &thresholds), BiasRisk::Low);
        assert_eq!(bias_risk(90.0, 20.0, &thresholds), BiasRisk::Low);
        assert_eq!(bias_risk(30.0, 45.0, &thresholds), BiasRisk::Moderate);
        // Wide gap but similarity itself is weak.
        assert_eq!(bias_risk(5.0, 45.0, &thresholds), BiasRisk::Moderate);
        // Exactly on the threshold is not above it.
        assert_eq!(bias_risk(35.0, 60.0, &thresholds), BiasRisk::Moderate);
        assert_eq!(bias_risk(50.0, 60.0, &thresholds), BiasRisk::Low);
    }

    #[test]
    fn is_a_pure_function_of_its_inputs() {
        let thresholds = BiasRiskThresholds::default();
        let first = bias_risk(12.5, 71.0, &thresholds);
        let second = bias_risk(12.5, 71.0, &thresholds);
        assert_eq!(first, second);
        assert_eq!(bias_risk(f64::NAN, 71.0, &thresholds), BiasRisk::Low);
    }
}
