use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::domain::{MandateId, SignalType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandateBiasBreakdown {
    pub mandate_id: MandateId,
    pub runs: usize,
    pub candidates: usize,
    pub high_risk: usize,
    pub moderate_risk: usize,
    pub flagged_divergences: usize,
    pub average_divergence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_similarity_driver: Option<String>,
}

/// How much credited evidence each signal type contributed across the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTypeBreakdown {
    pub signal_type: SignalType,
    pub signal_label: String,
    pub domain_credits: usize,
    pub similarity_credits: usize,
    /// Similarity credits attached to high-risk candidates.
    pub high_risk_similarity_credits: usize,
}

/// Aggregate bias picture across every mandate scored in a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBiasSummary {
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub mandates_scored: usize,
    pub candidates_scored: usize,
    pub high_risk_decisions: usize,
    pub moderate_risk_decisions: usize,
    pub affected_mandates: usize,
    pub top_similarity_driver: Option<String>,
    pub average_divergence: f64,
    #[serde(default)]
    pub mandates: Vec<MandateBiasBreakdown>,
    #[serde(default)]
    pub source_types: Vec<SourceTypeBreakdown>,
}

impl WeeklyBiasSummary {
    pub fn is_empty(&self) -> bool {
        self.mandates_scored == 0
    }

    /// Share of scored decisions that were high risk, in [0, 1].
    pub fn high_risk_rate(&self) -> f64 {
        if self.candidates_scored == 0 {
            0.0
        } else {
            self.high_risk_decisions as f64 / self.candidates_scored as f64
        }
    }
}
