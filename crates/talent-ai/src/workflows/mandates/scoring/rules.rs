use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::super::domain::{SignalType, SourceOutcome, SourceSignal, TagClass};
use super::config::{sanitize, ScoringConfig, SignalTypeWeights};

/// Histories shorter than this are Laplace smoothed by default.
pub const DEFAULT_SMOOTHING_MIN_HISTORY: usize = 5;

/// Which signal asserted a tag and how much weight it was credited with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagProvenance {
    pub tag: String,
    pub class: TagClass,
    pub signal_id: String,
    pub signal_type: SignalType,
    pub weight: f64,
}

/// Fraction of required tags evidenced by the candidate's signals, scaled to
/// [0, 100].
///
/// Each required tag is credited with the strongest signal-type weight among
/// the signals asserting it, relative to the strongest weight in the table.
pub fn expertise_score(
    signals: &[SourceSignal],
    required_tags: &BTreeSet<String>,
    weights: &SignalTypeWeights,
) -> f64 {
    let max_weight = weights.max_weight();
    if required_tags.is_empty() || max_weight <= 0.0 {
        return 0.0;
    }

    let credited: f64 = matched_domain_tags(signals, required_tags, weights)
        .values()
        .map(|provenance| provenance.weight)
        .sum();

    clamp_score(100.0 * credited / (required_tags.len() as f64 * max_weight))
}

/// Density of relational signal, independent of mandate requirements.
///
/// Each distinct similarity tag is credited with the strongest signal-type
/// weight asserting it; `saturation` fully weighted tags score 100.
pub fn similarity_score(
    signals: &[SourceSignal],
    weights: &SignalTypeWeights,
    saturation: f64,
) -> f64 {
    let max_weight = weights.max_weight();
    let saturation = sanitize(saturation);
    if max_weight <= 0.0 || saturation <= 0.0 {
        return 0.0;
    }

    let credited: f64 = similarity_tags(signals, weights)
        .values()
        .map(|provenance| provenance.weight)
        .sum();

    clamp_score(100.0 * credited / (saturation * max_weight))
}

/// Share of historically correct outcomes, scaled to [0, 100].
///
/// Histories shorter than [`DEFAULT_SMOOTHING_MIN_HISTORY`] are Laplace
/// smoothed, so a source with no history scores exactly 50.
pub fn source_reliability_score(history: &[SourceOutcome]) -> f64 {
    source_reliability_score_with(history, DEFAULT_SMOOTHING_MIN_HISTORY)
}

pub fn source_reliability_score_with(history: &[SourceOutcome], smoothing_min_history: usize) -> f64 {
    let total = history.len() as f64;
    let correct = history.iter().filter(|outcome| outcome.is_correct()).count() as f64;

    let ratio = if history.len() < smoothing_min_history || history.is_empty() {
        (correct + 1.0) / (total + 2.0)
    } else {
        correct / total
    };

    clamp_score(100.0 * ratio)
}

/// Signal-type weighted mean of per-signal reliability; 50 when nothing is
/// weighted.
pub fn candidate_reliability_score(signals: &[SourceSignal], config: &ScoringConfig) -> f64 {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;

    for signal in signals {
        let weight = config.signal_type_weights.weight_for(signal.signal_type());
        weighted += weight
            * source_reliability_score_with(
                signal.source_reliability_history(),
                config.reliability_smoothing_min_history,
            );
        total_weight += weight;
    }

    if total_weight <= 0.0 {
        return 50.0;
    }

    clamp_score(weighted / total_weight)
}

/// Named-weight composite of the three sub-scores, normalized by the weight
/// total so the result stays in [0, 100] for any non-negative weights.
pub fn overall_score(expertise: f64, similarity: f64, reliability: f64, config: &ScoringConfig) -> f64 {
    let expertise_weight = sanitize(config.expertise_weight);
    let similarity_weight = sanitize(config.similarity_weight);
    let reliability_weight = sanitize(config.reliability_weight);
    let total = expertise_weight + similarity_weight + reliability_weight;
    if total <= 0.0 {
        return 0.0;
    }

    let weighted = expertise_weight * clamp_score(expertise)
        + similarity_weight * clamp_score(similarity)
        + reliability_weight * clamp_score(reliability);

    clamp_score(weighted / total)
}

/// Required tags evidenced by at least one signal, keyed by tag, with the
/// strongest crediting signal. Earlier signals win ties.
pub(crate) fn matched_domain_tags(
    signals: &[SourceSignal],
    required_tags: &BTreeSet<String>,
    weights: &SignalTypeWeights,
) -> BTreeMap<String, TagProvenance> {
    let mut matched: BTreeMap<String, TagProvenance> = BTreeMap::new();

    for signal in signals {
        let weight = weights.weight_for(signal.signal_type());
        for tag in signal.domain_tags().intersection(required_tags) {
            credit(&mut matched, tag, TagClass::Domain, signal, weight);
        }
    }

    matched
}

/// Distinct similarity tags across all signals with the strongest crediting
/// signal.
pub(crate) fn similarity_tags(
    signals: &[SourceSignal],
    weights: &SignalTypeWeights,
) -> BTreeMap<String, TagProvenance> {
    let mut tags: BTreeMap<String, TagProvenance> = BTreeMap::new();

    for signal in signals {
        let weight = weights.weight_for(signal.signal_type());
        for tag in signal.similarity_tags() {
            credit(&mut tags, tag, TagClass::Similarity, signal, weight);
        }
    }

    tags
}

fn credit(
    credited: &mut BTreeMap<String, TagProvenance>,
    tag: &str,
    class: TagClass,
    signal: &SourceSignal,
    weight: f64,
) {
    let stronger = credited
        .get(tag)
        .map(|existing| weight > existing.weight)
        .unwrap_or(true);

    if stronger {
        credited.insert(
            tag.to_string(),
            TagProvenance {
                tag: tag.to_string(),
                class,
                signal_id: signal.id().to_string(),
                signal_type: signal.signal_type(),
                weight,
            },
        );
    }
}

pub(crate) fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}
