use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::super::domain::{MandateId, SignalType, TagClass};
use super::super::ranking::{CandidateScoreSummary, MandateScoringResult};
use super::super::scoring::BiasRisk;
use super::views::{MandateBiasBreakdown, SourceTypeBreakdown, WeeklyBiasSummary};

/// Half-open date range `[start, end)` matched against `scored_at` dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    /// Seven days beginning at `start`.
    pub fn starting(start: NaiveDate) -> Self {
        let end = start.checked_add_days(Days::new(7)).unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// The Monday-based ISO week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let offset = u64::from(date.weekday().num_days_from_monday());
        let monday = date.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN);
        Self::starting(monday)
    }

    /// The ISO week containing today's UTC date, matching `scored_at` stamps.
    pub fn current() -> Self {
        Self::containing(Utc::now().date_naive())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn contains_instant(&self, at: DateTime<Utc>) -> bool {
        self.contains(at.date_naive())
    }
}

#[derive(Default)]
struct MandateTally {
    runs: usize,
    candidates: usize,
    high_risk: usize,
    moderate_risk: usize,
    flagged: usize,
    movement_total: u64,
    movement_count: usize,
    drivers: BTreeMap<String, usize>,
}

#[derive(Default, Clone, Copy)]
struct SourceTally {
    domain: usize,
    similarity: usize,
    high_risk_similarity: usize,
}

/// Aggregate every result scored inside `window`; results outside it are
/// ignored.
pub fn build_weekly_bias_summary(
    results: &[MandateScoringResult],
    window: WeekWindow,
) -> WeeklyBiasSummary {
    let mut mandates: BTreeMap<MandateId, MandateTally> = BTreeMap::new();
    let mut sources: BTreeMap<SignalType, SourceTally> = BTreeMap::new();
    let mut drivers: BTreeMap<String, usize> = BTreeMap::new();
    let mut movement_total: u64 = 0;
    let mut movement_count: usize = 0;

    for result in results
        .iter()
        .filter(|result| window.contains_instant(result.scored_at))
    {
        let tally = mandates.entry(result.mandate_id.clone()).or_default();
        tally.runs += 1;
        tally.candidates += result.candidates.len();

        for summary in &result.candidates {
            match summary.bias_risk {
                BiasRisk::High => {
                    tally.high_risk += 1;
                    for tag in distinct_similarity_tags(summary) {
                        *tally.drivers.entry(tag.to_string()).or_default() += 1;
                        *drivers.entry(tag.to_string()).or_default() += 1;
                    }
                }
                BiasRisk::Moderate => tally.moderate_risk += 1,
                BiasRisk::Low => {}
            }

            for entry in &summary.provenance {
                let source = sources.entry(entry.signal_type).or_default();
                match entry.class {
                    TagClass::Domain => source.domain += 1,
                    TagClass::Similarity => {
                        source.similarity += 1;
                        if summary.bias_risk == BiasRisk::High {
                            source.high_risk_similarity += 1;
                        }
                    }
                }
            }
        }

        for entry in &result.divergence {
            let magnitude = entry.movement.unsigned_abs();
            tally.movement_total += magnitude;
            tally.movement_count += 1;
            movement_total += magnitude;
            movement_count += 1;
            if entry.flagged {
                tally.flagged += 1;
            }
        }
    }

    let breakdown: Vec<MandateBiasBreakdown> = mandates
        .into_iter()
        .map(|(mandate_id, tally)| MandateBiasBreakdown {
            mandate_id,
            runs: tally.runs,
            candidates: tally.candidates,
            high_risk: tally.high_risk,
            moderate_risk: tally.moderate_risk,
            flagged_divergences: tally.flagged,
            average_divergence: mean(tally.movement_total, tally.movement_count),
            top_similarity_driver: top_driver(&tally.drivers),
        })
        .collect();

    let source_types = SignalType::ordered()
        .into_iter()
        .map(|signal_type| {
            let tally = sources.get(&signal_type).copied().unwrap_or_default();
            SourceTypeBreakdown {
                signal_type,
                signal_label: signal_type.label().to_string(),
                domain_credits: tally.domain,
                similarity_credits: tally.similarity,
                high_risk_similarity_credits: tally.high_risk_similarity,
            }
        })
        .collect();

    WeeklyBiasSummary {
        window_start: window.start,
        window_end: window.end,
        mandates_scored: breakdown.len(),
        candidates_scored: breakdown.iter().map(|entry| entry.candidates).sum(),
        high_risk_decisions: breakdown.iter().map(|entry| entry.high_risk).sum(),
        moderate_risk_decisions: breakdown.iter().map(|entry| entry.moderate_risk).sum(),
        affected_mandates: breakdown.iter().filter(|entry| entry.high_risk > 0).count(),
        top_similarity_driver: top_driver(&drivers),
        average_divergence: mean(movement_total, movement_count),
        mandates: breakdown,
        source_types,
    }
}

fn distinct_similarity_tags(summary: &CandidateScoreSummary) -> BTreeSet<&str> {
    summary
        .similarity_tags()
        .map(|entry| entry.tag.as_str())
        .collect()
}

/// Most frequent tag; the lexically smallest wins ties.
fn top_driver(counts: &BTreeMap<String, usize>) -> Option<String> {
    let mut best: Option<(&String, usize)> = None;
    for (tag, &count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((tag, count));
        }
    }
    best.map(|(tag, _)| tag.clone())
}

fn mean(total: u64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::mandates::ranking::rank_mandate;
    use crate::workflows::mandates::scoring::{CandidateScore, ScoringConfig, TagProvenance};
    use chrono::TimeZone;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn similarity(tag: &str, signal_type: SignalType) -> TagProvenance {
        TagProvenance {
            tag: tag.to_string(),
            class: TagClass::Similarity,
            signal_id: format!("sig-{tag}"),
            signal_type,
            weight: 1.0,
        }
    }

    fn result(mandate: &str, day: u32, tags_for_b: &[&str]) -> MandateScoringResult {
        let config = ScoringConfig::default();
        let mut b = CandidateScore::from_scores("B", 40.0, 85.0, 70.0, &config);
        b.provenance = tags_for_b
            .iter()
            .map(|tag| similarity(tag, SignalType::Notes))
            .collect();
        let ranked = rank_mandate(
            vec![
                CandidateScore::from_scores("A", 90.0, 20.0, 70.0, &config),
                b,
                CandidateScore::from_scores("C", 60.0, 60.0, 70.0, &config),
            ],
            config.divergence_flag_places,
        );
        MandateScoringResult::new(
            MandateId(mandate.to_string()),
            Utc.with_ymd_and_hms(2026, 3, day, 9, 30, 0).single().expect("timestamp"),
            ranked,
        )
    }

    #[test]
    fn windows_align_to_iso_weeks() {
        // 2026-03-05 is a Thursday.
        let window = WeekWindow::containing(date(2026, 3, 5));
        assert_eq!(window.start, date(2026, 3, 2));
        assert_eq!(window.end, date(2026, 3, 9));
        assert!(window.contains(date(2026, 3, 8)));
        assert!(!window.contains(date(2026, 3, 9)));
        assert_eq!(WeekWindow::containing(date(2026, 3, 2)), window);
    }

    #[test]
    fn current_window_holds_fresh_results() {
        let window = WeekWindow::current();
        assert!(window.contains_instant(Utc::now()));
        assert_eq!(window.start.weekday(), chrono::Weekday::Mon);
    }

    #[test]
    fn empty_window_is_zeroed() {
        let window = WeekWindow::starting(date(2026, 3, 2));
        let summary = build_weekly_bias_summary(&[], window);

        assert!(summary.is_empty());
        assert_eq!(summary.candidates_scored, 0);
        assert_eq!(summary.high_risk_decisions, 0);
        assert_eq!(summary.affected_mandates, 0);
        assert_eq!(summary.top_similarity_driver, None);
        assert_eq!(summary.average_divergence, 0.0);
        assert_eq!(summary.high_risk_rate(), 0.0);
        assert!(summary.mandates.is_empty());
        assert_eq!(summary.source_types.len(), 4);
        assert!(summary
            .source_types
            .iter()
            .all(|entry| entry.domain_credits == 0 && entry.similarity_credits == 0));
    }

    #[test]
    fn aggregates_results_inside_the_window_only() {
        let window = WeekWindow::starting(date(2026, 3, 2));
        let results = vec![
            result("M-1", 2, &["shared-firm", "personal-referral"]),
            result("M-2", 6, &["shared-school", "shared-firm"]),
            result("M-3", 9, &["shared-school"]),
        ];

        let summary = build_weekly_bias_summary(&results, window);

        assert_eq!(summary.mandates_scored, 2);
        assert_eq!(summary.candidates_scored, 6);
        assert_eq!(summary.high_risk_decisions, 2);
        assert_eq!(summary.affected_mandates, 2);
        assert_eq!(summary.top_similarity_driver.as_deref(), Some("shared-firm"));
        // Movements per mandate are -2, 0, +2.
        assert!((summary.average_divergence - 4.0 / 3.0).abs() < 1e-9);

        let first = &summary.mandates[0];
        assert_eq!(first.mandate_id, MandateId("M-1".to_string()));
        assert_eq!(first.flagged_divergences, 1);
        assert_eq!(first.top_similarity_driver.as_deref(), Some("personal-referral"));

        let notes = summary
            .source_types
            .iter()
            .find(|entry| entry.signal_type == SignalType::Notes)
            .expect("notes breakdown");
        assert_eq!(notes.similarity_credits, 4);
        assert_eq!(notes.high_risk_similarity_credits, 4);
        assert_eq!(
            summary
                .source_types
                .iter()
                .map(|entry| entry.signal_label.as_str())
                .collect::<Vec<_>>(),
            vec!["cv", "notes", "voice", "market"]
        );
    }

    #[test]
    fn driver_ties_break_lexically() {
        let window = WeekWindow::starting(date(2026, 3, 2));
        let results = vec![result("M-1", 3, &["shared-school", "shared-board"])];
        let summary = build_weekly_bias_summary(&results, window);
        assert_eq!(summary.top_similarity_driver.as_deref(), Some("shared-board"));
    }
}
