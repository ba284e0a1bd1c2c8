//! End-to-end ranking of an imported longlist through the public service facade
//! and HTTP router.

mod common {
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, TimeZone, Utc};

    use talent_ai::workflows::intake::CandidateCsvImporter;
    use talent_ai::workflows::mandates::{
        CandidateRecord, CandidateSource, MandateId, MandateRecord, MandateScoringResult,
        MandateScoringService, RepositoryError, ScoringConfig, ScoringResultRepository,
        SourceError, WeekWindow,
    };

    pub(super) const MANDATE: &str = "M-IC-7";

    pub(super) fn mandate() -> MandateRecord {
        MandateRecord {
            mandate_id: Some(MANDATE.to_string()),
            title: Some("Head of Infrastructure Credit".to_string()),
            required_terms: vec![
                "Infra Debt".to_string(),
                "Renewables".to_string(),
                "Direct Lending".to_string(),
                "Sustainability".to_string(),
            ],
        }
    }

    pub(super) fn longlist() -> Vec<CandidateRecord> {
        let data = include_bytes!("../fixtures/infrastructure_credit_longlist.csv");
        CandidateCsvImporter::from_reader(&data[..]).expect("longlist imports")
    }

    pub(super) fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 10, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    pub(super) struct LonglistSource;

    impl CandidateSource for LonglistSource {
        fn mandate(&self, id: &MandateId) -> Result<Option<MandateRecord>, SourceError> {
            Ok((id.0 == MANDATE).then(mandate))
        }

        fn candidates_for(&self, _id: &MandateId) -> Result<Vec<CandidateRecord>, SourceError> {
            Ok(longlist())
        }
    }

    #[derive(Default)]
    pub(super) struct InMemoryResults {
        results: Mutex<Vec<MandateScoringResult>>,
    }

    impl ScoringResultRepository for InMemoryResults {
        fn record(&self, result: MandateScoringResult) -> Result<(), RepositoryError> {
            self.results
                .lock()
                .expect("results mutex poisoned")
                .push(result);
            Ok(())
        }

        fn within(&self, window: WeekWindow) -> Result<Vec<MandateScoringResult>, RepositoryError> {
            Ok(self
                .results
                .lock()
                .expect("results mutex poisoned")
                .iter()
                .filter(|result| window.contains_instant(result.scored_at))
                .cloned()
                .collect())
        }
    }

    pub(super) fn service() -> Arc<MandateScoringService<LonglistSource, InMemoryResults>> {
        Arc::new(MandateScoringService::new(
            Arc::new(LonglistSource),
            Arc::new(InMemoryResults::default()),
            ScoringConfig::default(),
        ))
    }
}

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use serde_json::Value;
use talent_ai::workflows::mandates::{mandate_router, BiasRisk, MandateId, WeekWindow};
use tower::ServiceExt;

use common::*;

#[test]
fn longlist_ranks_expertise_first_and_flags_relationship_climber() {
    let service = service();
    let result = service
        .score_mandate_at(&MandateId(MANDATE.to_string()), at(3))
        .expect("mandate scores");

    let composite: Vec<_> = result
        .candidates
        .iter()
        .map(|summary| summary.candidate_id.0.as_str())
        .collect();
    assert_eq!(composite, vec!["cand-001", "cand-003", "cand-002", "cand-004"]);

    let blake = result
        .candidates
        .iter()
        .find(|summary| summary.candidate_id.0 == "cand-002")
        .expect("blake ranked");
    assert_eq!(blake.similarity_rank, 1);
    assert_eq!(blake.bias_risk, BiasRisk::High);
    assert!((blake.similarity_score - 75.0).abs() < 1e-9);

    let avery = &result.candidates[0];
    assert!((avery.expertise_score - 100.0).abs() < 1e-9);
    assert_eq!(avery.similarity_rank, 3);
    assert!(avery.missing_tags.is_empty());

    let movements: i64 = result.divergence.iter().map(|entry| entry.movement).sum();
    assert_eq!(movements, 0);
    let flagged: Vec<_> = result
        .flagged_divergences()
        .map(|entry| entry.candidate_id.0.as_str())
        .collect();
    assert_eq!(flagged, vec!["cand-002"]);
}

#[test]
fn weekly_summary_counts_only_the_requested_week() {
    let service = service();
    let mandate = MandateId(MANDATE.to_string());
    service.score_mandate_at(&mandate, at(3)).expect("week one");
    service.score_mandate_at(&mandate, at(4)).expect("week one rerun");
    service.score_mandate_at(&mandate, at(10)).expect("week two");

    let window = WeekWindow::starting(NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date"));
    let summary = service.weekly_summary(window).expect("summary");

    assert_eq!(summary.mandates_scored, 1);
    assert_eq!(summary.mandates[0].runs, 2);
    assert_eq!(summary.candidates_scored, 8);
    assert_eq!(summary.high_risk_decisions, 2);
    assert_eq!(summary.affected_mandates, 1);
    assert_eq!(summary.top_similarity_driver.as_deref(), Some("personal-referral"));
    assert!((summary.average_divergence - 1.0).abs() < 1e-9);

    let empty = service
        .weekly_summary(WeekWindow::starting(
            NaiveDate::from_ymd_opt(2026, 4, 6).expect("valid date"),
        ))
        .expect("empty summary");
    assert_eq!(empty.candidates_scored, 0);
    assert_eq!(empty.top_similarity_driver, None);
}

#[tokio::test]
async fn router_serves_rankings_and_weekly_reports() {
    let router = mandate_router(service());

    let response = router
        .clone()
        .oneshot(
            Request::post(format!("/api/v1/mandates/{MANDATE}/rankings"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .unwrap();
    let payload: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload["candidates"][0]["name"], "Avery Stone");

    let response = router
        .oneshot(
            Request::post("/api/v1/mandates/M-UNKNOWN/rankings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
