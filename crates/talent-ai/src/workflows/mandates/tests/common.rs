use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::mandates::domain::{
    CandidateRecord, EvidenceRecord, MandateId, MandateRecord, RelationshipFields, SourceOutcome,
};
use crate::workflows::mandates::ranking::MandateScoringResult;
use crate::workflows::mandates::reasoning::WeekWindow;
use crate::workflows::mandates::repository::{
    CandidateSource, RepositoryError, ScoringResultRepository, SourceError,
};
use crate::workflows::mandates::{mandate_router, MandateScoringService, ScoringConfig};

pub(super) const MANDATE: &str = "M-200";

pub(super) fn mandate_id() -> MandateId {
    MandateId(MANDATE.to_string())
}

pub(super) fn mandate_record() -> MandateRecord {
    MandateRecord {
        mandate_id: Some(MANDATE.to_string()),
        title: Some("Head of Infrastructure Credit".to_string()),
        required_terms: vec![
            "Infrastructure Credit".to_string(),
            "Renewables".to_string(),
            "Private Credit".to_string(),
            "ESG".to_string(),
        ],
    }
}

/// Covers every requirement on the CV with a clean track record.
pub(super) fn avery() -> CandidateRecord {
    CandidateRecord {
        candidate_id: Some("cand-avery".to_string()),
        name: Some("Avery Stone".to_string()),
        current_title: Some("Portfolio Manager".to_string()),
        skills: vec![
            "Infrastructure Credit".to_string(),
            "Renewables".to_string(),
            "Private Credit".to_string(),
            "ESG".to_string(),
        ],
        cv_outcomes: vec![SourceOutcome::Correct; 5],
        ..CandidateRecord::default()
    }
}

/// Thin on expertise, heavy on relationships.
pub(super) fn blake() -> CandidateRecord {
    CandidateRecord {
        candidate_id: Some("cand-blake".to_string()),
        name: Some("Blake Harrow".to_string()),
        skills: vec!["Renewables".to_string()],
        relationships: RelationshipFields {
            shared_employers: vec!["Harbor Capital".to_string()],
            shared_schools: vec!["LSE".to_string()],
            referred_by: Some("Managing partner".to_string()),
            network: vec!["Golf".to_string()],
        },
        notes: vec![EvidenceRecord {
            id: Some("note-blake-1".to_string()),
            text: "Family friend of the client; former colleague at Harbor.".to_string(),
            outcomes: Vec::new(),
        }],
        ..CandidateRecord::default()
    }
}

pub(super) fn casey() -> CandidateRecord {
    CandidateRecord {
        candidate_id: Some("cand-casey".to_string()),
        name: Some("Casey Lund".to_string()),
        skills: vec!["Infrastructure Credit".to_string(), "Renewables".to_string()],
        cv_outcomes: vec![
            SourceOutcome::Correct,
            SourceOutcome::Correct,
            SourceOutcome::Incorrect,
        ],
        relationships: RelationshipFields {
            shared_schools: vec!["LSE".to_string()],
            ..RelationshipFields::default()
        },
        ..CandidateRecord::default()
    }
}

pub(super) fn candidate_records() -> Vec<CandidateRecord> {
    vec![blake(), casey(), avery()]
}

pub(super) fn scored_at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, 14, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn build_service() -> (
    MandateScoringService<MemorySource, MemoryResults>,
    Arc<MemoryResults>,
) {
    let source = Arc::new(MemorySource::default().with_mandate(mandate_record(), candidate_records()));
    let results = Arc::new(MemoryResults::default());
    let service = MandateScoringService::new(source, results.clone(), ScoringConfig::default());
    (service, results)
}

pub(super) fn router_with_service(
    service: MandateScoringService<MemorySource, MemoryResults>,
) -> axum::Router {
    mandate_router(Arc::new(service))
}

#[derive(Default)]
pub(super) struct MemorySource {
    mandates: HashMap<MandateId, (MandateRecord, Vec<CandidateRecord>)>,
}

impl MemorySource {
    pub(super) fn with_mandate(mut self, mandate: MandateRecord, candidates: Vec<CandidateRecord>) -> Self {
        let id = MandateId(mandate.mandate_id.clone().unwrap_or_default());
        self.mandates.insert(id, (mandate, candidates));
        self
    }
}

impl CandidateSource for MemorySource {
    fn mandate(&self, id: &MandateId) -> Result<Option<MandateRecord>, SourceError> {
        Ok(self.mandates.get(id).map(|(mandate, _)| mandate.clone()))
    }

    fn candidates_for(&self, id: &MandateId) -> Result<Vec<CandidateRecord>, SourceError> {
        Ok(self
            .mandates
            .get(id)
            .map(|(_, candidates)| candidates.clone())
            .unwrap_or_default())
    }
}

pub(super) struct UnavailableSource;

impl CandidateSource for UnavailableSource {
    fn mandate(&self, _id: &MandateId) -> Result<Option<MandateRecord>, SourceError> {
        Err(SourceError::Unavailable("crm offline".to_string()))
    }

    fn candidates_for(&self, _id: &MandateId) -> Result<Vec<CandidateRecord>, SourceError> {
        Err(SourceError::Unavailable("crm offline".to_string()))
    }
}

/// Serves the mandate but times out fetching its candidates.
pub(super) struct SlowCandidateSource;

impl CandidateSource for SlowCandidateSource {
    fn mandate(&self, _id: &MandateId) -> Result<Option<MandateRecord>, SourceError> {
        Ok(Some(mandate_record()))
    }

    fn candidates_for(&self, _id: &MandateId) -> Result<Vec<CandidateRecord>, SourceError> {
        Err(SourceError::Timeout(1500))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryResults {
    results: Arc<Mutex<Vec<MandateScoringResult>>>,
}

impl MemoryResults {
    pub(super) fn stored(&self) -> Vec<MandateScoringResult> {
        self.results.lock().expect("results mutex poisoned").clone()
    }
}

impl ScoringResultRepository for MemoryResults {
    fn record(&self, result: MandateScoringResult) -> Result<(), RepositoryError> {
        self.results
            .lock()
            .expect("results mutex poisoned")
            .push(result);
        Ok(())
    }

    fn within(&self, window: WeekWindow) -> Result<Vec<MandateScoringResult>, RepositoryError> {
        let guard = self.results.lock().expect("results mutex poisoned");
        Ok(guard
            .iter()
            .filter(|result| window.contains_instant(result.scored_at))
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableResults;

impl ScoringResultRepository for UnavailableResults {
    fn record(&self, _result: MandateScoringResult) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn within(&self, _window: WeekWindow) -> Result<Vec<MandateScoringResult>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
