use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use talent_ai::workflows::mandates::{
    CandidateRecord, CandidateSource, MandateId, MandateRecord, MandateScoringResult,
    RepositoryError, ScoringResultRepository, SourceError, WeekWindow,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

type MandateRows = (MandateRecord, Vec<CandidateRecord>);

#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidateSource {
    mandates: Arc<Mutex<HashMap<MandateId, MandateRows>>>,
}

impl InMemoryCandidateSource {
    /// Register (or replace) a mandate and its candidate rows.
    pub(crate) fn register(
        &self,
        mandate: MandateRecord,
        candidates: Vec<CandidateRecord>,
    ) -> Result<MandateId, SourceError> {
        let id = MandateId(mandate.mandate_id.clone().unwrap_or_default());
        let mut guard = self
            .mandates
            .lock()
            .map_err(|_| SourceError::Unavailable("candidate store poisoned".to_string()))?;
        guard.insert(id.clone(), (mandate, candidates));
        Ok(id)
    }

    fn with_rows<T>(
        &self,
        id: &MandateId,
        read: impl FnOnce(Option<&MandateRows>) -> T,
    ) -> Result<T, SourceError> {
        let guard = self
            .mandates
            .lock()
            .map_err(|_| SourceError::Unavailable("candidate store poisoned".to_string()))?;
        Ok(read(guard.get(id)))
    }
}

impl CandidateSource for InMemoryCandidateSource {
    fn mandate(&self, id: &MandateId) -> Result<Option<MandateRecord>, SourceError> {
        self.with_rows(id, |rows| rows.map(|(mandate, _)| mandate.clone()))
    }

    fn candidates_for(&self, id: &MandateId) -> Result<Vec<CandidateRecord>, SourceError> {
        self.with_rows(id, |rows| {
            rows.map(|(_, candidates)| candidates.clone())
                .unwrap_or_default()
        })
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryResultRepository {
    results: Arc<Mutex<Vec<MandateScoringResult>>>,
}

impl ScoringResultRepository for InMemoryResultRepository {
    fn record(&self, result: MandateScoringResult) -> Result<(), RepositoryError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|_| RepositoryError::Unavailable("result store poisoned".to_string()))?;
        guard.push(result);
        Ok(())
    }

    fn within(&self, window: WeekWindow) -> Result<Vec<MandateScoringResult>, RepositoryError> {
        let guard = self
            .results
            .lock()
            .map_err(|_| RepositoryError::Unavailable("result store poisoned".to_string()))?;
        Ok(guard
            .iter()
            .filter(|result| window.contains_instant(result.scored_at))
            .cloned()
            .collect())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
