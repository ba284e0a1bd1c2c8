use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::domain::{CandidateRecord, MandateId, MandateRecord};
use super::reasoning::WeekWindow;
use super::repository::{CandidateSource, ScoringResultRepository};
use super::service::{MandateScoringService, ScoringServiceError};

/// Router builder exposing mandate ranking and bias reporting endpoints.
pub fn mandate_router<S, R>(service: Arc<MandateScoringService<S, R>>) -> Router
where
    S: CandidateSource + 'static,
    R: ScoringResultRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/mandates/:mandate_id/rankings",
            post(score_mandate_handler::<S, R>),
        )
        .route("/api/v1/rankings", post(rank_records_handler::<S, R>))
        .route("/api/v1/bias/weekly", get(weekly_summary_handler::<S, R>))
        .with_state(service)
}

/// Stateless ranking request: a mandate plus the rows to rank against it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingRequest {
    pub mandate: MandateRecord,
    #[serde(default)]
    pub candidates: Vec<CandidateRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WeeklyQuery {
    start: Option<NaiveDate>,
}

pub(crate) async fn score_mandate_handler<S, R>(
    State(service): State<Arc<MandateScoringService<S, R>>>,
    Path(mandate_id): Path<String>,
) -> Response
where
    S: CandidateSource + 'static,
    R: ScoringResultRepository + 'static,
{
    match service.score_mandate(&MandateId(mandate_id)) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rank_records_handler<S, R>(
    State(service): State<Arc<MandateScoringService<S, R>>>,
    axum::Json(request): axum::Json<RankingRequest>,
) -> Response
where
    S: CandidateSource + 'static,
    R: ScoringResultRepository + 'static,
{
    match service.rank_records(&request.mandate, &request.candidates) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn weekly_summary_handler<S, R>(
    State(service): State<Arc<MandateScoringService<S, R>>>,
    Query(query): Query<WeeklyQuery>,
) -> Response
where
    S: CandidateSource + 'static,
    R: ScoringResultRepository + 'static,
{
    let window = match query.start {
        Some(start) => WeekWindow::starting(start),
        None => WeekWindow::current(),
    };

    match service.weekly_summary(window) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ScoringServiceError) -> Response {
    let status = match &error {
        ScoringServiceError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScoringServiceError::MandateNotFound(_) => StatusCode::NOT_FOUND,
        ScoringServiceError::Source(_) => StatusCode::SERVICE_UNAVAILABLE,
        ScoringServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
