use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::intake::CandidateImportError;
use crate::workflows::mandates::ScoringServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Import(CandidateImportError),
    Scoring(ScoringServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Scoring(err) => write!(f, "scoring error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Scoring(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Import(_) => StatusCode::BAD_REQUEST,
            AppError::Scoring(ScoringServiceError::InvalidInput(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Scoring(ScoringServiceError::MandateNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Scoring(ScoringServiceError::Source(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Scoring(ScoringServiceError::Repository(_))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<CandidateImportError> for AppError {
    fn from(value: CandidateImportError) -> Self {
        Self::Import(value)
    }
}

impl From<ScoringServiceError> for AppError {
    fn from(value: ScoringServiceError) -> Self {
        Self::Scoring(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::mandates::{MandateId, SourceError};

    #[test]
    fn scoring_errors_keep_their_status_codes() {
        let not_found = AppError::from(ScoringServiceError::MandateNotFound(MandateId(
            "M-1".to_string(),
        )));
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let upstream = AppError::from(ScoringServiceError::Source(SourceError::Timeout(10)));
        assert_eq!(upstream.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);

        let config = AppError::from(ConfigError::InvalidPort);
        assert_eq!(config.to_string(), "configuration error: APP_PORT must be a valid u16");
        assert_eq!(config.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
