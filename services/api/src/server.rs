use crate::cli::ServeArgs;
use crate::demo::seed_demo_mandates;
use crate::infra::{AppState, InMemoryCandidateSource, InMemoryResultRepository};
use crate::routes::with_mandate_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talent_ai::config::AppConfig;
use talent_ai::error::AppError;
use talent_ai::telemetry;
use talent_ai::workflows::mandates::MandateScoringService;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let source = Arc::new(InMemoryCandidateSource::default());
    if args.seed_demo {
        let seeded = seed_demo_mandates(&source)?;
        info!(mandates = seeded.len(), "demo mandates loaded");
    }
    let results = Arc::new(InMemoryResultRepository::default());
    let scoring_service = Arc::new(MandateScoringService::new(
        source,
        results,
        config.scoring.clone(),
    ));

    let app = with_mandate_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "candidate ranking service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
