use crate::cli::ServeArgs;
use crate::infra::{corpus_store, language_model, AppState};
use crate::routes::with_advisor_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mortgage_advisor::config::AppConfig;
use mortgage_advisor::error::AppError;
use mortgage_advisor::telemetry;
use mortgage_advisor::workflows::affordability::AffordabilityEngine;
use mortgage_advisor::workflows::chat::ChatService;
use mortgage_advisor::workflows::router::AdvisorState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = corpus_store(&config.knowledge);
    let model = language_model(&config.model)?;
    let advisor = Arc::new(AdvisorState::new(
        AffordabilityEngine::standard(),
        ChatService::new(store, model),
    ));

    let app = with_advisor_routes(advisor)
        .layer(Extension(app_state))
        .layer(prometheus_layer)
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, model = %config.model.model, "mortgage advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
