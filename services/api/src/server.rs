use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryEmployeeRepository};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talentark::config::AppConfig;
use talentark::error::AppError;
use talentark::telemetry;
use tracing::{info, warn};

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

    let repository = if config.directory.demo_mode {
        Arc::new(InMemoryEmployeeRepository::seeded())
    } else {
        warn!("no record store configured; starting with an empty in-memory roster");
        Arc::new(InMemoryEmployeeRepository::default())
    };

    let app = with_service_routes(repository)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, demo_mode = config.directory.demo_mode, "talent directory service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
