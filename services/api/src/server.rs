use crate::cli::ServeArgs;
use crate::infra::{seed_demo_history, AppState, InMemoryJournalRepository};
use crate::routes::with_trait_flow_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};
use trait_flow::config::AppConfig;
use trait_flow::error::AppError;
use trait_flow::telemetry;
use trait_flow::workflows::checkin::DailyCheckinService;
use trait_flow::workflows::messaging::MessageSelector;
use trait_flow::workflows::onboarding::OnboardingService;
use trait_flow::workflows::personality::TipiInventory;

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

    let repository = Arc::new(InMemoryJournalRepository::default());
    if args.seed_demo_data {
        if let Err(err) = seed_demo_history(&repository) {
            warn!(error = %err, "unable to seed demo history");
        }
    }

    let onboarding_service = Arc::new(
        OnboardingService::new(
            repository.clone(),
            Arc::new(TipiInventory::standard()),
            config.onboarding.page_size,
        )?
        .with_session_limits(config.onboarding.session_limits()),
    );
    let selector = Arc::new(MessageSelector::canned(
        config.messaging.latency,
        config.messaging.policy(),
    ));
    let checkin_service = Arc::new(DailyCheckinService::new(repository, selector));

    let app = with_trait_flow_routes(onboarding_service, checkin_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        timeout_ms = config.messaging.timeout.as_millis() as u64,
        max_retries = config.messaging.max_retries,
        "trait flow service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
