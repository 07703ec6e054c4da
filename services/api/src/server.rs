use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryProfileRepository};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cofound::config::AppConfig;
use cofound::error::AppError;
use cofound::matching::MatchService;
use cofound::notifications::{NotificationDispatcher, TelegramClient};
use cofound::telemetry;
use cofound::widget_auth::{JwtSessionIssuer, WidgetAuthVerifier, WidgetLoginService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
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

    let repository = match args.profiles.take() {
        Some(path) => {
            let repository = InMemoryProfileRepository::load(&path)?;
            info!(profiles = repository.len(), path = %path.display(), "profile store seeded");
            repository
        }
        None => {
            warn!("no profile file given; starting with an empty profile store");
            InMemoryProfileRepository::default()
        }
    };
    let repository = Arc::new(repository);

    let match_service = Arc::new(MatchService::new(repository.clone()));
    let dispatcher = Arc::new(NotificationDispatcher::new(
        repository,
        Arc::new(TelegramClient::new(&config.telegram)?),
        config.app.clone(),
    ));
    let login_service = Arc::new(WidgetLoginService::new(
        WidgetAuthVerifier::new(&config.telegram),
        Arc::new(JwtSessionIssuer::new(&config.session)),
    ));

    let app = with_service_routes(match_service, dispatcher, login_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "cofound service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
