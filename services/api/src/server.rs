use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredRelay, InMemoryCatalog};
use crate::routes::with_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use showroom::config::AppConfig;
use showroom::credit::CreditScorer;
use showroom::error::AppError;
use showroom::finance::LoanEstimator;
use showroom::inventory::ReservationService;
use showroom::leads::{InMemoryRateLimitStore, LeadRelay, LeadService, RateLimitStore};
use showroom::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        estimator: Arc::new(LoanEstimator::new(config.finance.clone())),
        scorer: CreditScorer::new(),
    };

    let store = Arc::new(InMemoryRateLimitStore::default());
    let relay = Arc::new(ConfiguredRelay::from_config(&config.relay)?);
    let lead_service = Arc::new(LeadService::new(
        store,
        relay,
        config.rate_limit.clone(),
        config.relay.lead_settings(),
    ));
    spawn_counter_purge(lead_service.clone());

    let office_service = match config.office.clone() {
        Some(credentials) => {
            let catalog = match args.catalog.take() {
                Some(path) => InMemoryCatalog::from_json_file(&path)?,
                None => InMemoryCatalog::default(),
            };
            Some(Arc::new(ReservationService::new(Arc::new(catalog), credentials)))
        }
        None => {
            warn!("office credentials not configured, reservation routes disabled");
            None
        }
    };

    let app = with_routes(lead_service, office_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "showroom lead service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn spawn_counter_purge<S, R>(service: Arc<LeadService<S, R>>)
where
    S: RateLimitStore + 'static,
    R: LeadRelay + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            match service.purge_expired(Utc::now()) {
                Ok(0) => {}
                Ok(purged) => debug!(purged, "expired rate-limit counters removed"),
                Err(err) => warn!(error = %err, "rate-limit purge failed"),
            }
        }
    });
}
