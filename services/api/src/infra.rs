use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use showroom::config::RelayConfig;
use showroom::credit::CreditScorer;
use showroom::error::AppError;
use showroom::finance::LoanEstimator;
use showroom::inventory::{CatalogError, CatalogGateway};
use showroom::leads::{EmailJsRelay, LeadMessage, LeadRelay, RelayError, UnconfiguredRelay};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) estimator: Arc<LoanEstimator>,
    pub(crate) scorer: CreditScorer,
}

/// Relay chosen at startup from the EmailJS settings.
pub(crate) enum ConfiguredRelay {
    EmailJs(EmailJsRelay),
    Unconfigured(UnconfiguredRelay),
}

impl ConfiguredRelay {
    pub(crate) fn from_config(config: &RelayConfig) -> Result<Self, AppError> {
        match &config.emailjs {
            Some(credentials) => {
                let relay = EmailJsRelay::new(credentials.clone(), config.timeout)?;
                Ok(Self::EmailJs(relay))
            }
            None => {
                warn!("EmailJS credentials missing, lead submissions will be rejected");
                Ok(Self::Unconfigured(UnconfiguredRelay))
            }
        }
    }
}

#[async_trait]
impl LeadRelay for ConfiguredRelay {
    async fn deliver(&self, message: &LeadMessage) -> Result<(), RelayError> {
        match self {
            ConfiguredRelay::EmailJs(relay) => relay.deliver(message).await,
            ConfiguredRelay::Unconfigured(relay) => relay.deliver(message).await,
        }
    }
}

/// Process-local catalog standing in for the storefront's product tags.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCatalog {
    products: Arc<Mutex<HashMap<String, Vec<String>>>>,
}

impl InMemoryCatalog {
    pub(crate) fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        let products: HashMap<String, Vec<String>> = serde_json::from_str(&raw)?;
        Ok(Self {
            products: Arc::new(Mutex::new(products)),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<String>>>, CatalogError> {
        self.products
            .lock()
            .map_err(|_| CatalogError::Unavailable("catalog mutex poisoned".to_string()))
    }
}

impl CatalogGateway for InMemoryCatalog {
    fn product_tags(&self, product_id: &str) -> Result<Vec<String>, CatalogError> {
        self.lock()?
            .get(product_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(product_id.to_string()))
    }

    fn update_product_tags(&self, product_id: &str, tags: &[String]) -> Result<(), CatalogError> {
        let mut guard = self.lock()?;
        match guard.get_mut(product_id) {
            Some(existing) => {
                *existing = tags.to_vec();
                Ok(())
            }
            None => Err(CatalogError::NotFound(product_id.to_string())),
        }
    }
}
