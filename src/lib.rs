pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use services::instantly::InstantlyClient;
use services::segments::LeadClassifier;

/// Shared application state passed to all Axum handlers.
///
/// Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<config::AppConfig>,
    pub instantly: InstantlyClient,
    pub classifier: Arc<LeadClassifier>,
}

impl AppState {
    pub fn new(config: config::AppConfig) -> Result<Self, errors::AppError> {
        let instantly =
            InstantlyClient::new(&config.instantly_base_url, &config.instantly_api_key);
        let classifier = LeadClassifier::new(&config.clinic_keywords)?;
        Ok(Self {
            config: Arc::new(config),
            instantly,
            classifier: Arc::new(classifier),
        })
    }
}
