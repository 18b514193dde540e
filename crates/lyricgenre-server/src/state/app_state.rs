use crate::config::ServerConfig;
use lyricgenre_classifiers::LoadedModel;
use lyricgenre_core::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state
///
/// Only exists once the model artifact has loaded, so every route that can
/// see an `AppState` can serve predictions. The model is never replaced or
/// mutated for the lifetime of the process.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Loaded model, shared read-only by all requests
    pub model: LoadedModel,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        model: LoadedModel,
        metrics_handle: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            model,
            metrics_handle,
        }
    }

    /// Load the model artifact described by `config` and build the state
    ///
    /// Fails with the loader's error when the artifact is unreachable or
    /// invalid; no state (and so no prediction endpoint) exists in that case.
    pub async fn initialize(
        config: ServerConfig,
        metrics_handle: Option<PrometheusHandle>,
    ) -> Result<Self> {
        let model_config = config.model.to_model_config()?;

        let model = LoadedModel::load(&model_config).await.map_err(|e| {
            error!("Failed to load model artifact: {}", e);
            e
        })?;

        info!(
            "Serving genres: {}",
            model
                .metadata()
                .labels
                .iter()
                .map(|l| l.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self::new(config, model, metrics_handle))
    }

    /// Base directory of genre images
    pub fn image_dir(&self) -> &str {
        &self.config.static_dir
    }
}
