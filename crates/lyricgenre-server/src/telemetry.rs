//! Prometheus metrics and tracing setup

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const PREDICTIONS_TOTAL: &str = "lyricgenre_predictions_total";
pub const PREDICTION_LATENCY_US: &str = "lyricgenre_prediction_latency_us";
pub const MISSING_ASSETS_TOTAL: &str = "lyricgenre_missing_assets_total";

/// Install the global Prometheus recorder and return handle for rendering
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(PREDICTIONS_TOTAL, "Total number of predictions by genre label");
    metrics::describe_histogram!(
        PREDICTION_LATENCY_US,
        metrics::Unit::Microseconds,
        "Prediction latency in microseconds"
    );
    metrics::describe_counter!(
        MISSING_ASSETS_TOTAL,
        "Predictions whose genre image was missing"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}

/// Initialize tracing/logging
///
/// `RUST_LOG` takes precedence unless `verbose` is set.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("lyricgenre_server=debug,lyricgenre_classifiers=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("lyricgenre_server=info,lyricgenre_classifiers=info,tower_http=warn")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
