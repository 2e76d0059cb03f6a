use bookkeeping_service::config::BookkeepingConfig;
use bookkeeping_service::services::init_metrics;
use bookkeeping_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Metrics recorder must exist before anything records
    init_metrics();

    let config = BookkeepingConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "bookkeeping-service",
        &config.observability.log_level,
        config.observability.otlp_endpoint.as_deref(),
    );

    tracing::info!(
        store = ?config.store,
        port = config.common.port,
        "Starting bookkeeping-service"
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
