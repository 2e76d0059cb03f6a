use crate::config::{BookkeepingConfig, StoreBackend};
use crate::handlers;
use crate::models::{Collection, INVOICE_UNIQUE_FIELDS};
use crate::services::{InMemoryStore, Ledger, MongoDb, PeriodView, RecordStore, SummaryService};
use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::tracing::request_id_middleware;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub ledger: Ledger,
    pub summaries: SummaryService,
    pub view: Arc<PeriodView>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let ledger = Ledger::new(store.clone());
        let summaries = SummaryService::new(ledger.clone());
        let view = Arc::new(PeriodView::new(summaries.clone()));

        Self {
            store,
            ledger,
            summaries,
            view,
        }
    }
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

/// Opens the record store selected by configuration.
pub async fn connect_store(config: &BookkeepingConfig) -> Result<Arc<dyn RecordStore>, AppError> {
    match config.store {
        StoreBackend::MongoDb => {
            let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to connect to MongoDB: {}", e);
                    e
                })?;
            db.initialize_indexes().await.map_err(|e| {
                tracing::error!("Failed to initialize database indexes: {}", e);
                e
            })?;
            Ok(Arc::new(db))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory record store, data is lost on shutdown");
            Ok(Arc::new(
                InMemoryStore::new().with_unique_key(Collection::Invoices, &INVOICE_UNIQUE_FIELDS),
            ))
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route(
            "/suppliers",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/suppliers/:id",
            put(handlers::update_supplier).delete(handlers::delete_supplier),
        )
        .route(
            "/invoices",
            get(handlers::list_invoices)
                .post(handlers::create_invoice)
                .delete(handlers::delete_month),
        )
        .route(
            "/invoices/:id",
            put(handlers::update_invoice).delete(handlers::delete_invoice),
        )
        .route(
            "/daily-sales",
            get(handlers::list_daily_sales).post(handlers::create_daily_sale),
        )
        .route(
            "/daily-sales/:id",
            put(handlers::update_daily_sale).delete(handlers::delete_daily_sale),
        )
        .route("/summaries/monthly/:month", get(handlers::month_summary))
        .route(
            "/summaries/monthly/:month/override",
            put(handlers::save_month_override).delete(handlers::clear_month_override),
        )
        .route("/summaries/quarterly/:start", get(handlers::quarter_summary))
        .route(
            "/summaries/quarterly/:start/override",
            put(handlers::save_quarter_override).delete(handlers::clear_quarter_override),
        )
        .route("/exports/monthly/:month", get(handlers::export_month))
        .route("/exports/quarterly/:start", get(handlers::export_quarter))
        .route(
            "/view",
            get(handlers::current_view).put(handlers::select_period),
        )
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

impl Application {
    pub async fn build(config: BookkeepingConfig) -> Result<Self, AppError> {
        let store = connect_store(&config).await?;
        Self::build_with_store(config, store).await
    }

    /// Serves the API over an already opened store.
    pub async fn build_with_store(
        config: BookkeepingConfig,
        store: Arc<dyn RecordStore>,
    ) -> Result<Self, AppError> {
        let app = router(AppState::new(store));

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
