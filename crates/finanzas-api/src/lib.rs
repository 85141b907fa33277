//! JSON API over the monthly budget reports
//!
//! Routes are organized into modules:
//! - routes::months: available months and the shared month selection
//! - routes::records: estimate and actual records for one month
//! - routes::reports: month report, investment series, history, export
//! - routes::settings: configuration display

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Json, Router,
};
use finanzas_config::Config;
use finanzas_core::Finances;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub finances: Arc<RwLock<Finances>>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::months::{api_months, api_selection, api_set_selection};
    use routes::records::{api_actual, api_estimate, api_save_actual, api_save_estimate};
    use routes::reports::{
        api_deviations, api_export, api_history, api_investments, api_month_report,
        api_selected_report,
    };
    use routes::settings::api_settings;

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/months", get(api_months))
        .route("/api/selection", get(api_selection).post(api_set_selection))
        .route("/api/estimados/:mes", get(api_estimate).put(api_save_estimate))
        .route("/api/reales/:mes", get(api_actual).put(api_save_actual))
        .route("/api/reports/month", get(api_selected_report))
        .route("/api/reports/month/:mes", get(api_month_report))
        .route("/api/reports/month/:mes/deviations", get(api_deviations))
        .route("/api/reports/investments", get(api_investments))
        .route("/api/reports/history", get(api_history))
        .route("/api/export", get(api_export))
        .route("/api/settings", get(api_settings))
        .route("/api/reload", post(api_reload))
        .fallback(not_found)
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound {
        resource: uri.path().to_string(),
    }
}

/// Reload the user's document from the store
async fn api_reload(state: axum::extract::State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let mut finances = state.finances.write().await;
    finances.reload().await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "months": finances.months()?.len(),
    })))
}

/// Start the server
pub async fn start_server(config: Config, finances: Arc<RwLock<Finances>>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { finances, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting finanzas server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - /api/months, /api/selection");
    log::info!("  - /api/estimados/:mes, /api/reales/:mes");
    log::info!("  - /api/reports/*, /api/export");

    axum::serve(listener, router).await?;
    log::info!("Server stopped gracefully");
    Ok(())
}
