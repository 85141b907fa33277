//! Settings API endpoint

use crate::AppState;

pub async fn api_settings(state: axum::extract::State<AppState>) -> String {
    let config = &state.config;
    serde_json::to_string(config).unwrap_or_default()
}
