//! Reports API endpoints - JSON API

use axum::extract::{Path, State};
use axum::Json;
use finanzas_core::{ConceptDeviation, HistoricalSummary, InvestmentPoint, MonthReport, Workbook};

use crate::error::ApiResult;
use crate::routes::parse_month;
use crate::AppState;

pub async fn api_month_report(
    State(state): State<AppState>,
    Path(mes): Path<String>,
) -> ApiResult<Json<MonthReport>> {
    let mes = parse_month(&mes)?;
    let finances = state.finances.read().await;
    Ok(Json(finances.month_report(&mes)?))
}

/// Report for the month in the current selection
pub async fn api_selected_report(State(state): State<AppState>) -> ApiResult<Json<MonthReport>> {
    let finances = state.finances.read().await;
    Ok(Json(finances.selected_month_report()?))
}

pub async fn api_deviations(
    State(state): State<AppState>,
    Path(mes): Path<String>,
) -> ApiResult<Json<Vec<ConceptDeviation>>> {
    let mes = parse_month(&mes)?;
    let finances = state.finances.read().await;
    Ok(Json(finances.largest_deviations(&mes)?))
}

pub async fn api_investments(State(state): State<AppState>) -> ApiResult<Json<Vec<InvestmentPoint>>> {
    let finances = state.finances.read().await;
    Ok(Json(finances.investment_series()?))
}

pub async fn api_history(State(state): State<AppState>) -> ApiResult<Json<HistoricalSummary>> {
    let finances = state.finances.read().await;
    Ok(Json(finances.historical_summary()?))
}

pub async fn api_export(State(state): State<AppState>) -> ApiResult<Json<Workbook>> {
    let finances = state.finances.read().await;
    Ok(Json(finances.export_workbook()?))
}
