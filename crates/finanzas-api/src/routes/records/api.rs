//! Records API endpoints - JSON API

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use finanzas_core::{ActualRecord, EstimateRecord};

use crate::routes::parse_month;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Stored estimate for a month
pub async fn api_estimate(
    State(state): State<AppState>,
    Path(mes): Path<String>,
) -> ApiResult<Json<EstimateRecord>> {
    let mes = parse_month(&mes)?;
    let finances = state.finances.read().await;
    finances
        .estimate(&mes)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound {
            resource: format!("estimados/{}", mes),
        })
}

pub async fn api_save_estimate(
    State(state): State<AppState>,
    Path(mes): Path<String>,
    body: Result<Json<EstimateRecord>, JsonRejection>,
) -> ApiResult<Json<EstimateRecord>> {
    let mes = parse_month(&mes)?;
    let Json(record) = body?;
    let mut finances = state.finances.write().await;
    finances.save_estimate(&mes, record.clone()).await?;
    Ok(Json(record))
}

/// Actual record to edit for a month
///
/// A month without an actual record answers with a fresh one seeded from
/// the month's estimate concepts. Nothing is stored until it is saved.
pub async fn api_actual(
    State(state): State<AppState>,
    Path(mes): Path<String>,
) -> ApiResult<Json<ActualRecord>> {
    let mes = parse_month(&mes)?;
    let finances = state.finances.read().await;
    Ok(Json(finances.actual_for_edit(&mes)?))
}

pub async fn api_save_actual(
    State(state): State<AppState>,
    Path(mes): Path<String>,
    body: Result<Json<ActualRecord>, JsonRejection>,
) -> ApiResult<Json<ActualRecord>> {
    let mes = parse_month(&mes)?;
    let Json(record) = body?;
    let mut finances = state.finances.write().await;
    finances.save_actual(&mes, record.clone()).await?;
    Ok(Json(record))
}
