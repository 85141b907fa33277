//! Month list and the month selection shared by the report views

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use finanzas_core::{month_label, MonthKey, MonthSelection};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MonthEntry {
    pub mes: MonthKey,
    pub label: String,
    pub estimado: bool,
    pub real: bool,
}

/// Every month with data, most recent first
pub async fn api_months(State(state): State<AppState>) -> ApiResult<Json<Vec<MonthEntry>>> {
    let finances = state.finances.read().await;
    let data = finances.state()?;

    let mut months: Vec<MonthEntry> = finances
        .months()?
        .into_iter()
        .map(|mes| MonthEntry {
            label: month_label(mes.as_str()),
            estimado: data.estimate(&mes).is_some(),
            real: data.actual(&mes).is_some(),
            mes,
        })
        .collect();
    months.reverse();

    Ok(Json(months))
}

#[derive(Debug, Serialize)]
pub struct SelectionView {
    #[serde(flatten)]
    pub selection: MonthSelection,
    pub description: String,
    pub months: Vec<MonthKey>,
}

pub async fn api_selection(State(state): State<AppState>) -> ApiResult<Json<SelectionView>> {
    let finances = state.finances.read().await;
    let selection = finances.selection();
    Ok(Json(SelectionView {
        description: selection.description(),
        months: finances.selected_months()?,
        selection,
    }))
}

/// Partial update: absent fields keep their value, `null` clears a bound
#[derive(Debug, Default, Deserialize)]
pub struct SelectionUpdate {
    #[serde(default)]
    pub selected: Option<MonthKey>,
    #[serde(default, deserialize_with = "present")]
    pub from: Option<Option<MonthKey>>,
    #[serde(default, deserialize_with = "present")]
    pub to: Option<Option<MonthKey>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<MonthKey>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<MonthKey>::deserialize(deserializer).map(Some)
}

pub async fn api_set_selection(
    State(state): State<AppState>,
    body: Result<Json<SelectionUpdate>, JsonRejection>,
) -> ApiResult<Json<SelectionView>> {
    let Json(update) = body?;
    {
        let finances = state.finances.read().await;
        let current = finances.selection();
        if let Some(selected) = update.selected {
            finances.select_month(selected);
        }
        if update.from.is_some() || update.to.is_some() {
            finances.set_range(
                update.from.unwrap_or(current.from),
                update.to.unwrap_or(current.to),
            );
        }
        log::debug!("Selection is now {:?}", finances.selection());
    }
    api_selection(State(state)).await
}
