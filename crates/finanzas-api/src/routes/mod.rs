//! Route modules for the API server
//!
//! Handlers take the shared `AppState`, lock the facade for as long as the
//! request needs it and answer with JSON. Month path segments are parsed
//! into `MonthKey` here, so a malformed month is a 400 before any lookup.

pub mod months;
pub mod records;
pub mod reports;
pub mod settings;

use crate::error::ApiResult;
use finanzas_core::MonthKey;

/// Parse a `:mes` path segment
pub(crate) fn parse_month(raw: &str) -> ApiResult<MonthKey> {
    Ok(raw.parse::<MonthKey>()?)
}
