//! Report routes - month report, investment series, history and export
//!
//! Cross-month reports cover the months inside the current selection.

pub mod api;

pub use api::{
    api_deviations, api_export, api_history, api_investments, api_month_report,
    api_selected_report,
};
