//! Record routes - estimate and actual records for one month
//!
//! Saving replaces the month's record as a whole and persists the user's
//! document before answering.

pub mod api;

pub use api::{api_actual, api_estimate, api_save_actual, api_save_estimate};
