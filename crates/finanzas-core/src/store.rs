//! Persistence seam for the user's financial document

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CoreResult;
use crate::models::UserFinancialState;

/// Store reference type
pub type StoreRef = Arc<dyn StateStore>;

/// Loads and saves one user's whole document
///
/// There are no partial updates: `save` replaces the stored document and the
/// last writer wins.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load a user's document, or an empty one if none was saved yet
    async fn load(&self, user: &str) -> CoreResult<UserFinancialState>;

    /// Replace a user's document
    async fn save(&self, user: &str, state: &UserFinancialState) -> CoreResult<()>;
}
