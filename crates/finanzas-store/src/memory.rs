//! In-process store, for tests and throwaway sessions

use async_trait::async_trait;
use finanzas_core::{CoreResult, StateStore, UserFinancialState};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::json::validate_user;

/// Keeps every user's document in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, UserFinancialState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one user's document
    pub fn with_document(user: &str, state: UserFinancialState) -> Self {
        let mut documents = HashMap::new();
        documents.insert(user.to_string(), state);
        Self {
            documents: RwLock::new(documents),
        }
    }

    pub async fn users(&self) -> Vec<String> {
        let mut users: Vec<String> = self.documents.read().await.keys().cloned().collect();
        users.sort();
        users
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self, user: &str) -> CoreResult<UserFinancialState> {
        validate_user(user)?;
        let documents = self.documents.read().await;
        Ok(documents.get(user).cloned().unwrap_or_default())
    }

    async fn save(&self, user: &str, state: &UserFinancialState) -> CoreResult<()> {
        validate_user(user)?;
        self.documents
            .write()
            .await
            .insert(user.to_string(), state.clone());
        log::debug!("Stored document for {} in memory", user);
        Ok(())
    }
}
