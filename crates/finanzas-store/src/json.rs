//! One JSON document per user on the local filesystem

use async_trait::async_trait;
use finanzas_core::{CoreResult, StateStore, UserFinancialState};
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};

const TMP_SUFFIX: &str = "tmp";

/// Check a user id before it becomes part of a file name
pub fn validate_user(user: &str) -> StoreResult<()> {
    let valid = !user.is_empty()
        && user
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidUser {
            user: user.to_string(),
        })
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_string_lossy().to_string();
    move |source| StoreError::Io { path, source }
}

/// Stores `<root>/<user>.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a user's document
    pub fn document_path(&self, user: &str) -> StoreResult<PathBuf> {
        validate_user(user)?;
        Ok(self.root.join(format!("{}.json", user)))
    }

    async fn read(&self, user: &str) -> StoreResult<UserFinancialState> {
        let path = self.document_path(user)?;
        let display = path.to_string_lossy().to_string();

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("No document at {}, starting empty", display);
                return Ok(UserFinancialState::default());
            }
            Err(source) => return Err(StoreError::Io { path: display, source }),
        };

        log::debug!("Read {} bytes from {}", content.len(), display);
        serde_json::from_str(&content).map_err(|source| StoreError::Serialization {
            path: display,
            source,
        })
    }

    /// Write next to the target and rename over it
    async fn write(&self, user: &str, state: &UserFinancialState) -> StoreResult<()> {
        let path = self.document_path(user)?;
        let tmp = path.with_extension(format!("json.{}", TMP_SUFFIX));
        let data = serde_json::to_string_pretty(state).map_err(|source| StoreError::Serialization {
            path: path.to_string_lossy().to_string(),
            source,
        })?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(io_error(&self.root))?;
        tokio::fs::write(&tmp, data.as_bytes())
            .await
            .map_err(io_error(&tmp))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(io_error(&path))?;

        log::debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self, user: &str) -> CoreResult<UserFinancialState> {
        Ok(self.read(user).await?)
    }

    async fn save(&self, user: &str, state: &UserFinancialState) -> CoreResult<()> {
        Ok(self.write(user, state).await?)
    }
}
