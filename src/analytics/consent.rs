//! Visitor consent for analytics
//!
//! The choice is read once from a [`ConsentStore`] when the context is built
//! and written through on every change.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// What the visitor agreed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentState {
    pub analytics: bool,
}

/// Persistence for the consent choice
#[async_trait]
pub trait ConsentStore: Send + Sync {
    /// Stored choice, `None` if the visitor never chose
    async fn read(&self) -> Result<Option<ConsentState>>;

    async fn write(&self, state: ConsentState) -> Result<()>;
}

// ============================================================================
// File store
// ============================================================================

/// JSON file store with atomic replace on write
#[derive(Debug, Clone)]
pub struct FileConsentStore {
    path: PathBuf,
}

impl FileConsentStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConsentStore for FileConsentStore {
    async fn read(&self) -> Result<Option<ConsentState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::consent(format!("Failed to read consent file: {e}")))?;

        // A corrupt file counts as "never chose"
        match serde_json::from_str(&contents) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(path = %self.path.display(), "ignoring unreadable consent file: {e}");
                Ok(None)
            }
        }
    }

    async fn write(&self, state: ConsentState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::consent(format!("Failed to create consent dir: {e}")))?;
        }

        let contents = serde_json::to_string(&state)?;
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::consent(format!("Failed to write consent file: {e}")))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::consent(format!("Failed to rename consent file: {e}")))?;

        debug!(path = %self.path.display(), analytics = state.analytics, "consent saved");
        Ok(())
    }
}

// ============================================================================
// Memory store
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryConsentStore {
    state: RwLock<Option<ConsentState>>,
}

impl MemoryConsentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that starts with a recorded choice
    pub fn with_state(state: ConsentState) -> Self {
        Self {
            state: RwLock::new(Some(state)),
        }
    }
}

#[async_trait]
impl ConsentStore for MemoryConsentStore {
    async fn read(&self) -> Result<Option<ConsentState>> {
        Ok(*self.state.read().await)
    }

    async fn write(&self, state: ConsentState) -> Result<()> {
        *self.state.write().await = Some(state);
        Ok(())
    }
}

// ============================================================================
// Context
// ============================================================================

/// The visitor's current consent, shared by everything that tracks events
pub struct ConsentContext {
    store: Arc<dyn ConsentStore>,
    state: RwLock<Option<ConsentState>>,
}

impl ConsentContext {
    /// Load the persisted choice; a failing store counts as "never chose"
    pub async fn init(store: Arc<dyn ConsentStore>) -> Self {
        let state = match store.read().await {
            Ok(state) => state,
            Err(e) => {
                warn!("consent store unreadable, using default: {e}");
                None
            }
        };

        Self {
            store,
            state: RwLock::new(state),
        }
    }

    /// Recorded choice, if any
    pub async fn consent(&self) -> Option<ConsentState> {
        *self.state.read().await
    }

    pub async fn has_chosen(&self) -> bool {
        self.state.read().await.is_some()
    }

    /// Analytics are on unless the visitor opted out
    pub async fn analytics_enabled(&self) -> bool {
        self.state.read().await.map_or(true, |s| s.analytics)
    }

    pub async fn accept_all(&self) -> Result<()> {
        self.set(ConsentState { analytics: true }).await
    }

    pub async fn set_analytics(&self, analytics: bool) -> Result<()> {
        self.set(ConsentState { analytics }).await
    }

    async fn set(&self, next: ConsentState) -> Result<()> {
        let mut state = self.state.write().await;
        self.store.write(next).await?;
        *state = Some(next);
        Ok(())
    }
}

impl std::fmt::Debug for ConsentContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsentContext").finish_non_exhaustive()
    }
}
