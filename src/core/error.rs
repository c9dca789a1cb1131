use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the whole updater.
/// Every fallible operation returns `Result<T, ModSyncError>`.
#[derive(Debug, Error)]
pub enum ModSyncError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed: HTTP {status}")]
    RequestFailed { url: String, status: u16 },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Configuration ───────────────────────────────────
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Mods directory not found: {0:?}")]
    DirectoryNotFound(PathBuf),

    #[error("Settings file {path:?} could not be loaded: {reason}")]
    Settings { path: PathBuf, reason: String },

    // ── Prompts ─────────────────────────────────────────
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Convenience alias used throughout the crate.
pub type SyncResult<T> = Result<T, ModSyncError>;

impl ModSyncError {
    /// Errors that stop a run before any file is touched.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ModSyncError::InvalidConfig(_)
                | ModSyncError::DirectoryNotFound(_)
                | ModSyncError::Settings { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ModSyncError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<std::io::Error> for ModSyncError {
    fn from(source: std::io::Error) -> Self {
        ModSyncError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
