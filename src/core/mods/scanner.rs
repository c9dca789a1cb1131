use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::model::{ModFile, ARCHIVE_DIR, QUARANTINE_DIR};
use crate::core::error::{ModSyncError, SyncResult};

/// Enumerates candidate mod files in a mods directory and owns its layout.
pub struct ModScanner {
    /// Directory being updated.
    mods_dir: PathBuf,
}

impl ModScanner {
    pub fn new(mods_dir: PathBuf) -> Self {
        Self { mods_dir }
    }

    pub fn mods_dir(&self) -> &Path {
        &self.mods_dir
    }

    /// Path to the `not_found/` quarantine directory.
    pub fn quarantine_dir(&self) -> PathBuf {
        self.mods_dir.join(QUARANTINE_DIR)
    }

    /// Path to the `old/` archive directory.
    pub fn archive_dir(&self) -> PathBuf {
        self.mods_dir.join(ARCHIVE_DIR)
    }

    /// Create `not_found/` and `old/` if they are missing.
    pub async fn ensure_layout(&self) -> SyncResult<()> {
        let quarantine = self.quarantine_dir();
        let archive = self.archive_dir();
        tokio::try_join!(create_dir_safe(&quarantine), create_dir_safe(&archive))?;
        Ok(())
    }

    /// List the mod files directly inside the mods directory.
    ///
    /// Non-recursive: only regular files ending in `.jar` or `.disabled` are
    /// returned, so the quarantine and archive directories never show up.
    /// Ensures the directory layout exists first.
    pub async fn scan(&self) -> SyncResult<Vec<ModFile>> {
        self.ensure_layout().await?;

        let mut entries = tokio::fs::read_dir(&self.mods_dir)
            .await
            .map_err(|e| ModSyncError::io(&self.mods_dir, e))?;

        let mut mods = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ModSyncError::io(&self.mods_dir, e))?
        {
            let file_type = match entry.file_type().await {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!("Cannot stat {:?}: {}", entry.path(), e);
                    continue;
                }
            };
            if !file_type.is_file() {
                continue;
            }

            let path = entry.path();
            match ModFile::from_path(&path) {
                Some(mod_file) => mods.push(mod_file),
                None => debug!("Skipping non-mod file {:?}", path),
            }
        }

        mods.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        info!("Found {} mod files in {:?}", mods.len(), self.mods_dir);
        Ok(mods)
    }
}

async fn create_dir_safe(path: &Path) -> SyncResult<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| ModSyncError::io(path, source))
}
