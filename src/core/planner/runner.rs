use std::ffi::OsStr;
use std::path::Path;

use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use super::outcome::{ModOutcome, ModReport, QuarantineReason, RunOutcome};
use crate::core::error::{ModSyncError, SyncResult};
use crate::core::identity::extract_slug;
use crate::core::mods::{ModFile, ModScanner};
use crate::core::progress::{ProgressEvent, ProgressSink};
use crate::core::registry::{DownloadedFile, ModRegistry};
use crate::core::settings::RunConfig;

/// Drives every mod in a directory through search → version → download →
/// replace, one file at a time.
///
/// Per file the original stays untouched until the new bytes are in memory.
/// Only then is it moved into `old/` and the replacement created, so a
/// failure at any earlier step leaves a clean quarantine instead of a missing
/// or duplicated mod.
pub struct ReplacementPlanner<'a> {
    registry: &'a dyn ModRegistry,
    sink: &'a dyn ProgressSink,
}

impl<'a> ReplacementPlanner<'a> {
    pub fn new(registry: &'a dyn ModRegistry, sink: &'a dyn ProgressSink) -> Self {
        Self { registry, sink }
    }

    /// Update every mod in `config.mods_dir`.
    ///
    /// Only an empty game version, a missing directory or a failing scan
    /// abort the run; per-mod failures end up in the returned tally.
    pub async fn run(&self, config: &RunConfig) -> SyncResult<RunOutcome> {
        let game_version = match validate(config).await {
            Ok(v) => v,
            Err(e) => {
                self.sink.emit(&ProgressEvent::ConfigurationError {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        self.sink.emit(&ProgressEvent::RunStarted {
            mods_dir: config.mods_dir.clone(),
            game_version: game_version.to_string(),
            loader: config.loader.clone(),
        });

        let scanner = ModScanner::new(config.mods_dir.clone());
        let mods = match scanner.scan().await {
            Ok(mods) => mods,
            Err(e) => {
                self.sink.emit(&ProgressEvent::ConfigurationError {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        if mods.is_empty() {
            self.sink.emit(&ProgressEvent::NoModsFound {
                mods_dir: config.mods_dir.clone(),
            });
        }

        let mut outcome = RunOutcome::default();
        for mod_file in &mods {
            let report = self
                .process(mod_file, game_version, &config.loader, &scanner)
                .await;
            outcome.record(report);
        }

        info!(
            "Run finished: {} updated, {} quarantined",
            outcome.updated, outcome.quarantined
        );
        self.sink.emit(&ProgressEvent::Summary {
            updated: outcome.updated,
            quarantined: outcome.quarantined,
        });

        Ok(outcome)
    }

    async fn process(
        &self,
        mod_file: &ModFile,
        game_version: &str,
        loader: &str,
        scanner: &ModScanner,
    ) -> ModReport {
        self.sink.emit(&ProgressEvent::Processing {
            file_name: mod_file.file_name.clone(),
        });

        match self.resolve(mod_file, game_version, loader).await {
            Ok(download) => self.replace(mod_file, download, scanner).await,
            Err(reason) => {
                self.quarantine(&mod_file.path, mod_file, scanner, reason)
                    .await
            }
        }
    }

    /// Registry half of an iteration. Nothing on disk changes here.
    async fn resolve(
        &self,
        mod_file: &ModFile,
        game_version: &str,
        loader: &str,
    ) -> Result<DownloadedFile, QuarantineReason> {
        let slug = extract_slug(&mod_file.file_name);
        self.sink.emit(&ProgressEvent::Searching {
            file_name: mod_file.file_name.clone(),
            slug: slug.clone(),
        });

        let project_id = match self.registry.search_project(&slug).await {
            Ok(Some(id)) => {
                self.sink.emit(&ProgressEvent::ProjectFound {
                    slug: slug.clone(),
                    project_id: id.clone(),
                });
                id
            }
            Ok(None) => {
                self.sink
                    .emit(&ProgressEvent::ProjectNotFound { slug: slug.clone() });
                return Err(QuarantineReason::ProjectNotFound { slug });
            }
            Err(e) => {
                let error = e.to_string();
                self.sink.emit(&ProgressEvent::SearchFailed {
                    slug: slug.clone(),
                    error: error.clone(),
                });
                return Err(QuarantineReason::SearchFailed { slug, error });
            }
        };

        self.sink.emit(&ProgressEvent::VersionSearch {
            project_id: project_id.clone(),
            game_version: game_version.to_string(),
            loader: loader.to_string(),
        });

        let version = match self
            .registry
            .latest_version(&project_id, game_version, loader)
            .await
        {
            Ok(Some(version)) => {
                self.sink.emit(&ProgressEvent::VersionFound {
                    project_id: project_id.clone(),
                    version_number: version.version_number.clone(),
                });
                version
            }
            Ok(None) => {
                self.sink.emit(&ProgressEvent::NoCompatibleVersion {
                    project_id: project_id.clone(),
                    game_version: game_version.to_string(),
                    loader: loader.to_string(),
                });
                return Err(QuarantineReason::NoCompatibleVersion { project_id });
            }
            Err(e) => {
                let error = e.to_string();
                self.sink.emit(&ProgressEvent::VersionLookupFailed {
                    project_id: project_id.clone(),
                    error: error.clone(),
                });
                return Err(QuarantineReason::VersionLookupFailed { project_id, error });
            }
        };

        let Some(file) = version.primary_file() else {
            self.sink.emit(&ProgressEvent::VersionHasNoFiles {
                project_id: project_id.clone(),
                version_number: version.version_number.clone(),
            });
            return Err(QuarantineReason::NoFiles {
                project_id,
                version_number: version.version_number.clone(),
            });
        };

        if !is_plain_file_name(&file.filename) {
            self.sink.emit(&ProgressEvent::UnsafeFileName {
                project_id: project_id.clone(),
                filename: file.filename.clone(),
            });
            return Err(QuarantineReason::UnsafeFileName {
                filename: file.filename.clone(),
            });
        }

        self.sink.emit(&ProgressEvent::Downloading {
            filename: file.filename.clone(),
            url: file.url.clone(),
        });

        self.registry.fetch_file(file).await.map_err(|e| {
            let error = e.to_string();
            self.sink.emit(&ProgressEvent::DownloadFailed {
                file_name: mod_file.file_name.clone(),
                filename: file.filename.clone(),
                error: error.clone(),
            });
            QuarantineReason::DownloadFailed {
                filename: file.filename.clone(),
                error,
            }
        })
    }

    /// Archive the original, then create the replacement next to where it was.
    async fn replace(
        &self,
        mod_file: &ModFile,
        download: DownloadedFile,
        scanner: &ModScanner,
    ) -> ModReport {
        let archive_dir = scanner.archive_dir();
        let archived = archive_dir.join(&mod_file.file_name);

        if let Err(e) = tokio::fs::rename(&mod_file.path, &archived).await {
            warn!("Cannot archive {:?} to {:?}: {}", mod_file.path, archived, e);
            let reason = QuarantineReason::ArchiveFailed {
                error: e.to_string(),
            };
            return self
                .quarantine(&mod_file.path, mod_file, scanner, reason)
                .await;
        }
        self.sink.emit(&ProgressEvent::Archived {
            file_name: mod_file.file_name.clone(),
            dir: archive_dir,
        });

        let new_file_name = mod_file.replacement_name(&download.filename);
        let new_path = scanner.mods_dir().join(&new_file_name);

        let written = match create_file(&new_path, &download.bytes).await {
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                existing_mod_file(&new_path).await
            }
            other => other,
        };

        match written {
            Ok(()) => {}
            Err(e) => {
                let error = e.to_string();
                self.sink.emit(&ProgressEvent::ReplaceFailed {
                    file_name: mod_file.file_name.clone(),
                    new_file_name: new_file_name.clone(),
                    error: error.clone(),
                });
                let reason = QuarantineReason::WriteFailed {
                    new_file_name,
                    error,
                };
                return self.quarantine(&archived, mod_file, scanner, reason).await;
            }
        }

        self.sink.emit(&ProgressEvent::Updated {
            file_name: mod_file.file_name.clone(),
            new_file_name: new_file_name.clone(),
        });

        ModReport {
            file_name: mod_file.file_name.clone(),
            outcome: ModOutcome::Updated { new_file_name },
        }
    }

    /// Move `source` (the original, wherever it currently sits) into
    /// `not_found/` under the original name.
    async fn quarantine(
        &self,
        source: &Path,
        mod_file: &ModFile,
        scanner: &ModScanner,
        reason: QuarantineReason,
    ) -> ModReport {
        let quarantine_dir = scanner.quarantine_dir();
        let dest = quarantine_dir.join(&mod_file.file_name);

        match tokio::fs::rename(source, &dest).await {
            Ok(()) => self.sink.emit(&ProgressEvent::Quarantined {
                file_name: mod_file.file_name.clone(),
                dir: quarantine_dir,
            }),
            Err(e) => {
                warn!("Cannot move {:?} to {:?}: {}", source, dest, e);
                self.sink.emit(&ProgressEvent::QuarantineFailed {
                    file_name: mod_file.file_name.clone(),
                    error: e.to_string(),
                });
            }
        }

        ModReport {
            file_name: mod_file.file_name.clone(),
            outcome: ModOutcome::Quarantined { reason },
        }
    }
}

/// Preconditions checked before anything on disk is touched. Returns the
/// trimmed game version.
async fn validate(config: &RunConfig) -> SyncResult<&str> {
    let game_version = config.game_version.trim();
    if game_version.is_empty() {
        return Err(ModSyncError::InvalidConfig(
            "a Minecraft version is required".into(),
        ));
    }

    match tokio::fs::metadata(&config.mods_dir).await {
        Ok(meta) if meta.is_dir() => Ok(game_version),
        _ => Err(ModSyncError::DirectoryNotFound(config.mods_dir.clone())),
    }
}

/// True when `name` is a bare file name that cannot point outside the mods
/// directory.
fn is_plain_file_name(name: &str) -> bool {
    Path::new(name).file_name() == Some(OsStr::new(name))
}

/// Create `path` holding `bytes`. Never overwrites an existing file; a
/// partially written file is removed again.
async fn create_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;

    let written = async {
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await
    }
    .await;
    // Drop the handle before any cleanup; Windows refuses to delete open files.
    drop(file);

    if let Err(e) = written {
        let _ = tokio::fs::remove_file(path).await;
        return Err(e);
    }
    Ok(())
}

/// `path` is taken: accept it only when it is a regular mod file, which is
/// what another file in the same run resolving to this build leaves behind.
async fn existing_mod_file(path: &Path) -> std::io::Result<()> {
    let meta = tokio::fs::symlink_metadata(path).await?;
    if !meta.file_type().is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} exists and is not a regular file", path.display()),
        ));
    }
    info!("{:?} already present, keeping existing copy", path);
    Ok(())
}
