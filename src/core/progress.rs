// ─── Progress reporting ───
// Push-only events from the planner to whichever front-end is active.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

/// One significant step of a run. `Display` renders the human-readable line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    RunStarted {
        mods_dir: PathBuf,
        game_version: String,
        loader: String,
    },
    NoModsFound {
        mods_dir: PathBuf,
    },
    Processing {
        file_name: String,
    },
    Searching {
        file_name: String,
        slug: String,
    },
    ProjectFound {
        slug: String,
        project_id: String,
    },
    ProjectNotFound {
        slug: String,
    },
    SearchFailed {
        slug: String,
        error: String,
    },
    VersionSearch {
        project_id: String,
        game_version: String,
        loader: String,
    },
    VersionFound {
        project_id: String,
        version_number: String,
    },
    NoCompatibleVersion {
        project_id: String,
        game_version: String,
        loader: String,
    },
    VersionLookupFailed {
        project_id: String,
        error: String,
    },
    VersionHasNoFiles {
        project_id: String,
        version_number: String,
    },
    UnsafeFileName {
        project_id: String,
        filename: String,
    },
    Downloading {
        filename: String,
        url: String,
    },
    DownloadFailed {
        file_name: String,
        filename: String,
        error: String,
    },
    Quarantined {
        file_name: String,
        dir: PathBuf,
    },
    QuarantineFailed {
        file_name: String,
        error: String,
    },
    Archived {
        file_name: String,
        dir: PathBuf,
    },
    Updated {
        file_name: String,
        new_file_name: String,
    },
    ReplaceFailed {
        file_name: String,
        new_file_name: String,
        error: String,
    },
    ConfigurationError {
        message: String,
    },
    Summary {
        updated: usize,
        quarantined: usize,
    },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ProgressEvent::*;
        match self {
            RunStarted {
                mods_dir,
                game_version,
                loader,
            } => write!(
                f,
                "Updating mods in {} for Minecraft {} ({})",
                mods_dir.display(),
                game_version,
                loader
            ),
            NoModsFound { mods_dir } => write!(f, "No mods found in {}", mods_dir.display()),
            Processing { file_name } => write!(f, "Processing {file_name}..."),
            Searching { file_name, slug } => {
                write!(f, "Searching for '{slug}' (from {file_name})")
            }
            ProjectFound { slug, project_id } => {
                write!(f, "Found project {project_id} for '{slug}'")
            }
            ProjectNotFound { slug } => write!(f, "No project found on Modrinth for '{slug}'"),
            SearchFailed { slug, error } => write!(f, "Search for '{slug}' failed: {error}"),
            VersionSearch {
                project_id,
                game_version,
                loader,
            } => write!(
                f,
                "Looking up versions of {project_id} for Minecraft {game_version} and {loader}"
            ),
            VersionFound {
                project_id,
                version_number,
            } => write!(f, "Latest version of {project_id}: {version_number}"),
            NoCompatibleVersion {
                project_id,
                game_version,
                loader,
            } => write!(
                f,
                "No version of {project_id} is compatible with Minecraft {game_version} and {loader}"
            ),
            VersionLookupFailed { project_id, error } => {
                write!(f, "Version lookup for {project_id} failed: {error}")
            }
            VersionHasNoFiles {
                project_id,
                version_number,
            } => write!(f, "Version {version_number} of {project_id} has no files"),
            UnsafeFileName {
                project_id,
                filename,
            } => write!(
                f,
                "Refusing file {filename:?} of {project_id}: not a plain file name"
            ),
            Downloading { filename, url } => write!(f, "Downloading {filename} from {url}"),
            DownloadFailed {
                file_name,
                filename,
                error,
            } => write!(f, "Download of {filename} for {file_name} failed: {error}"),
            Quarantined { file_name, dir } => {
                write!(f, "Moved {} to {}", file_name, dir.display())
            }
            QuarantineFailed { file_name, error } => {
                write!(f, "Could not quarantine {file_name}: {error}")
            }
            Archived { file_name, dir } => {
                write!(f, "Moved old version {} to {}", file_name, dir.display())
            }
            Updated {
                file_name,
                new_file_name,
            } => write!(f, "Updated {file_name} to {new_file_name}"),
            ReplaceFailed {
                file_name,
                new_file_name,
                error,
            } => write!(
                f,
                "Could not write {new_file_name} to replace {file_name}: {error}"
            ),
            ConfigurationError { message } => write!(f, "Error: {message}"),
            Summary {
                updated,
                quarantined,
            } => write!(
                f,
                "Update finished. Updated: {updated}, not found or failed: {quarantined}"
            ),
        }
    }
}

/// Receiver of progress events.
///
/// Emitting never fails: a sink that cannot display an event drops it.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn emit(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Prints each event as a line on stdout. Write errors (closed pipe) are
/// ignored.
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn emit(&self, event: &ProgressEvent) {
        let mut out = std::io::stdout().lock();
        if matches!(event, ProgressEvent::Processing { .. }) {
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "{event}");
    }
}

/// Routes events into the `tracing` log.
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::SearchFailed { .. }
            | ProgressEvent::VersionLookupFailed { .. }
            | ProgressEvent::UnsafeFileName { .. }
            | ProgressEvent::DownloadFailed { .. }
            | ProgressEvent::QuarantineFailed { .. }
            | ProgressEvent::ReplaceFailed { .. } => tracing::warn!("{event}"),
            ProgressEvent::ConfigurationError { .. } => tracing::error!("{event}"),
            _ => tracing::info!("{event}"),
        }
    }
}

/// Forwards events over a tokio channel, for front-ends that render on
/// another task. Events sent after the receiver is gone are dropped.
pub struct ChannelSink {
    tx: UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, event: &ProgressEvent) {
        let _ = self.tx.send(event.clone());
    }
}
