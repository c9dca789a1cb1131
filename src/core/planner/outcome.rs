use serde::Serialize;
use thiserror::Error;

/// Why a mod ended up in `not_found/`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum QuarantineReason {
    #[error("no project matches '{slug}'")]
    ProjectNotFound { slug: String },

    #[error("search for '{slug}' failed: {error}")]
    SearchFailed { slug: String, error: String },

    #[error("project {project_id} has no compatible version")]
    NoCompatibleVersion { project_id: String },

    #[error("version lookup for {project_id} failed: {error}")]
    VersionLookupFailed { project_id: String, error: String },

    #[error("version {version_number} of {project_id} lists no files")]
    NoFiles {
        project_id: String,
        version_number: String,
    },

    #[error("registry file name {filename:?} is not a plain file name")]
    UnsafeFileName { filename: String },

    #[error("download of {filename} failed: {error}")]
    DownloadFailed { filename: String, error: String },

    #[error("could not archive the original: {error}")]
    ArchiveFailed { error: String },

    #[error("could not write {new_file_name}: {error}")]
    WriteFailed { new_file_name: String, error: String },
}

/// Terminal state of one mod file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModOutcome {
    Updated { new_file_name: String },
    Quarantined { reason: QuarantineReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModReport {
    pub file_name: String,
    pub outcome: ModOutcome,
}

/// Tally of a whole run, with one report per scanned file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub updated: usize,
    pub quarantined: usize,
    pub mods: Vec<ModReport>,
}

impl RunOutcome {
    pub(crate) fn record(&mut self, report: ModReport) {
        match report.outcome {
            ModOutcome::Updated { .. } => self.updated += 1,
            ModOutcome::Quarantined { .. } => self.quarantined += 1,
        }
        self.mods.push(report);
    }

    /// Report for a given original file name, if it was part of the run.
    pub fn report_for(&self, file_name: &str) -> Option<&ModReport> {
        self.mods.iter().find(|r| r.file_name == file_name)
    }
}
