//! Scripted registry and recording sink shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use modsync::{
    DownloadedFile, ModRegistry, ModSyncError, ProgressEvent, ProgressSink, ProjectVersion,
    RunConfig, SyncResult, VersionFile,
};

pub const GAME_VERSION: &str = "1.21.6";
pub const LOADER: &str = "fabric";

/// In-memory registry answering from lookup tables and recording every call.
#[derive(Default)]
pub struct FakeRegistry {
    projects: HashMap<String, String>,
    versions: HashMap<String, ProjectVersion>,
    files: HashMap<String, Vec<u8>>,
    broken_searches: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project with one compatible version whose only file is
    /// `filename`, downloadable with `bytes`.
    pub fn with_mod(self, slug: &str, project_id: &str, filename: &str, bytes: &[u8]) -> Self {
        let url = format!("https://cdn.modrinth.com/data/{project_id}/{filename}");
        let version = ProjectVersion {
            version_number: format!("{filename}-version"),
            files: vec![VersionFile {
                filename: filename.to_string(),
                url: url.clone(),
            }],
        };
        let mut registry = self.with_version(slug, project_id, version);
        registry.files.insert(url, bytes.to_vec());
        registry
    }

    pub fn with_version(mut self, slug: &str, project_id: &str, version: ProjectVersion) -> Self {
        self.projects.insert(slug.to_string(), project_id.to_string());
        self.versions.insert(project_id.to_string(), version);
        self
    }

    /// Project found, but no version matches the filters.
    pub fn with_project_only(mut self, slug: &str, project_id: &str) -> Self {
        self.projects.insert(slug.to_string(), project_id.to_string());
        self
    }

    /// Project and version resolve, but the file URL answers 404.
    pub fn with_missing_file(self, slug: &str, project_id: &str, filename: &str) -> Self {
        let version = ProjectVersion {
            version_number: "1.0.0".into(),
            files: vec![VersionFile {
                filename: filename.to_string(),
                url: format!("https://cdn.modrinth.com/data/{project_id}/{filename}"),
            }],
        };
        self.with_version(slug, project_id, version)
    }

    /// Search for `slug` fails at the transport level.
    pub fn with_broken_search(mut self, slug: &str) -> Self {
        self.broken_searches.insert(slug.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ModRegistry for FakeRegistry {
    async fn search_project(&self, slug: &str) -> SyncResult<Option<String>> {
        self.record(format!("search:{slug}"));
        if self.broken_searches.contains(slug) {
            return Err(ModSyncError::RequestFailed {
                url: format!("https://api.modrinth.com/v2/search?query={slug}"),
                status: 503,
            });
        }
        Ok(self.projects.get(slug).cloned())
    }

    async fn latest_version(
        &self,
        project_id: &str,
        game_version: &str,
        loader: &str,
    ) -> SyncResult<Option<ProjectVersion>> {
        self.record(format!("versions:{project_id}:{game_version}:{loader}"));
        if game_version != GAME_VERSION || loader != LOADER {
            return Ok(None);
        }
        Ok(self.versions.get(project_id).cloned())
    }

    async fn fetch_file(&self, file: &VersionFile) -> SyncResult<DownloadedFile> {
        self.record(format!("fetch:{}", file.url));
        match self.files.get(&file.url) {
            Some(bytes) => Ok(DownloadedFile {
                filename: file.filename.clone(),
                bytes: bytes.clone(),
            }),
            None => Err(ModSyncError::RequestFailed {
                url: file.url.clone(),
                status: 404,
            }),
        }
    }
}

/// Sink keeping every event for later assertions.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

pub fn run_config(mods_dir: &Path) -> RunConfig {
    RunConfig {
        mods_dir: mods_dir.to_path_buf(),
        game_version: GAME_VERSION.to_string(),
        loader: LOADER.to_string(),
    }
}

pub fn write_mod(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Sorted names of the regular files directly in `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
