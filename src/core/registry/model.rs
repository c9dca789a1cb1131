// ─── Registry wire model ───
// Subset of the Modrinth v2 responses the updater reads.

use serde::{Deserialize, Serialize};

/// Response of `GET /search`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

/// A single search hit. Only `project_id` drives resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub project_id: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// One entry of `GET /project/{id}/version`, newest first as ordered by the
/// registry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectVersion {
    pub version_number: String,
    #[serde(default)]
    pub files: Vec<VersionFile>,
}

impl ProjectVersion {
    /// The file that gets installed: always the first one listed.
    pub fn primary_file(&self) -> Option<&VersionFile> {
        self.files.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VersionFile {
    pub filename: String,
    pub url: String,
}

/// Bytes of a downloaded version file, named after the registry's filename.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}
