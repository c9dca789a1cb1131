pub mod client;
pub mod model;

use async_trait::async_trait;

use crate::core::error::SyncResult;

pub use client::{ModrinthClient, MODRINTH_API_BASE};
pub use model::{DownloadedFile, ProjectVersion, SearchHit, SearchResponse, VersionFile};

/// The three registry round trips the planner drives.
///
/// Each call is independent. An `Err` is a recoverable per-mod failure
/// (transport error, non-success status, malformed body); the planner
/// quarantines the mod and moves on.
#[async_trait]
pub trait ModRegistry: Send + Sync {
    /// First search hit's project id for `slug`, `None` when nothing matches.
    async fn search_project(&self, slug: &str) -> SyncResult<Option<String>>;

    /// First version of `project_id` matching exactly `game_version` and
    /// `loader`, `None` when no build is compatible.
    async fn latest_version(
        &self,
        project_id: &str,
        game_version: &str,
        loader: &str,
    ) -> SyncResult<Option<ProjectVersion>>;

    /// Raw bytes of a version file.
    async fn fetch_file(&self, file: &VersionFile) -> SyncResult<DownloadedFile>;
}
