use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tracing::{debug, info, warn};

use super::model::{DownloadedFile, ProjectVersion, SearchResponse, VersionFile};
use super::ModRegistry;
use crate::core::error::{ModSyncError, SyncResult};

pub const MODRINTH_API_BASE: &str = "https://api.modrinth.com/v2";

/// Restricts search results to mods (no modpacks, shaders, resource packs).
const MOD_FACETS: &str = r#"[["project_type:mod"]]"#;

/// Modrinth v2 client. Each call is a single GET with no retries.
pub struct ModrinthClient {
    client: Client,
    api_base: String,
}

impl ModrinthClient {
    pub fn new(client: Client, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { client, api_base }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn search_request(&self, slug: &str) -> RequestBuilder {
        self.client
            .get(format!("{}/search", self.api_base))
            .query(&[("query", slug), ("facets", MOD_FACETS)])
    }

    fn versions_request(
        &self,
        project_id: &str,
        game_version: &str,
        loader: &str,
    ) -> SyncResult<RequestBuilder> {
        let game_versions = serde_json::to_string(&[game_version])?;
        let loaders = serde_json::to_string(&[loader])?;

        Ok(self
            .client
            .get(format!("{}/project/{}/version", self.api_base, project_id))
            .query(&[
                ("game_versions", game_versions.as_str()),
                ("loaders", loaders.as_str()),
            ]))
    }
}

/// Send a request and turn any non-2xx status into `RequestFailed`.
async fn send_checked(request: RequestBuilder) -> SyncResult<reqwest::Response> {
    let resp = request.send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ModSyncError::RequestFailed {
            url: resp.url().to_string(),
            status: status.as_u16(),
        });
    }
    Ok(resp)
}

#[async_trait]
impl ModRegistry for ModrinthClient {
    async fn search_project(&self, slug: &str) -> SyncResult<Option<String>> {
        debug!("Searching Modrinth for '{}'", slug);

        let resp = send_checked(self.search_request(slug))
            .await
            .inspect_err(|e| warn!("Search for '{}' failed: {}", slug, e))?;
        let body: SearchResponse = resp
            .json()
            .await
            .inspect_err(|e| warn!("Search response for '{}' unreadable: {}", slug, e))?;

        let project_id = body.hits.into_iter().next().map(|hit| hit.project_id);
        match &project_id {
            Some(id) => info!("Slug '{}' resolved to project {}", slug, id),
            None => info!("No Modrinth project matches '{}'", slug),
        }
        Ok(project_id)
    }

    async fn latest_version(
        &self,
        project_id: &str,
        game_version: &str,
        loader: &str,
    ) -> SyncResult<Option<ProjectVersion>> {
        debug!(
            "Listing versions of {} for Minecraft {} / {}",
            project_id, game_version, loader
        );

        let request = self.versions_request(project_id, game_version, loader)?;
        let resp = send_checked(request)
            .await
            .inspect_err(|e| warn!("Version lookup for project {} failed: {}", project_id, e))?;
        let versions: Vec<ProjectVersion> = resp.json().await.inspect_err(|e| {
            warn!("Version list for project {} unreadable: {}", project_id, e)
        })?;

        // The registry orders versions newest first.
        Ok(versions.into_iter().next())
    }

    async fn fetch_file(&self, file: &VersionFile) -> SyncResult<DownloadedFile> {
        debug!("Downloading {} from {}", file.filename, file.url);

        let resp = send_checked(self.client.get(&file.url))
            .await
            .inspect_err(|e| warn!("Download of {} failed: {}", file.filename, e))?;
        let bytes = resp
            .bytes()
            .await
            .inspect_err(|e| warn!("Download of {} interrupted: {}", file.filename, e))?;

        Ok(DownloadedFile {
            filename: file.filename.clone(),
            bytes: bytes.to_vec(),
        })
    }
}
