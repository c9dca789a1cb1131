use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::error::{ModSyncError, SyncResult};
use crate::core::registry::MODRINTH_API_BASE;

const APP_DIR_NAME: &str = "modsync";
const SETTINGS_FILE: &str = "settings.json";
const API_BASE_ENV: &str = "MODSYNC_API_BASE";

pub const DEFAULT_GAME_VERSION: &str = "1.21.6";
pub const DEFAULT_LOADER: &str = "fabric";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Loaders the registry knows about. Offered as choices by the prompts; any
/// other value is still passed through verbatim.
pub const KNOWN_LOADERS: &[&str] = &["fabric", "forge", "quilt", "neoforge"];

/// What a single run needs. Passed explicitly into the planner, never kept as
/// global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mods_dir: PathBuf,
    pub game_version: String,
    pub loader: String,
}

/// Persistent user settings, layered under environment and CLI overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub mods_dir: PathBuf,
    pub game_version: String,
    pub loader: String,
    pub api_base: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mods_dir: default_mods_dir(),
            game_version: DEFAULT_GAME_VERSION.to_string(),
            loader: DEFAULT_LOADER.to_string(),
            api_base: MODRINTH_API_BASE.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// `<config dir>/modsync/settings.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILE))
    }

    /// Load settings from `path`. A missing file yields the defaults; an
    /// unreadable or malformed one is an error.
    pub fn load(path: &Path) -> SyncResult<Self> {
        if !path.exists() {
            debug!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|e| ModSyncError::Settings {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let settings = serde_json::from_str(&raw).map_err(|e| ModSyncError::Settings {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> SyncResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ModSyncError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| ModSyncError::io(path, e))?;

        info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_api_base_override(std::env::var(API_BASE_ENV).ok());
    }

    fn apply_api_base_override(&mut self, value: Option<String>) {
        if let Some(base) = value
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
        {
            debug!("API base overridden to {}", base);
            self.api_base = base;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn to_run_config(&self) -> RunConfig {
        RunConfig {
            mods_dir: self.mods_dir.clone(),
            game_version: self.game_version.clone(),
            loader: self.loader.clone(),
        }
    }
}

fn default_mods_dir() -> PathBuf {
    std::env::current_dir()
        .map(|dir| dir.join("mods"))
        .unwrap_or_else(|_| PathBuf::from("mods"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("settings.json")).unwrap();

        assert_eq!(settings.game_version, "1.21.6");
        assert_eq!(settings.loader, "fabric");
        assert_eq!(settings.api_base, "https://api.modrinth.com/v2");
        assert!(settings.mods_dir.ends_with("mods"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"loader": "forge", "game_version": "1.20.1"}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.loader, "forge");
        assert_eq!(settings.game_version, "1.20.1");
        assert_eq!(settings.request_timeout_secs, 60);
    }

    #[test]
    fn malformed_or_unknown_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(ModSyncError::Settings { .. })
        ));

        std::fs::write(&path, r#"{"minecraft": "1.20.1"}"#).unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(ModSyncError::Settings { .. })
        ));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            mods_dir: PathBuf::from("/srv/minecraft/mods"),
            game_version: "1.20.4".into(),
            loader: "quilt".into(),
            ..Settings::default()
        };

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn api_base_override_is_trimmed_and_ignores_blank() {
        let mut settings = Settings::default();

        settings.apply_api_base_override(Some("   ".into()));
        assert_eq!(settings.api_base, MODRINTH_API_BASE);

        settings.apply_api_base_override(Some(" http://localhost:8080/v2/ ".into()));
        assert_eq!(settings.api_base, "http://localhost:8080/v2");
    }

    #[test]
    fn run_config_mirrors_settings() {
        let settings = Settings::default();
        let config = settings.to_run_config();
        assert_eq!(config.game_version, settings.game_version);
        assert_eq!(config.loader, settings.loader);
        assert_eq!(config.mods_dir, settings.mods_dir);
    }
}
