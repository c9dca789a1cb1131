//! Front-ends over the update pipeline.
//!
//! Both the flag-driven run and the interactive prompt session only build a
//! [`Settings`] value and render progress; the pipeline itself never knows
//! which one is driving it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dialoguer::{Confirm, Input, Select};
use tracing::{error, info};

use crate::core::error::{ModSyncError, SyncResult};
use crate::core::http::build_http_client;
use crate::core::planner::{ReplacementPlanner, RunOutcome};
use crate::core::progress::{ConsoleSink, ProgressSink, TracingSink};
use crate::core::registry::{ModRegistry, ModrinthClient};
use crate::core::settings::{RunConfig, Settings, KNOWN_LOADERS};

/// Update the mods in a Minecraft mods folder to the latest Modrinth builds
/// for a game version and loader.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Minecraft version to match (e.g. 1.21.6).
    #[arg(short, long)]
    pub game_version: Option<String>,

    /// Mod loader to match (fabric, forge, quilt, neoforge).
    #[arg(short, long)]
    pub loader: Option<String>,

    /// Mods directory. Defaults to ./mods.
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Settings file to read instead of the per-user default.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Modrinth API base URL.
    #[arg(long)]
    pub api_base: Option<String>,

    /// Ask for version, loader and directory before running.
    #[arg(short, long)]
    pub interactive: bool,

    /// Write the values used for this run back to the settings file.
    #[arg(long)]
    pub save_settings: bool,

    /// Print per-mod results as JSON; progress goes to the log instead.
    #[arg(long)]
    pub json: bool,

    /// Log registry traffic and file moves to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Log filter used when `RUST_LOG` is unset. In JSON mode progress is
    /// logged at `info`, so that level stays visible for this crate.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "info,modsync=debug"
        } else if self.json {
            "warn,modsync=info"
        } else {
            "warn"
        }
    }
}

/// Run the pipeline once against `registry`, reporting to `sink`.
pub async fn update_mods(
    registry: &dyn ModRegistry,
    config: &RunConfig,
    sink: &dyn ProgressSink,
) -> SyncResult<RunOutcome> {
    ReplacementPlanner::new(registry, sink).run(config).await
}

/// Entry point shared by both front-ends.
pub async fn execute(args: Args) -> ExitCode {
    let settings = match prepare_settings(&args) {
        Ok(Some(settings)) => settings,
        Ok(None) => {
            println!("Cancelled.");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let client = match build_http_client(settings.request_timeout()) {
        Ok(client) => ModrinthClient::new(client, settings.api_base.clone()),
        Err(e) => {
            eprintln!("Error: {}", ModSyncError::from(e));
            return ExitCode::FAILURE;
        }
    };

    let config = settings.to_run_config();
    let sink: &dyn ProgressSink = if args.json { &TracingSink } else { &ConsoleSink };

    // Errors from the run were already reported through the sink.
    let Ok(outcome) = update_mods(&client, &config, sink).await else {
        return ExitCode::FAILURE;
    };

    if args.json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

/// Layer defaults, settings file, environment, flags and (optionally) the
/// prompt session. `None` means the user backed out at the prompt.
fn prepare_settings(args: &Args) -> SyncResult<Option<Settings>> {
    let path = args.config.clone().or_else(Settings::default_path);
    let mut settings = match &path {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.apply_env();
    apply_args(&mut settings, args);

    if args.interactive && !prompt_session(&mut settings)? {
        return Ok(None);
    }

    if args.save_settings {
        match &path {
            Some(path) => settings.save(path)?,
            None => info!("No settings location on this platform, not saving"),
        }
    }

    Ok(Some(settings))
}

fn apply_args(settings: &mut Settings, args: &Args) {
    if let Some(version) = &args.game_version {
        settings.game_version = version.clone();
    }
    if let Some(loader) = &args.loader {
        settings.loader = loader.trim().to_lowercase();
    }
    if let Some(dir) = &args.dir {
        settings.mods_dir = dir.clone();
    }
    if let Some(base) = &args.api_base {
        settings.api_base = base.trim_end_matches('/').to_string();
    }
}

/// Line-prompt session. Enter keeps the value shown in brackets.
fn prompt_session(settings: &mut Settings) -> SyncResult<bool> {
    println!("Minecraft mod updater");

    let game_version: String = Input::new()
        .with_prompt("Minecraft version")
        .default(settings.game_version.clone())
        .interact_text()?;
    settings.game_version = game_version.trim().to_string();

    let current = KNOWN_LOADERS
        .iter()
        .position(|l| *l == settings.loader)
        .unwrap_or(0);
    let choice = Select::new()
        .with_prompt("Mod loader")
        .items(KNOWN_LOADERS)
        .default(current)
        .interact()?;
    settings.loader = KNOWN_LOADERS[choice].to_string();

    let mods_dir: String = Input::new()
        .with_prompt("Mods directory")
        .default(settings.mods_dir.display().to_string())
        .interact_text()?;
    settings.mods_dir = PathBuf::from(mods_dir.trim());

    Ok(Confirm::new()
        .with_prompt("Download and update mods now?")
        .default(true)
        .interact()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_mode_keeps_progress_in_the_log() {
        let json = Args::parse_from(["modsync", "--json"]);
        assert_eq!(json.default_log_filter(), "warn,modsync=info");

        let plain = Args::parse_from(["modsync"]);
        assert_eq!(plain.default_log_filter(), "warn");

        let verbose = Args::parse_from(["modsync", "--json", "-v"]);
        assert_eq!(verbose.default_log_filter(), "info,modsync=debug");
    }

    #[test]
    fn flags_override_settings() {
        let args = Args::parse_from([
            "modsync",
            "--game-version",
            "1.20.1",
            "--loader",
            " Forge ",
            "--dir",
            "/srv/mods",
            "--api-base",
            "http://localhost:9000/v2/",
        ]);
        let mut settings = Settings::default();

        apply_args(&mut settings, &args);

        assert_eq!(settings.game_version, "1.20.1");
        assert_eq!(settings.loader, "forge");
        assert_eq!(settings.mods_dir, PathBuf::from("/srv/mods"));
        assert_eq!(settings.api_base, "http://localhost:9000/v2");
    }

    #[test]
    fn absent_flags_keep_settings() {
        let args = Args::parse_from(["modsync"]);
        let mut settings = Settings {
            loader: "quilt".into(),
            ..Settings::default()
        };

        apply_args(&mut settings, &args);

        assert_eq!(settings.loader, "quilt");
        assert_eq!(settings.game_version, "1.21.6");
        assert!(!args.interactive);
    }

    #[test]
    fn settings_file_is_read_from_config_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"game_version": "1.19.2"}"#).unwrap();

        let args = Args::parse_from(["modsync", "--config", path.to_str().unwrap()]);
        let settings = prepare_settings(&args).unwrap().unwrap();

        assert_eq!(settings.game_version, "1.19.2");
    }

    #[test]
    fn save_settings_writes_the_layered_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let args = Args::parse_from([
            "modsync",
            "--config",
            path.to_str().unwrap(),
            "--loader",
            "neoforge",
            "--save-settings",
        ]);
        prepare_settings(&args).unwrap();

        assert_eq!(Settings::load(&path).unwrap().loader, "neoforge");
    }
}
