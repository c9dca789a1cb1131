pub mod commands;
pub mod core;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use crate::core::error::{ModSyncError, SyncResult};
pub use crate::core::identity::extract_slug;
pub use crate::core::mods::{ModFile, ModScanner};
pub use crate::core::planner::{
    ModOutcome, ModReport, QuarantineReason, ReplacementPlanner, RunOutcome,
};
pub use crate::core::progress::{
    ChannelSink, ConsoleSink, ProgressEvent, ProgressSink, TracingSink,
};
pub use crate::core::registry::{
    DownloadedFile, ModRegistry, ModrinthClient, ProjectVersion, VersionFile,
};
pub use crate::core::settings::{RunConfig, Settings};

pub async fn run() -> ExitCode {
    let args = commands::Args::parse();

    // Logs go to stderr; stdout carries progress lines or JSON.
    let fallback = args.default_log_filter();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("modsync {} starting", env!("CARGO_PKG_VERSION"));

    commands::execute(args).await
}
