// ─── modsync core ───
// Mode-agnostic update pipeline; front-ends live in `commands`.
//
// Architecture:
//   core/
//     identity   — filename → registry slug
//     registry/  — Modrinth search / versions / download behind `ModRegistry`
//     mods/      — ModFile model + directory scanner (not_found/, old/)
//     planner/   — per-mod state machine and run tally
//     progress   — ProgressEvent + sinks
//     settings   — layered settings → RunConfig

pub mod error;
pub mod http;
pub mod identity;
pub mod mods;
pub mod planner;
pub mod progress;
pub mod registry;
pub mod settings;
