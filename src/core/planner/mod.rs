pub mod outcome;
pub mod runner;

pub use outcome::{ModOutcome, ModReport, QuarantineReason, RunOutcome};
pub use runner::ReplacementPlanner;
