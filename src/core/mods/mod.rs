pub mod model;
pub mod scanner;

pub use model::{ModFile, ARCHIVE_DIR, DISABLED_SUFFIX, JAR_SUFFIX, QUARANTINE_DIR};
pub use scanner::ModScanner;
