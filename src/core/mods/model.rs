use std::path::{Path, PathBuf};

use serde::Serialize;

/// Regular mod package extension.
pub const JAR_SUFFIX: &str = ".jar";
/// Marker appended after `.jar` so the loader ignores the file.
pub const DISABLED_SUFFIX: &str = ".disabled";

/// Subdirectory receiving mods that could not be resolved or downloaded.
pub const QUARANTINE_DIR: &str = "not_found";
/// Subdirectory receiving the superseded originals of updated mods.
pub const ARCHIVE_DIR: &str = "old";

/// One mod file found in the scanned directory.
///
/// Owned by a single planner iteration; by the end of it the file has been
/// moved into either the archive or the quarantine directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModFile {
    pub path: PathBuf,
    pub file_name: String,
    pub is_disabled: bool,
}

impl ModFile {
    /// Build a `ModFile` from a path, or `None` if the name has neither the
    /// `.jar` nor the `.disabled` suffix.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?.to_string();
        let is_disabled = file_name.ends_with(DISABLED_SUFFIX);
        if !is_disabled && !file_name.ends_with(JAR_SUFFIX) {
            return None;
        }

        Some(Self {
            path: path.to_path_buf(),
            file_name,
            is_disabled,
        })
    }

    /// Name the replacement gets in the scan directory: the registry's
    /// filename, carrying the disabled marker over when the original had it.
    pub fn replacement_name(&self, registry_file_name: &str) -> String {
        if self.is_disabled {
            format!("{registry_file_name}{DISABLED_SUFFIX}")
        } else {
            registry_file_name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_jar_and_disabled_files() {
        let jar = ModFile::from_path(Path::new("/mods/sodium-0.5.8.jar")).unwrap();
        assert!(!jar.is_disabled);
        assert_eq!(jar.file_name, "sodium-0.5.8.jar");

        let disabled = ModFile::from_path(Path::new("/mods/sodium-0.5.8.jar.disabled")).unwrap();
        assert!(disabled.is_disabled);
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(ModFile::from_path(Path::new("/mods/readme.txt")).is_none());
        assert!(ModFile::from_path(Path::new("/mods/config.json")).is_none());
        assert!(ModFile::from_path(Path::new("/mods/archive.jar.bak")).is_none());
    }

    #[test]
    fn replacement_name_keeps_disabled_marker() {
        let disabled = ModFile::from_path(Path::new("/mods/a-1.0.0.jar.disabled")).unwrap();
        assert_eq!(disabled.replacement_name("a-1.1.0.jar"), "a-1.1.0.jar.disabled");

        let enabled = ModFile::from_path(Path::new("/mods/a-1.0.0.jar")).unwrap();
        assert_eq!(enabled.replacement_name("a-1.1.0.jar"), "a-1.1.0.jar");
    }
}
