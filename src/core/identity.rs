// ─── Identity extraction ───
// Turns a mod jar's filename into the slug used as the registry search query.

use std::sync::OnceLock;

use regex::Regex;

use crate::core::mods::{DISABLED_SUFFIX, JAR_SUFFIX};

/// Libraries whose distributed filename does not match their registry slug.
/// Matched case-insensitively anywhere in the stripped name.
const SPECIAL_SLUGS: &[(&str, &str)] = &[("fabric-api", "fabric")];

/// `-1.2.3-fabric`, `_1.20.1_forge+build.7`: a version with a qualifier
/// attached, stripped through to the end of the name.
fn qualified_version() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-_]\d+\.\d+\.\d+[-_].*$").expect("valid regex"))
}

/// `-1.2.3` at the very end of the name.
fn bare_version() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-_]\d+\.\d+\.\d+$").expect("valid regex"))
}

/// Derive the search slug for a mod file name.
///
/// Never fails: a name without any recognizable version token is just
/// lowercased with spaces turned into hyphens.
pub fn extract_slug(file_name: &str) -> String {
    let name = file_name.strip_suffix(DISABLED_SUFFIX).unwrap_or(file_name);
    let name = name.strip_suffix(JAR_SUFFIX).unwrap_or(name);

    let name = qualified_version().replacen(name, 1, "");
    let name = bare_version().replacen(&name, 1, "");

    let lowered = name.to_lowercase();
    if let Some((_, slug)) = SPECIAL_SLUGS
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
    {
        return (*slug).to_string();
    }

    lowered.replace(' ', "-")
}
