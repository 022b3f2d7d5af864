//! Shared test utilities

use doxibox::ConfigOverrides;
use tempfile::TempDir;

/// Overrides pointing storage locations at a private temp dir
///
/// Keep the returned `TempDir` alive for the duration of the test.
#[must_use]
pub fn isolated_overrides() -> (TempDir, ConfigOverrides) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let overrides = ConfigOverrides {
        transcript_dir: Some(dir.path().join("transcripts")),
        cache_dir: Some(dir.path().join("cache")),
        ..ConfigOverrides::default()
    };
    (dir, overrides)
}

/// Convert a slice of literals into owned prompts
#[must_use]
pub fn prompts(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
