//! Atomic publication of the discovery file.
//!
//! Write-to-temp plus rename: a crash mid-write leaves the previously
//! published file intact, and the collector never observes a half-written
//! array.

use std::fs;
use std::path::Path;

use tracing::debug;

use disco_model::ConfigItem;

use crate::error::DiscoveryError;

/// Serialize `items` as a pretty-printed JSON array and move it into place.
///
/// An empty slice publishes the literal `[]`.
pub fn write_targets(path: &Path, items: &[ConfigItem]) -> Result<(), DiscoveryError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(items)?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &content)?;
    fs::rename(&tmp, path)?;

    debug!(
        path = %path.display(),
        target_count = items.len(),
        "Published discovery file"
    );

    Ok(())
}
