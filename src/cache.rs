//! On-disk cache of raw repository-search results.
//!
//! Search items are stored verbatim as a JSON array in a file named after the
//! two popularity thresholds, so a re-run with the same thresholds can skip
//! the network. There is no invalidation beyond overwriting on an explicit
//! re-fetch.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Deterministic cache filename for a threshold pair.
pub fn cache_path(cache_dir: &Path, min_stars: u64, min_forks: u64) -> PathBuf {
    cache_dir.join(format!(
        "repos_min_stars_{}_min_forks_{}.json",
        min_stars, min_forks
    ))
}

pub fn save_items(path: &Path, items: &[serde_json::Value]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create cache directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string(items)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write cache file: {}", path.display()))?;
    Ok(())
}

pub fn load_items(path: &Path) -> Result<Vec<serde_json::Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read cache file: {}", path.display()))?;
    let items = serde_json::from_str(&content)
        .with_context(|| format!("Cache file is not a JSON array: {}", path.display()))?;
    Ok(items)
}
