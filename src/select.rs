//! Per-repository file selection.
//!
//! Walks a repository's contents depth-first, resolves the declared minimum
//! Python version from a root-level `setup.py`, gates the repository on the
//! configured threshold, and picks which `.py` files to scrape. The manifest
//! itself is used only for version resolution — it is never a snippet source.

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::Config;
use crate::models::{Repo, RepoFile};
use crate::source::RepoSource;
use crate::version_gate;

/// The manifest filename consulted for version resolution.
pub const MANIFEST_NAME: &str = "setup.py";

const SOURCE_SUFFIX: &str = ".py";

/// What file selection decided for one repository.
#[derive(Debug, Default)]
pub struct SelectionOutcome {
    /// Files to scrape, each stamped with the repo's resolved version.
    pub files: Vec<RepoFile>,
    /// Whether the repository cleared the version gate at all. A repo can be
    /// considered yet contribute no files when nothing but the manifest
    /// matched.
    pub considered: bool,
    pub resolved_version: Option<String>,
}

/// Gate a repository on its declared version and pick its source files.
pub fn select_repo_files<R: Rng>(
    source: &dyn RepoSource,
    repo: &Repo,
    config: &Config,
    rng: &mut R,
) -> Result<SelectionOutcome> {
    let cap = config.quotas.max_files_per_repo;
    // The traversal cap only applies to in-order selection. The random
    // strategy draws its sample from every eligible file, so its walk must
    // see the whole tree.
    let walk_cap = match config.selection.strategy.as_str() {
        "in-order" => cap,
        _ => -1,
    };
    let all_files = walk_tree(source, &repo.full_name, "", walk_cap, 0, true);

    let resolved_version = repo_version(source, &all_files);

    let mut outcome = SelectionOutcome {
        resolved_version: resolved_version.clone(),
        ..Default::default()
    };

    let version = match resolved_version {
        Some(v) => v,
        None => return Ok(outcome),
    };
    if !version_gate::version_eligible(&version, &config.thresholds.min_python_version) {
        return Ok(outcome);
    }
    outcome.considered = true;

    let eligible: Vec<RepoFile> = all_files
        .into_iter()
        .filter(|f| f.name.ends_with(SOURCE_SUFFIX) && f.name != MANIFEST_NAME)
        .collect();

    let mut selected = apply_strategy(eligible, cap, &config.selection.strategy, rng);
    for file in &mut selected {
        file.min_version = Some(version.clone());
        println!(
            "Adding {}/{} to be scraped for snippets!",
            repo.name, file.name
        );
    }

    if selected.is_empty() {
        outcome.considered = false;
        println!(
            "No compatible files found in repository '{}' other than {}\n",
            repo.name, MANIFEST_NAME
        );
    }

    outcome.files = selected;
    Ok(outcome)
}

/// Depth-first traversal, carrying the running count by value.
///
/// At the repository root the manifest is included unconditionally as the
/// first entry when present. A positive `max_files_per_repo` stops the walk
/// once `current_count` plus the collected length reaches it; zero or
/// negative never stops early. A listing failure abandons that branch and
/// keeps whatever was already collected.
fn walk_tree(
    source: &dyn RepoSource,
    full_name: &str,
    path: &str,
    max_files_per_repo: i64,
    current_count: usize,
    is_root: bool,
) -> Vec<RepoFile> {
    let entries = match source.list_dir(full_name, path) {
        Ok(entries) => entries,
        Err(e) => {
            println!("An unexpected error occurred: {}", e);
            return Vec::new();
        }
    };

    let mut collected = Vec::new();

    if is_root {
        if let Some(manifest) = entries.iter().find(|e| e.is_file() && e.name == MANIFEST_NAME) {
            collected.push(manifest.clone());
            println!("Found {}/{} in the root directory", full_name, MANIFEST_NAME);
        }
    }

    for entry in &entries {
        if max_files_per_repo > 0
            && current_count + collected.len() >= max_files_per_repo as usize
        {
            break;
        }
        if entry.is_file() && entry.name.ends_with(SOURCE_SUFFIX) {
            if is_root && entry.name == MANIFEST_NAME {
                continue;
            }
            collected.push(entry.clone());
        } else if entry.is_dir() {
            let nested = walk_tree(
                source,
                full_name,
                &entry.path,
                max_files_per_repo,
                current_count + collected.len(),
                false,
            );
            collected.extend(nested);
        }
    }

    collected
}

/// Fetch the manifest content (if any was collected) and resolve the version.
fn repo_version(source: &dyn RepoSource, files: &[RepoFile]) -> Option<String> {
    let manifest = files.iter().find(|f| f.name == MANIFEST_NAME)?;
    let url = manifest.download_url.as_deref()?;
    let content = match source.fetch_raw(url) {
        Ok(content) => content,
        Err(e) => {
            println!("An unexpected error occurred: {}", e);
            return None;
        }
    };
    version_gate::min_python_version(&content)
}

/// Apply the configured selection strategy to the eligible files.
///
/// `in-order` keeps traversal order up to the cap; `random` draws a uniform
/// sample without replacement, so which files are scraped changes from run to
/// run. Both honor `cap <= 0` as unlimited.
fn apply_strategy<R: Rng>(
    eligible: Vec<RepoFile>,
    cap: i64,
    strategy: &str,
    rng: &mut R,
) -> Vec<RepoFile> {
    if cap <= 0 {
        return eligible;
    }
    let take = (cap as usize).min(eligible.len());
    match strategy {
        "in-order" => eligible.into_iter().take(take).collect(),
        _ => eligible
            .choose_multiple(rng, take)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn file(name: &str) -> RepoFile {
        RepoFile {
            name: name.to_string(),
            path: name.to_string(),
            download_url: Some(format!("mem://{}", name)),
            kind: "file".to_string(),
            min_version: None,
        }
    }

    #[test]
    fn in_order_strategy_takes_traversal_prefix() {
        let eligible = vec![file("a.py"), file("b.py"), file("c.py")];
        let mut rng = StdRng::seed_from_u64(0);
        let picked = apply_strategy(eligible, 2, "in-order", &mut rng);
        let names: Vec<_> = picked.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.py", "b.py"]);
    }

    #[test]
    fn random_strategy_respects_cap_without_replacement() {
        let eligible = vec![file("a.py"), file("b.py"), file("c.py"), file("d.py")];
        let mut rng = StdRng::seed_from_u64(7);
        let picked = apply_strategy(eligible, 3, "random", &mut rng);
        assert_eq!(picked.len(), 3);
        let mut names: Vec<_> = picked.iter().map(|f| f.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn nonpositive_cap_is_unlimited() {
        let eligible = vec![file("a.py"), file("b.py")];
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(apply_strategy(eligible, -1, "random", &mut rng).len(), 2);
    }
}
