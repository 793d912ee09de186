//! Harvest orchestration.
//!
//! Coordinates the full run: rate-limit check → repository search (or cached
//! list) → version gating and file selection → snippet sampling → corpus
//! export. Execution is single-threaded and sequential; every stage degrades
//! to empty results on failure rather than aborting, so the only observable
//! failure mode is an undersized corpus.

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::cache;
use crate::config::Config;
use crate::export;
use crate::github::GitHubSource;
use crate::models::{Repo, RepoGroup};
use crate::sample::sample_snippets;
use crate::select::select_repo_files;
use crate::source::RepoSource;

/// Run the complete pipeline against the live API.
pub fn run_harvest(config: &Config, refresh: bool) -> Result<()> {
    let source = GitHubSource::new(&config.api)?;

    if let Some(reset_time) = source.rate_limit_reset()? {
        bail!("Rate limit hit. The rate limit will reset at {}.", reset_time);
    }

    let mut rng = make_rng(config);

    let repos = find_repositories(&source, config, refresh)?;
    let groups = collect_groups(&source, config, &repos, &mut rng)?;
    let records = sample_snippets(&source, groups, &config.quotas, &mut rng)?;

    let run_id = Uuid::new_v4().to_string()[..4].to_string();
    let paths = export::export_corpus(&records, &config.output.data_dir, &run_id)?;

    println!(
        "Exported {} snippets to {} and {}",
        records.len(),
        paths.full_tsv.display(),
        paths.simple_tsv.display()
    );
    println!("Plain-text review copy: {}", paths.simple_txt.display());

    Ok(())
}

/// RNG for the run: seeded when configured, fresh otherwise.
pub fn make_rng(config: &Config) -> StdRng {
    match config.selection.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Fetch (or reload from cache) the repository list for the thresholds.
pub fn find_repositories(
    source: &dyn RepoSource,
    config: &Config,
    refresh: bool,
) -> Result<Vec<Repo>> {
    let min_stars = config.thresholds.min_stars;
    let min_forks = config.thresholds.min_forks;
    let path = cache::cache_path(&config.output.cache_dir, min_stars, min_forks);

    let items = if path.exists() && !refresh {
        println!(
            "Using stored results for minimum stars {} and minimum forks {}.",
            min_stars, min_forks
        );
        cache::load_items(&path)?
    } else {
        println!("Making new API request...");
        let items = source.search_repos(min_stars, min_forks)?;
        cache::save_items(&path, &items)?;
        items
    };

    let repos: Vec<Repo> = items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect();

    if !repos.is_empty() {
        let count = repos.len();
        let avg_stars = repos.iter().map(|r| r.stars).sum::<u64>() as f64 / count as f64;
        let avg_forks = repos.iter().map(|r| r.forks).sum::<u64>() as f64 / count as f64;
        println!("Found {} repositories!", count);
        println!("Average stars: {:.2}", avg_stars);
        println!("Average forks: {:.2}\n", avg_forks);
    } else {
        println!("Found no repositories.");
    }

    Ok(repos)
}

/// Gate each repository and gather its selected files into groups.
///
/// Repositories are deduplicated by full name. Collection stops as soon as a
/// positive global file cap is reached.
pub fn collect_groups<R: Rng>(
    source: &dyn RepoSource,
    config: &Config,
    repos: &[Repo],
    rng: &mut R,
) -> Result<Vec<RepoGroup>> {
    let max_files = config.quotas.max_files;

    let mut groups: Vec<RepoGroup> = Vec::new();
    let mut processed: std::collections::HashSet<String> = std::collections::HashSet::new();
    let mut files_count = 0usize;
    let mut considered_count = 0usize;

    for repo in repos {
        if !processed.insert(repo.full_name.clone()) {
            continue;
        }

        let outcome = select_repo_files(source, repo, config, rng)?;

        if outcome.considered {
            considered_count += 1;
        }

        if !outcome.files.is_empty() {
            if let Some(version) = &outcome.resolved_version {
                println!(
                    "Repository '{}' declares a minimum Python version of {}",
                    repo.name, version
                );
            }
            files_count += outcome.files.len();
            groups.push(RepoGroup {
                username: repo.owner.login.clone(),
                repo_name: repo.name.clone(),
                files: outcome.files,
            });

            println!("Total repositories considered: {}", considered_count);
            println!("Total files considered: {}\n", files_count);

            if max_files > 0 && files_count >= max_files as usize {
                println!(
                    "Successfully collected {} files to be scraped for snippets!",
                    files_count
                );
                break;
            }
        } else {
            println!(
                "Repository '{}' was not considered due to no compatible files or version",
                repo.name
            );
        }
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RepoOwner;

    fn repo(full_name: &str) -> Repo {
        let (owner, name) = full_name.split_once('/').unwrap();
        Repo {
            owner: RepoOwner {
                login: owner.to_string(),
            },
            name: name.to_string(),
            full_name: full_name.to_string(),
            stars: 100,
            forks: 10,
        }
    }

    struct EmptySource;

    impl RepoSource for EmptySource {
        fn search_repos(&self, _: u64, _: u64) -> Result<Vec<serde_json::Value>> {
            Ok(Vec::new())
        }
        fn list_dir(&self, _: &str, _: &str) -> Result<Vec<crate::models::RepoFile>> {
            Ok(Vec::new())
        }
        fn fetch_raw(&self, _: &str) -> Result<String> {
            bail!("no content")
        }
        fn rate_limit_reset(&self) -> Result<Option<String>> {
            Ok(None)
        }
    }

    fn test_config() -> Config {
        toml::from_str("[thresholds]\nmin_stars = 1\nmin_forks = 1\n").unwrap()
    }

    #[test]
    fn repos_without_files_produce_no_groups() {
        let config = test_config();
        let mut rng = StdRng::seed_from_u64(0);
        let groups =
            collect_groups(&EmptySource, &config, &[repo("a/one"), repo("b/two")], &mut rng)
                .unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn duplicate_full_names_are_processed_once() {
        let config = test_config();
        let mut rng = StdRng::seed_from_u64(0);
        // Same repo listed twice: the second occurrence is skipped outright.
        let groups =
            collect_groups(&EmptySource, &config, &[repo("a/one"), repo("a/one")], &mut rng)
                .unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut config = test_config();
        config.selection.seed = Some(9);
        let a: Vec<u32> = (0..4).map(|_| make_rng(&config).gen()).collect();
        assert!(a.windows(2).all(|w| w[0] == w[1]));
    }
}
