//! End-to-end pipeline tests over an in-memory repository source.
//!
//! Exercises the full flow — search, version gating, file selection,
//! extraction, sampling, export — without touching the network.

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use tempfile::TempDir;

use snippet_harvest::config::Config;
use snippet_harvest::export;
use snippet_harvest::models::RepoFile;
use snippet_harvest::pipeline::{collect_groups, find_repositories};
use snippet_harvest::sample::sample_snippets;
use snippet_harvest::source::RepoSource;

/// A fake code host: per-repo directory listings and per-URL file bodies.
#[derive(Default)]
struct FakeHost {
    search_items: Vec<serde_json::Value>,
    listings: HashMap<(String, String), Vec<RepoFile>>,
    contents: HashMap<String, String>,
}

impl FakeHost {
    fn add_repo(&mut self, owner: &str, name: &str, stars: u64, forks: u64) {
        self.search_items.push(serde_json::json!({
            "name": name,
            "full_name": format!("{}/{}", owner, name),
            "owner": {"login": owner},
            "stargazers_count": stars,
            "forks_count": forks,
        }));
    }

    fn add_file(&mut self, full_name: &str, dir: &str, name: &str, body: &str) {
        let path = if dir.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", dir, name)
        };
        let url = format!("mem://{}/{}", full_name, path);
        self.listings
            .entry((full_name.to_string(), dir.to_string()))
            .or_default()
            .push(RepoFile {
                name: name.to_string(),
                path: path.clone(),
                download_url: Some(url.clone()),
                kind: "file".to_string(),
                min_version: None,
            });
        self.contents.insert(url, body.to_string());
    }

    fn add_dir(&mut self, full_name: &str, parent: &str, name: &str) {
        let path = if parent.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", parent, name)
        };
        self.listings
            .entry((full_name.to_string(), parent.to_string()))
            .or_default()
            .push(RepoFile {
                name: name.to_string(),
                path,
                download_url: None,
                kind: "dir".to_string(),
                min_version: None,
            });
    }
}

impl RepoSource for FakeHost {
    fn search_repos(&self, _: u64, _: u64) -> Result<Vec<serde_json::Value>> {
        Ok(self.search_items.clone())
    }

    fn list_dir(&self, full_name: &str, path: &str) -> Result<Vec<RepoFile>> {
        Ok(self
            .listings
            .get(&(full_name.to_string(), path.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn fetch_raw(&self, url: &str) -> Result<String> {
        match self.contents.get(url) {
            Some(body) => Ok(body.clone()),
            None => bail!("404: {}", url),
        }
    }

    fn rate_limit_reset(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

const SETUP_38: &str = "from setuptools import setup\nsetup(name='x', python_requires='>=3.8.0')\n";
const SETUP_NONE: &str = "from setuptools import setup\nsetup(name='x')\n";

fn config(cache_dir: &std::path::Path) -> Config {
    let toml = format!(
        r#"
[thresholds]
min_stars = 100
min_forks = 10

[quotas]
max_snippets = -1
max_snippets_per_file = -1
max_files = -1
max_files_per_repo = -1

[selection]
strategy = "in-order"
seed = 5

[output]
cache_dir = "{}"
"#,
        cache_dir.display()
    );
    toml::from_str(&toml).unwrap()
}

fn populated_host() -> FakeHost {
    let mut host = FakeHost::default();

    host.add_repo("alice", "webkit", 9000, 800);
    host.add_file("alice/webkit", "", "setup.py", SETUP_38);
    host.add_file(
        "alice/webkit",
        "",
        "app.py",
        "class App:\n    def run(self):\n        return 0\n",
    );
    host.add_dir("alice/webkit", "", "util");
    host.add_file(
        "alice/webkit",
        "util",
        "helpers.py",
        "def helper():\n    return 1\n",
    );

    // No version constraint: must be rejected by the gate.
    host.add_repo("bob", "oldlib", 7000, 500);
    host.add_file("bob/oldlib", "", "setup.py", SETUP_NONE);
    host.add_file("bob/oldlib", "", "lib.py", "def f():\n    pass\n");

    host
}

#[test]
fn full_run_gates_extracts_and_exports() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(&tmp.path().join("raw"));
    let host = populated_host();
    let mut rng = StdRng::seed_from_u64(5);

    let repos = find_repositories(&host, &cfg, false).unwrap();
    assert_eq!(repos.len(), 2);

    let groups = collect_groups(&host, &cfg, &repos, &mut rng).unwrap();
    // Only alice/webkit clears the version gate.
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].repo_name, "webkit");
    let names: Vec<_> = groups[0].files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["app.py", "helpers.py"]);
    assert!(groups[0]
        .files
        .iter()
        .all(|f| f.min_version.as_deref() == Some("3.8.0")));

    let records = sample_snippets(&host, groups, &cfg.quotas, &mut rng).unwrap();
    // app.py: one class + one nested method; helpers.py: one function.
    assert_eq!(records.len(), 3);
    assert!(records.iter().any(|r| r.uid == "alice|webkit|app.py|000"));
    assert!(records.iter().any(|r| r.uid == "alice|webkit|app.py|001"));
    assert!(records
        .iter()
        .any(|r| r.uid == "alice|webkit|helpers.py|000"));

    let out_dir = tmp.path().join("cleaned");
    let paths = export::export_corpus(&records, &out_dir, "test").unwrap();
    let full = std::fs::read_to_string(&paths.full_tsv).unwrap();
    assert!(full.starts_with("UID\tCategory\tSnippet\n"));
    assert!(full.contains("alice|webkit|app.py|000"));

    let txt = std::fs::read_to_string(&paths.simple_txt).unwrap();
    // One physical line per record, header-free.
    assert_eq!(txt.lines().count(), records.len());
    assert!(txt.contains("<newline>"));
}

#[test]
fn search_results_are_cached_and_reused() {
    let tmp = TempDir::new().unwrap();
    let cache_dir = tmp.path().join("raw");
    let cfg = config(&cache_dir);
    let host = populated_host();

    let first = find_repositories(&host, &cfg, false).unwrap();
    assert_eq!(first.len(), 2);

    // An empty source plus the warm cache must still yield both repos.
    let empty = FakeHost::default();
    let second = find_repositories(&empty, &cfg, false).unwrap();
    assert_eq!(second.len(), 2);

    // --refresh bypasses the cache and overwrites it.
    let third = find_repositories(&empty, &cfg, true).unwrap();
    assert!(third.is_empty());
}

#[test]
fn global_file_cap_stops_collection_across_repos() {
    let tmp = TempDir::new().unwrap();
    let mut cfg = config(&tmp.path().join("raw"));
    cfg.quotas.max_files = 1;

    let mut host = FakeHost::default();
    for (owner, name) in [("a", "one"), ("b", "two")] {
        let full = format!("{}/{}", owner, name);
        host.add_repo(owner, name, 500, 50);
        host.add_file(&full, "", "setup.py", SETUP_38);
        host.add_file(&full, "", "main.py", "def f():\n    pass\n");
    }

    let mut rng = StdRng::seed_from_u64(0);
    let repos = find_repositories(&host, &cfg, false).unwrap();
    let groups = collect_groups(&host, &cfg, &repos, &mut rng).unwrap();

    let total_files: usize = groups.iter().map(|g| g.files.len()).sum();
    assert_eq!(total_files, 1);
}

#[test]
fn per_repo_file_cap_counts_manifest_slot() {
    let tmp = TempDir::new().unwrap();
    let mut cfg = config(&tmp.path().join("raw"));
    cfg.quotas.max_files_per_repo = 2;

    let mut host = FakeHost::default();
    host.add_repo("a", "one", 500, 50);
    host.add_file("a/one", "", "setup.py", SETUP_38);
    host.add_file("a/one", "", "m1.py", "def f():\n    pass\n");
    host.add_file("a/one", "", "m2.py", "def g():\n    pass\n");
    host.add_file("a/one", "", "m3.py", "def h():\n    pass\n");

    let mut rng = StdRng::seed_from_u64(0);
    let repos = find_repositories(&host, &cfg, false).unwrap();
    let groups = collect_groups(&host, &cfg, &repos, &mut rng).unwrap();

    // The manifest occupies one of the two traversal slots, leaving one
    // snippet source.
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 1);
}

#[test]
fn random_strategy_samples_from_all_eligible_files() {
    let tmp = TempDir::new().unwrap();
    let mut cfg = config(&tmp.path().join("raw"));
    cfg.quotas.max_files_per_repo = 2;
    cfg.selection.strategy = "random".to_string();

    let mut host = FakeHost::default();
    host.add_repo("a", "one", 500, 50);
    host.add_file("a/one", "", "setup.py", SETUP_38);
    for name in ["a.py", "b.py", "c.py", "d.py"] {
        host.add_file("a/one", "", name, "def f():\n    pass\n");
    }

    let repos = find_repositories(&host, &cfg, false).unwrap();

    // Every draw is a full-size sample, and across seeds every eligible file
    // shows up; the manifest never does.
    let mut seen = std::collections::HashSet::new();
    for seed in 0..32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let groups = collect_groups(&host, &cfg, &repos, &mut rng).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].files.len(), 2);
        for file in &groups[0].files {
            assert_ne!(file.name, "setup.py");
            seen.insert(file.name.clone());
        }
    }
    assert_eq!(seen.len(), 4);
}
