use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub thresholds: ThresholdsConfig,
    #[serde(default)]
    pub quotas: QuotasConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Popularity thresholds fed into the repository search query.
#[derive(Debug, Deserialize, Clone)]
pub struct ThresholdsConfig {
    pub min_stars: u64,
    pub min_forks: u64,
    /// Repositories are eligible only when their declared minimum Python
    /// version is lexically greater than this string. Plain string comparison,
    /// not semver: `"3.10.0"` compares *below* `"3.9.0"`. Switching to a
    /// numeric comparison would change which repositories qualify.
    #[serde(default = "default_min_version")]
    pub min_python_version: String,
}

fn default_min_version() -> String {
    "3.6.0".to_string()
}

/// The three independent caps governing how much of the available data is
/// retained. Zero or negative means unlimited.
#[derive(Debug, Deserialize, Clone)]
pub struct QuotasConfig {
    #[serde(default = "default_max_snippets")]
    pub max_snippets: i64,
    #[serde(default = "default_max_snippets_per_file")]
    pub max_snippets_per_file: i64,
    #[serde(default = "default_max_files")]
    pub max_files: i64,
    #[serde(default = "default_max_files_per_repo")]
    pub max_files_per_repo: i64,
}

impl Default for QuotasConfig {
    fn default() -> Self {
        Self {
            max_snippets: default_max_snippets(),
            max_snippets_per_file: default_max_snippets_per_file(),
            max_files: default_max_files(),
            max_files_per_repo: default_max_files_per_repo(),
        }
    }
}

fn default_max_snippets() -> i64 {
    500
}
fn default_max_snippets_per_file() -> i64 {
    5
}
fn default_max_files() -> i64 {
    -1
}
fn default_max_files_per_repo() -> i64 {
    10
}

/// How files are picked within a repository once it passes the version gate.
#[derive(Debug, Deserialize, Clone)]
pub struct SelectionConfig {
    /// `"random"` draws a uniform sample of eligible files without
    /// replacement; `"in-order"` takes them in traversal order up to the cap.
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Optional RNG seed for reproducible runs. Unset means a fresh seed
    /// per run.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            seed: None,
        }
    }
}

fn default_strategy() -> String {
    "random".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable holding the API token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Seconds to sleep before retrying a throttled (429) request.
    #[serde(default = "default_retry_wait_secs")]
    pub retry_wait_secs: u64,
    /// Maximum retries for a throttled request. Zero means retry forever,
    /// which can stall a run on a hostile or very busy API.
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_env: default_token_env(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            retry_wait_secs: default_retry_wait_secs(),
            max_retries: 0,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.github.com".to_string()
}
fn default_token_env() -> String {
    "GITHUB_API_TOKEN".to_string()
}
fn default_page_size() -> u32 {
    100
}
fn default_max_pages() -> u32 {
    3
}
fn default_retry_wait_secs() -> u64 {
    60
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// Where the exported corpus files land.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Where cached repository-search results are stored between runs.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cache_dir: default_cache_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/cleaned-data")
}
fn default_cache_dir() -> PathBuf {
    PathBuf::from("data/raw-data")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.api.page_size == 0 || config.api.page_size > 100 {
        anyhow::bail!("api.page_size must be in 1..=100");
    }

    if config.api.max_pages == 0 {
        anyhow::bail!("api.max_pages must be >= 1");
    }

    match config.selection.strategy.as_str() {
        "random" | "in-order" => {}
        other => anyhow::bail!(
            "Unknown selection strategy: '{}'. Must be random or in-order.",
            other
        ),
    }

    Ok(config)
}
