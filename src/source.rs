//! Repository source boundary.
//!
//! The pipeline consumes repository data through the [`RepoSource`] trait so
//! that the core (selection, extraction, sampling) never talks to the network
//! directly. The production implementation is [`crate::github::GitHubSource`];
//! tests drive the same pipeline through an in-memory implementation.

use anyhow::Result;

use crate::models::RepoFile;

/// A provider of repository descriptors and file contents.
///
/// Every call is blocking and sequential; the pipeline has no concurrency.
/// Implementations are responsible for their own throttling recovery —
/// callers treat a returned error as "this branch is exhausted", not as a
/// reason to abort the run.
pub trait RepoSource {
    /// Search for repositories above the popularity thresholds and return the
    /// raw search items, verbatim, so they can be cached and re-parsed later.
    fn search_repos(&self, min_stars: u64, min_forks: u64) -> Result<Vec<serde_json::Value>>;

    /// List one directory of a repository.
    ///
    /// A non-list payload (an error object served during throttling, an empty
    /// repository) is reported as an empty listing rather than an error, so a
    /// failing branch degrades to "no files found".
    fn list_dir(&self, full_name: &str, path: &str) -> Result<Vec<RepoFile>>;

    /// Fetch the raw text of a file by its download URL.
    fn fetch_raw(&self, url: &str) -> Result<String>;

    /// Check the API rate limit before starting a run.
    ///
    /// Returns `Some(reset_time)` (human-readable) when the core quota is
    /// already exhausted, `None` when requests remain.
    fn rate_limit_reset(&self) -> Result<Option<String>>;
}
