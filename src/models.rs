//! Core data models used throughout Snippet Harvest.
//!
//! These types represent the repositories, files, and snippets that flow
//! through the harvesting pipeline, from search results to the exported corpus.

use serde::Deserialize;

/// A repository returned by the search API, before any filtering.
#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub owner: RepoOwner,
    pub name: String,
    pub full_name: String,
    #[serde(rename = "stargazers_count")]
    pub stars: u64,
    #[serde(rename = "forks_count")]
    pub forks: u64,
}

/// Owner block nested inside a search item.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

/// One entry of a repository contents listing.
///
/// Directories only exist during traversal; the pipeline retains the
/// flattened list of eligible files. `min_version` is stamped onto each
/// selected file once the owning repository's version has been resolved.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoFile {
    pub name: String,
    pub path: String,
    /// Raw-content URL. Absent for directories.
    pub download_url: Option<String>,
    /// `"file"` or `"dir"` as reported by the contents API.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip)]
    pub min_version: Option<String>,
}

impl RepoFile {
    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }

    pub fn is_dir(&self) -> bool {
        self.kind == "dir"
    }
}

/// Snippet category: what kind of definition anchored the capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnippetKind {
    Class,
    Function,
}

impl SnippetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnippetKind::Class => "Class",
            SnippetKind::Function => "Function",
        }
    }
}

/// A captured code block. Carries no identity until the sampler assigns a UID.
#[derive(Debug, Clone)]
pub struct Snippet {
    pub kind: SnippetKind,
    pub body: String,
}

/// A sampled snippet with its synthesized unique identifier.
///
/// The UID has the shape `username|repo_name|file_name|NNN` where `NNN` is a
/// zero-padded sequence number scoped to the `(repo_name, file_name)` pair.
#[derive(Debug, Clone)]
pub struct SnippetRecord {
    pub uid: String,
    pub kind: SnippetKind,
    pub body: String,
}

/// All files selected from one repository, ready for snippet extraction.
#[derive(Debug, Clone)]
pub struct RepoGroup {
    pub username: String,
    pub repo_name: String,
    pub files: Vec<RepoFile>,
}
