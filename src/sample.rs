//! Bounded random sampling of extracted snippets.
//!
//! Consumes the per-repository file groups, runs the extractor over each
//! file's content, and emits [`SnippetRecord`]s under two caps: a per-file
//! snippet cap and a global snippet cap. The only randomness is one
//! whole-group shuffle up front — which repositories contribute first is
//! random, but file order within a repository and snippet order within a file
//! are fully deterministic.

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

use crate::config::QuotasConfig;
use crate::extract::extract_snippets;
use crate::models::{RepoGroup, Snippet, SnippetKind, SnippetRecord};
use crate::source::RepoSource;

/// Mutable sampling state: the per-`(repo, file)` sequence counters and the
/// global emitted count. Owned by the sampling loop alone; there is no
/// concurrency to guard against.
#[derive(Debug, Default)]
pub struct SamplerContext {
    counters: HashMap<(String, String), u32>,
    emitted: u64,
}

impl SamplerContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current sequence number for a `(repo, file)` pair; advances on every
    /// observed snippet, emitted or not.
    fn next_sequence(&mut self, repo_name: &str, file_name: &str) -> u32 {
        let counter = self
            .counters
            .entry((repo_name.to_string(), file_name.to_string()))
            .or_insert(0);
        let seq = *counter;
        *counter += 1;
        seq
    }
}

/// Sample snippets across all repository groups.
///
/// Groups are shuffled wholesale, then traversed in order: files in their
/// selected order, categories Class-then-Function, snippets in extraction
/// order. Per snippet, the file's sequence counter always advances; the
/// snippet is dropped silently once the per-file cap is met, and the run
/// halts outright the moment the global cap is reached.
pub fn sample_snippets<R: Rng>(
    source: &dyn RepoSource,
    mut groups: Vec<RepoGroup>,
    quotas: &QuotasConfig,
    rng: &mut R,
) -> Result<Vec<SnippetRecord>> {
    groups.shuffle(rng);

    let mut ctx = SamplerContext::new();
    let mut records = Vec::new();

    for group in &groups {
        for file in &group.files {
            let url = match file.download_url.as_deref() {
                Some(url) => url,
                None => continue,
            };
            let content = match source.fetch_raw(url) {
                Ok(content) => content,
                Err(e) => {
                    println!("An unexpected error occurred: {}", e);
                    continue;
                }
            };

            let extraction = extract_snippets(&content);
            let snippets = extraction
                .classes
                .into_iter()
                .map(|body| Snippet {
                    kind: SnippetKind::Class,
                    body,
                })
                .chain(extraction.functions.into_iter().map(|body| Snippet {
                    kind: SnippetKind::Function,
                    body,
                }));

            for snippet in snippets {
                let seq = ctx.next_sequence(&group.repo_name, &file.name);

                if quotas.max_snippets_per_file > 0
                    && i64::from(seq) >= quotas.max_snippets_per_file
                {
                    // Over the per-file cap: dropped, but the counter above
                    // already advanced.
                    continue;
                }

                let uid = format!(
                    "{}|{}|{}|{:03}",
                    group.username, group.repo_name, file.name, seq
                );
                records.push(SnippetRecord {
                    uid,
                    kind: snippet.kind,
                    body: snippet.body,
                });
                ctx.emitted += 1;
                println!("Added a snippet! Total snippet count: {}", ctx.emitted);

                if quotas.max_snippets > 0 && ctx.emitted >= quotas.max_snippets as u64 {
                    return Ok(records);
                }
            }
        }
    }

    Ok(records)
}
