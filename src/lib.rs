//! # Snippet Harvest
//!
//! A corpus-building pipeline that harvests Python code snippets from popular
//! GitHub repositories.
//!
//! The pipeline searches for repositories above star/fork thresholds, gates
//! them on the minimum Python version declared in `setup.py`, selects a
//! bounded set of source files per repository, extracts class and function
//! definitions via a line-indentation heuristic, samples the results under
//! per-file and global quotas, and exports the corpus as TSV plus a
//! reviewable plain-text form.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌───────────┐   ┌──────────┐
//! │ RepoSource │──▶│ Version gate  │──▶│ Extractor │──▶│ Sampler  │
//! │ (GitHub)   │   │ + file select │   │ (indent)  │   │ (quotas) │
//! └────────────┘   └──────────────┘   └───────────┘   └────┬─────┘
//!                                                          ▼
//!                                                    ┌──────────┐
//!                                                    │ Exporter │
//!                                                    │ TSV/txt  │
//!                                                    └──────────┘
//! ```
//!
//! The extractor and sampler are pure with respect to the network: they reach
//! repository data only through the [`source::RepoSource`] trait, so tests
//! drive the whole pipeline from in-memory fixtures.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`source`] | Repository source boundary |
//! | [`github`] | GitHub implementation with throttling retry |
//! | [`cache`] | On-disk repository-list cache |
//! | [`version_gate`] | Minimum-version resolution from `setup.py` |
//! | [`select`] | Per-repository file selection |
//! | [`extract`] | Indentation-based snippet extraction |
//! | [`sample`] | Quota-bounded snippet sampling |
//! | [`export`] | TSV/plain-text corpus export |
//! | [`split`] | Corpus shuffling and dev/test/train partitioning |
//! | [`pipeline`] | End-to-end orchestration |

pub mod cache;
pub mod config;
pub mod export;
pub mod extract;
pub mod github;
pub mod models;
pub mod pipeline;
pub mod sample;
pub mod select;
pub mod source;
pub mod split;
pub mod version_gate;
