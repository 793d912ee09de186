//! # Snippet Harvest CLI (`harvest`)
//!
//! The `harvest` binary drives the corpus-building pipeline: it searches
//! GitHub for popular Python repositories, gates them on their declared
//! minimum Python version, scrapes class/function snippets out of their
//! source files, and exports the sampled corpus as TSV.
//!
//! ## Usage
//!
//! ```bash
//! harvest --config ./config/harvest.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `harvest fetch` | Search for repositories and cache the raw results |
//! | `harvest run` | Run the full pipeline and export the corpus files |
//! | `harvest revert <file>` | Restore real newlines in a reviewed `.txt` export |
//! | `harvest split <file>` | Shuffle a corpus export into dev/test/train files |
//! | `harvest rate-limit` | Show whether the API quota is exhausted |
//!
//! ## Examples
//!
//! ```bash
//! # Search and cache the repository list
//! harvest fetch --config ./config/harvest.toml
//!
//! # Full run, reusing the cached list
//! harvest run --config ./config/harvest.toml
//!
//! # Full run with a fixed seed, bypassing the cache
//! harvest run --refresh --seed 7
//!
//! # Turn a hand-reviewed txt export back into a TSV
//! harvest revert data/cleaned-data/adjudicated-ab12.txt
//!
//! # Shuffle a corpus and cut it into dev/test/train partitions
//! harvest split data/cleaned-data/adjudicated-ab12.txt --dev 300 --test 100
//! ```

mod cache;
mod config;
mod export;
mod extract;
mod github;
mod models;
mod pipeline;
mod sample;
mod select;
mod source;
mod split;
mod version_gate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

use crate::github::GitHubSource;
use crate::source::RepoSource;

/// Snippet Harvest — builds a labeled corpus of Python code snippets from
/// popular GitHub repositories.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/harvest.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "harvest",
    about = "Snippet Harvest — a corpus-building pipeline for Python code snippets",
    version,
    long_about = "Snippet Harvest searches GitHub for Python repositories above configurable \
    star/fork thresholds, filters them by their declared minimum Python version, extracts \
    class and function snippets via an indentation heuristic, samples them under per-file \
    and global quotas, and exports the corpus as TSV plus a reviewable plain-text form."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/harvest.toml`. Thresholds, quotas, selection
    /// strategy, API, and output settings are read from this file.
    #[arg(long, global = true, default_value = "./config/harvest.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Search for repositories and cache the raw results.
    ///
    /// Queries the search API for repositories above the configured star and
    /// fork thresholds and stores the raw items under the cache directory,
    /// keyed by the thresholds. Subsequent runs reuse the cache.
    Fetch {
        /// Ignore any cached list and query the API again.
        #[arg(long)]
        refresh: bool,
    },

    /// Run the full pipeline and export the corpus.
    ///
    /// Checks the rate limit, loads or fetches the repository list, gates
    /// repositories on their declared minimum Python version, selects files,
    /// samples snippets under the configured quotas, and writes the three
    /// corpus files to the output directory.
    Run {
        /// Ignore any cached repository list and query the API again.
        #[arg(long)]
        refresh: bool,

        /// Override the RNG seed from config for a reproducible run.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Restore real newlines in a reviewed plain-text export.
    ///
    /// Reads a `.txt` export (one physical line per record, newlines escaped
    /// to `<newline>`), unescapes the snippet field, and writes a
    /// `-reverted.tsv` next to the input.
    Revert {
        /// Path to the `.txt` file to revert.
        file: PathBuf,
    },

    /// Shuffle a corpus export and cut it into dev/test/train partitions.
    ///
    /// Rows are shuffled with embedded newlines kept escaped, then written as
    /// `shuffled.tsv`, `dev.txt`, `test.txt`, and `train.txt` under the
    /// output directory. Dev takes the first rows, test the next, train the
    /// rest.
    Split {
        /// Path to the corpus export to shuffle and split.
        file: PathBuf,

        /// Number of rows in the dev partition.
        #[arg(long, default_value_t = 300)]
        dev: usize,

        /// Number of rows in the test partition.
        #[arg(long, default_value_t = 100)]
        test: usize,

        /// Output directory for the partition files.
        ///
        /// Defaults to a `splits` directory next to the input file.
        #[arg(long)]
        out: Option<PathBuf>,

        /// RNG seed for a reproducible shuffle.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show whether the API rate limit is exhausted.
    RateLimit,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Revert and split are pure file surgery and need no config.
    if let Commands::Revert { file } = &cli.command {
        let output = export::revert_txt(file)?;
        println!(
            "Reverted {} back to its original TSV format as {}",
            file.display(),
            output.display()
        );
        return Ok(());
    }
    if let Commands::Split { file, dev, test, out, seed } = &cli.command {
        let out_dir = out.clone().unwrap_or_else(|| {
            file.parent().unwrap_or_else(|| Path::new(".")).join("splits")
        });
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(*s),
            None => StdRng::from_entropy(),
        };
        let paths = split::split_corpus(file, &out_dir, *dev, *test, &mut rng)?;
        println!(
            "Shuffled {} into {}, {}, and {}",
            file.display(),
            paths.dev.display(),
            paths.test.display(),
            paths.train.display()
        );
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Fetch { refresh } => {
            let source = GitHubSource::new(&cfg.api)?;
            pipeline::find_repositories(&source, &cfg, refresh)?;
        }
        Commands::Run { refresh, seed } => {
            let mut cfg = cfg;
            if seed.is_some() {
                cfg.selection.seed = seed;
            }
            pipeline::run_harvest(&cfg, refresh)?;
        }
        Commands::RateLimit => {
            let source = GitHubSource::new(&cfg.api)?;
            match source.rate_limit_reset()? {
                Some(reset_time) => {
                    println!("Rate limit hit. The rate limit will reset at {}.", reset_time);
                }
                None => println!("Requests remaining — good to go."),
            }
        }
        Commands::Revert { .. } | Commands::Split { .. } => unreachable!(),
    }

    Ok(())
}
