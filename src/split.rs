//! Shuffle an exported corpus and partition it into dev/test/train files.
//!
//! Reads a TSV or plain-text export row by row, restores real newlines in
//! every field, shuffles the rows, and writes them back out with newlines
//! re-escaped so each row stays one physical line. The shuffled file is then
//! cut into three partitions: the first `dev_size` rows, the next
//! `test_size`, and the remainder.

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::{Path, PathBuf};

use crate::export::{escape_newlines, unescape_newlines};

/// Paths of the four files written by one split.
#[derive(Debug)]
pub struct SplitPaths {
    pub shuffled: PathBuf,
    pub dev: PathBuf,
    pub test: PathBuf,
    pub train: PathBuf,
}

/// Shuffle the rows of `input` and cut them into dev/test/train.
///
/// Undersized inputs degrade gracefully: dev takes what exists, then test,
/// and train gets whatever is left (possibly nothing). Row contents pass
/// through unchanged apart from the newline escape round trip.
pub fn split_corpus<R: Rng>(
    input: &Path,
    out_dir: &Path,
    dev_size: usize,
    test_size: usize,
    rng: &mut R,
) -> Result<SplitPaths> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let mut rows: Vec<Vec<String>> = content
        .lines()
        .map(|line| line.split('\t').map(unescape_newlines).collect())
        .collect();

    rows.shuffle(rng);

    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|field| escape_newlines(field))
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect();

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let paths = SplitPaths {
        shuffled: out_dir.join("shuffled.tsv"),
        dev: out_dir.join("dev.txt"),
        test: out_dir.join("test.txt"),
        train: out_dir.join("train.txt"),
    };

    let dev_end = dev_size.min(lines.len());
    let test_end = (dev_end + test_size).min(lines.len());

    write_lines(&paths.shuffled, &lines)?;
    write_lines(&paths.dev, &lines[..dev_end])?;
    write_lines(&paths.test, &lines[dev_end..test_end])?;
    write_lines(&paths.train, &lines[test_end..])?;

    Ok(paths)
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    std::fs::write(path, out)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
