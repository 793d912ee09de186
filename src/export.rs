//! Corpus export: full TSV, simplified review TSV, and the plain-text form.
//!
//! Three files per run, sharing a short run id:
//! - `adjudicated-full-{run}.tsv` — header `UID\tCategory\tSnippet`.
//! - `adjudicated-{run}.tsv` — no header; ID, the literal `adjudicated`, the
//!   literal `label-na`, Snippet. Meant for manual review and hand-editing.
//! - `adjudicated-{run}.txt` — the simplified rows with embedded newlines
//!   escaped to `<newline>` so each record is one physical line.
//!
//! [`revert_txt`] restores real newlines from the token, producing a
//! `-reverted.tsv` next to the input. The escape round-trips exactly, with one
//! known collision: a snippet that already contains the literal `<newline>`
//! cannot be told apart from an escaped line break after reverting.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::models::SnippetRecord;

/// Token substituted for literal newlines in the plain-text form.
pub const NEWLINE_TOKEN: &str = "<newline>";

/// Replace every embedded newline with the literal token.
pub fn escape_newlines(text: &str) -> String {
    text.replace('\n', NEWLINE_TOKEN)
}

/// Restore real newlines from the literal token.
pub fn unescape_newlines(text: &str) -> String {
    text.replace(NEWLINE_TOKEN, "\n")
}

/// Quote a TSV field the way pandas does: wrap in double quotes only when the
/// field contains a tab, newline, or quote, doubling any embedded quotes.
fn tsv_field(field: &str) -> String {
    if field.contains('\t') || field.contains('\n') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Paths of the three files written for one run.
#[derive(Debug)]
pub struct ExportPaths {
    pub full_tsv: PathBuf,
    pub simple_tsv: PathBuf,
    pub simple_txt: PathBuf,
}

/// Write all three corpus files for one run.
///
/// `run_id` is typically the first four characters of a v4 UUID.
pub fn export_corpus(
    records: &[SnippetRecord],
    data_dir: &Path,
    run_id: &str,
) -> Result<ExportPaths> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create output directory: {}", data_dir.display()))?;

    let paths = ExportPaths {
        full_tsv: data_dir.join(format!("adjudicated-full-{}.tsv", run_id)),
        simple_tsv: data_dir.join(format!("adjudicated-{}.tsv", run_id)),
        simple_txt: data_dir.join(format!("adjudicated-{}.txt", run_id)),
    };

    write_full_tsv(records, &paths.full_tsv)?;
    write_simple_tsv(records, &paths.simple_tsv)?;
    write_simple_txt(records, &paths.simple_txt)?;

    Ok(paths)
}

/// Full export: header row plus UID, Category, Snippet.
pub fn write_full_tsv(records: &[SnippetRecord], path: &Path) -> Result<()> {
    let mut out = String::from("UID\tCategory\tSnippet\n");
    for record in records {
        out.push_str(&tsv_field(&record.uid));
        out.push('\t');
        out.push_str(record.kind.as_str());
        out.push('\t');
        out.push_str(&tsv_field(&record.body));
        out.push('\n');
    }
    std::fs::write(path, out)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Simplified export: no header; 0-based row index, fixed literals, Snippet.
pub fn write_simple_tsv(records: &[SnippetRecord], path: &Path) -> Result<()> {
    let mut out = String::new();
    for (idx, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "{}\tadjudicated\tlabel-na\t{}\n",
            idx,
            tsv_field(&record.body)
        ));
    }
    std::fs::write(path, out)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Plain-text export: the simplified rows, one physical line per record.
pub fn write_simple_txt(records: &[SnippetRecord], path: &Path) -> Result<()> {
    let mut out = String::new();
    for (idx, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "{}\tadjudicated\tlabel-na\t{}\n",
            idx,
            escape_newlines(&record.body)
        ));
    }
    std::fs::write(path, out)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Revert a plain-text file back to TSV with real newlines.
///
/// Only the last field of each row is unescaped; earlier fields (ID and the
/// hand-editable literals) pass through untouched. Writes
/// `<stem>-reverted.tsv` next to the input and returns its path.
pub fn revert_txt(input: &Path) -> Result<PathBuf> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let mut out = String::new();
    for line in content.lines() {
        match line.rsplit_once('\t') {
            Some((head, snippet)) => {
                out.push_str(head);
                out.push('\t');
                out.push_str(&tsv_field(&unescape_newlines(snippet)));
                out.push('\n');
            }
            None => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("reverted");
    let output = input.with_file_name(format!("{}-reverted.tsv", stem));
    std::fs::write(&output, out)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(output)
}
