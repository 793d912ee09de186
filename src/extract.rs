//! Indentation-based snippet extractor.
//!
//! Locates every line containing a `class` or `def` signature and captures the
//! signature line plus all contiguous following lines that share its exact
//! leading-whitespace prefix. This is a line heuristic, not a parse: decorators
//! and comments are handled only incidentally, and a line indented with tabs
//! where the signature used spaces breaks the capture. The scan resumes at the
//! line after each signature (not after the captured body), so methods inside a
//! class are also captured on their own — nested definitions yield overlapping
//! snippets on purpose.

use regex::Regex;
use std::sync::OnceLock;

/// Snippet bodies for one source file, grouped by category and kept in the
/// order their signature lines appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub classes: Vec<String>,
    pub functions: Vec<String>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.functions.is_empty()
    }
}

fn class_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bclass\s+[A-Za-z_]\w*\b").unwrap())
}

fn function_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bdef\s+[A-Za-z_]\w*\b").unwrap())
}

/// Extract every class and function body from one file's raw text.
///
/// Pure function: no I/O, no hidden state, identical output for identical
/// input. Files with no signature lines yield empty lists, not an error.
pub fn extract_snippets(text: &str) -> Extraction {
    let lines: Vec<&str> = text.lines().collect();
    let mut out = Extraction::default();

    for (i, line) in lines.iter().enumerate() {
        // Class check precedes function check; one match per line.
        if class_pattern().is_match(line) {
            out.classes.push(capture_body(i, &lines));
        } else if function_pattern().is_match(line) {
            out.functions.push(capture_body(i, &lines));
        }
    }

    out
}

/// Capture a body starting at the signature line.
///
/// The signature's exact leading whitespace is the reference indent. A
/// following line belongs to the body iff it is non-blank and starts with that
/// indent as a literal string prefix. The first blank or non-prefixed line
/// terminates the capture and is not consumed.
fn capture_body(start: usize, lines: &[&str]) -> String {
    let signature = lines[start];
    let indent_len = signature.len() - signature.trim_start().len();
    let indent = &signature[..indent_len];

    let mut body = String::from(signature);
    body.push('\n');

    for line in &lines[start + 1..] {
        if line.starts_with(indent) && !line.trim().is_empty() {
            body.push_str(line);
            body.push('\n');
        } else {
            break;
        }
    }

    body
}
