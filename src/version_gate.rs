//! Minimum-Python-version resolution from a repository's `setup.py`.
//!
//! Parses the manifest with tree-sitter (a real syntax tree, not a regex over
//! the whole file), finds the first top-level `setup(...)` call, and pulls the
//! lower bound out of its `python_requires` keyword argument. Every failure
//! path — unparseable source, no `setup` call, no `python_requires`, a
//! non-literal value, no `>=` clause — is a normal negative result, not an
//! error.

use regex::Regex;
use std::sync::OnceLock;
use tree_sitter::{Node, Parser};

fn lower_bound_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r">=\s*([0-9.]+)").unwrap())
}

/// Extract the declared minimum Python version from `setup.py` text.
///
/// Returns the digits-and-dots version string from a `>=` clause of the
/// `python_requires` keyword, or `None` if no constraint is found.
pub fn min_python_version(manifest: &str) -> Option<String> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .ok()?;
    let tree = parser.parse(manifest, None)?;

    let setup_call = find_setup_call(tree.root_node(), manifest)?;
    let value = keyword_argument(setup_call, "python_requires", manifest)?;

    // Only a string literal counts as a declared constraint.
    if value.kind() != "string" {
        return None;
    }

    let literal = value.utf8_text(manifest.as_bytes()).ok()?;
    lower_bound_pattern()
        .captures(literal)
        .map(|c| c[1].to_string())
}

/// Decide whether a resolved version clears the configured threshold.
///
/// Plain lexical string comparison: `"3.10.0"` compares below `"3.9.0"` even
/// though it is numerically newer. Switching to a numeric comparison would
/// change which repositories enter the corpus.
pub fn version_eligible(found: &str, threshold: &str) -> bool {
    found > threshold
}

/// Find the first module-level expression statement calling `setup`.
fn find_setup_call<'a>(root: Node<'a>, src: &str) -> Option<Node<'a>> {
    let mut cursor = root.walk();
    for stmt in root.named_children(&mut cursor) {
        if stmt.kind() != "expression_statement" {
            continue;
        }
        let call = match stmt.named_child(0) {
            Some(c) => c,
            None => continue,
        };
        if call.kind() != "call" {
            continue;
        }
        let func = match call.child_by_field_name("function") {
            Some(f) => f,
            None => continue,
        };
        if func.kind() == "identifier" && func.utf8_text(src.as_bytes()) == Ok("setup") {
            return Some(call);
        }
    }
    None
}

/// Scan a call's arguments for a keyword argument by name.
fn keyword_argument<'a>(call: Node<'a>, name: &str, src: &str) -> Option<Node<'a>> {
    let args = call.child_by_field_name("arguments")?;
    let mut cursor = args.walk();
    for arg in args.named_children(&mut cursor) {
        if arg.kind() != "keyword_argument" {
            continue;
        }
        let key = match arg.child_by_field_name("name") {
            Some(k) => k,
            None => continue,
        };
        if key.utf8_text(src.as_bytes()) == Ok(name) {
            return arg.child_by_field_name("value");
        }
    }
    None
}
