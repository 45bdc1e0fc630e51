//! Best-effort markdown stripping for clipboard and file export.
//!
//! This is not a markdown parser. Generated advice and letters use a small,
//! predictable subset of markdown; each construct is removed with a single
//! pass, and nested or malformed input may leave residue. That is accepted.

use std::sync::LazyLock;

use regex::Regex;

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s{0,3}#{1,6}\s+").unwrap());
static BOLD_STAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static BOLD_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__([^_]+)__").unwrap());
static ITALIC_STAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*\n]+)\*").unwrap());
// Word boundaries keep underscores inside identifiers (case_type) intact.
static ITALIC_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b_([^_\n]+)_\b").unwrap());
static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]*)`").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").unwrap());
static UNORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*+]\s+").unwrap());
static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+[.)]\s+").unwrap());
static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\s{0,3}>\s?)+").unwrap());
static EXCESS_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Reduce a markdown string to plain text.
///
/// Headings, emphasis, inline code and links keep their inner text; fenced
/// code blocks are dropped whole; list and blockquote markers are removed.
/// Runs of three or more newlines collapse to two, and the result is trimmed.
/// Idempotent on text that is already plain.
pub fn strip_markdown(text: &str) -> String {
    let text = HEADING.replace_all(text, "");
    let text = BOLD_STAR.replace_all(&text, "$1");
    let text = BOLD_UNDERSCORE.replace_all(&text, "$1");
    let text = ITALIC_STAR.replace_all(&text, "$1");
    let text = ITALIC_UNDERSCORE.replace_all(&text, "$1");
    let text = FENCED_CODE.replace_all(&text, "");
    let text = INLINE_CODE.replace_all(&text, "$1");
    let text = LINK.replace_all(&text, "$1");
    let text = UNORDERED_ITEM.replace_all(&text, "");
    let text = ORDERED_ITEM.replace_all(&text, "");
    let text = BLOCKQUOTE.replace_all(&text, "");
    let text = EXCESS_BLANK_LINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}
