use std::sync::LazyLock;

use regex::Regex;

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>(.*?)</think>").expect("think block regex is valid"));

/// Separate `<think>…</think>` blocks from the visible answer.
///
/// Returns the visible text with blocks removed and the trimmed, non-empty
/// block contents in order of appearance.
#[must_use]
pub fn split_thoughts(content: &str) -> (String, Vec<String>) {
    let thoughts = THINK_BLOCK
        .captures_iter(content)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|t| !t.is_empty())
        .collect();
    let visible = THINK_BLOCK.replace_all(content, "").trim().to_owned();
    (visible, thoughts)
}
