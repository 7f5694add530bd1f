//! Inline markup removal.
//!
//! Naninovel prose lines carry rich-text tags and inline commands that are
//! not part of what the reader sees as words. [`normalize`] strips them,
//! leaving plain prose:
//!
//! - **Ruby**: `<ruby="かんじ">漢字</ruby>` keeps the base text `漢字`; the
//!   annotation is discarded.
//! - **Line breaks**: `<br>`, `<br/>` and `<br />` are removed without a
//!   separator, so `is<br/>a` becomes `isa`.
//! - **Formatting pairs**: `<color=#f00>red</color>`, `<b>..</b>`, `<size=40>..</size>`
//!   and the other tags in [`FORMAT_TAGS`] keep only their inner text.
//! - **Standalone tags**: `<sprite=3>`, `<alpha=#88>`, `<space=2em>` and the other
//!   tags in [`STANDALONE_TAGS`] are removed wherever they appear, open or close.
//! - **Inline commands**: `[i]`, `[wait 0.5]` and similar bracketed commands
//!   are removed entirely.
//!
//! Ruby runs first because it is the innermost markup in nested cases.
//! Tags that are unknown or have no matching close tag stay as literal text.

use std::sync::LazyLock;

use regex::Regex;

/// Formatting tags stripped as open/close pairs.
pub const FORMAT_TAGS: &[&str] = &[
    "color", "b", "i", "u", "s", "size", "sup", "sub", "mark", "font", "link", "style", "noparse",
];

/// Tags that need no closing partner (or are usually written without one).
pub const STANDALONE_TAGS: &[&str] = &[
    "sprite",
    "space",
    "pos",
    "alpha",
    "voffset",
    "cspace",
    "mspace",
    "indent",
    "line-height",
    "margin",
    "width",
];

static RUBY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<ruby\s*=\s*(?:"[^"]*"|'[^']*'|[^>]*)>(.*?)</ruby>"#)
        .expect("Invalid ruby regex")
});

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("Invalid line break regex"));

static STANDALONE: LazyLock<Regex> = LazyLock::new(|| {
    let names = STANDALONE_TAGS
        .iter()
        .map(|tag| regex::escape(tag))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)</?(?:{names})(?:[=\s][^<>]*)?/?>"))
        .expect("Invalid standalone tag regex")
});

static FORMAT_PAIRS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    FORMAT_TAGS
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?is)<{tag}(?:=[^>]*)?>(.*?)</{tag}>"))
                .expect("Invalid format tag regex")
        })
        .collect()
});

static INLINE_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\[\]]*\]").expect("Invalid inline command regex"));

/// Strip all inline markup from a content line.
///
/// Passes repeat until the text stops changing, which resolves nested pairs
/// and makes the function idempotent. Every pass that changes the text makes
/// it shorter, so the loop terminates.
pub fn normalize(line: &str) -> String {
    let mut current = line.to_string();
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_pass(line: &str) -> String {
    let text = RUBY.replace_all(line, "$1");
    let text = STANDALONE.replace_all(&text, "");
    let text = LINE_BREAK.replace_all(&text, "");

    let mut text = text.into_owned();
    for pair in FORMAT_PAIRS.iter() {
        if pair.is_match(&text) {
            text = pair.replace_all(&text, "$1").into_owned();
        }
    }

    INLINE_COMMAND.replace_all(&text, "").into_owned()
}
