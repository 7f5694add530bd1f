//! Unicode-aware word tokenization.
//!
//! Words are the fragments left after splitting on runs of whitespace and
//! punctuation (Unicode general category `P`). Dashes are punctuation, so
//! `Foo-bar` is two words. Symbols such as `$` or `+` are not separators.

use std::sync::LazyLock;

use regex::Regex;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\p{P}]+").expect("Invalid separator regex"));

/// Split content into word tokens.
pub fn tokenize(content: &str) -> Vec<String> {
    words(content).map(str::to_string).collect()
}

/// Count word tokens without allocating them.
pub fn word_count(content: &str) -> usize {
    words(content).count()
}

fn words(content: &str) -> impl Iterator<Item = &str> {
    SEPARATORS
        .split(content)
        .filter(|fragment| !fragment.is_empty())
}
