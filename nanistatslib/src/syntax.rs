//! Line classification for Naninovel scripts.
//!
//! A script mixes prose with lines that are pure syntax: commands (`@bgm`),
//! labels (`# Intro`) and comments (`; note`). Only prose lines count towards
//! statistics; everything else is tallied as skipped.

use serde::{Deserialize, Serialize};

/// Why a line was excluded from statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    /// Empty or whitespace-only line
    Blank,
    /// Command line, e.g. `@choice "Option"`
    Command,
    /// Label line, e.g. `# Chapter1`
    Label,
    /// Comment line, e.g. `; TODO rewrite`
    Comment,
}

/// Classification of a single raw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    /// Dialogue or narration
    Content,
    /// Syntax that never contributes to counts
    Skip(SkipReason),
}

impl LineKind {
    /// Whether this line is excluded from statistics.
    pub fn is_skip(&self) -> bool {
        matches!(self, LineKind::Skip(_))
    }
}

/// Leading sigils that mark a non-content line.
pub const SIGILS: &[(char, SkipReason)] = &[
    ('@', SkipReason::Command),
    ('#', SkipReason::Label),
    (';', SkipReason::Comment),
];

/// Classify a raw line as content or skip.
///
/// Surrounding whitespace is ignored, so `"  @wait 1"` and `"@wait 1\r"`
/// classify the same way.
pub fn classify(line: &str) -> LineKind {
    let trimmed = line.trim();

    let Some(first) = trimmed.chars().next() else {
        return LineKind::Skip(SkipReason::Blank);
    };

    SIGILS
        .iter()
        .find(|(sigil, _)| *sigil == first)
        .map_or(LineKind::Content, |(_, reason)| LineKind::Skip(*reason))
}
