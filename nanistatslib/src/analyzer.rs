//! Per-file analysis: classify, normalize, parse and tokenize every line.

use std::path::Path;

use crate::cache::StatsCache;
use crate::markup::normalize;
use crate::parser::parse_line;
use crate::source::ScriptSource;
use crate::stats::ScriptStats;
use crate::syntax::classify;
use crate::tokenizer::tokenize;

/// Outcome of analyzing one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAnalysis {
    /// Statistics, zero-valued when the file was unreadable
    pub stats: ScriptStats,
    /// Set when the file could not be read or decoded
    pub unreadable: bool,
}

/// Analyze the text of one script.
pub fn analyze_text(text: &str) -> ScriptStats {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut stats = ScriptStats {
        file_count: 1,
        ..ScriptStats::default()
    };

    for line in text.lines() {
        if classify(line).is_skip() {
            stats.skipped_lines += 1;
            continue;
        }

        let parsed = parse_line(&normalize(line));
        if parsed.speaker.is_none() && parsed.content.is_empty() {
            // Only inline commands or tags, nothing a reader sees
            stats.skipped_lines += 1;
            continue;
        }

        let tokens = tokenize(&parsed.content);

        stats.body_char_count += parsed.content.chars().count() as u64;
        stats.word_count += tokens.len() as u64;
        stats.words.extend(tokens);

        match parsed.speaker {
            Some(speaker) if !speaker.is_empty() => {
                stats.dialogue_lines += 1;
                stats.speakers.insert(speaker);
            }
            _ => stats.narration_lines += 1,
        }
    }

    stats
}

/// Analyze raw file bytes. Returns `None` when they are not valid UTF-8.
pub fn analyze_bytes(bytes: &[u8]) -> Option<ScriptStats> {
    std::str::from_utf8(bytes).ok().map(analyze_text)
}

/// Analyze one file read through `source`.
///
/// Never fails: an unreadable or undecodable file contributes zero-valued
/// stats and is flagged as unreadable.
pub fn analyze_file(path: &Path, source: &dyn ScriptSource) -> FileAnalysis {
    analyze_file_with(path, source, None)
}

pub(crate) fn analyze_file_with(
    path: &Path,
    source: &dyn ScriptSource,
    cache: Option<&StatsCache>,
) -> FileAnalysis {
    let bytes = match source.read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to read script");
            return FileAnalysis::unreadable();
        }
    };

    let stats = match cache {
        Some(cache) => cache.get_or_analyze(path, &bytes),
        None => analyze_bytes(&bytes),
    };

    match stats {
        Some(stats) => FileAnalysis {
            stats,
            unreadable: false,
        },
        None => {
            tracing::warn!(path = %path.display(), "script is not valid UTF-8");
            FileAnalysis::unreadable()
        }
    }
}

impl FileAnalysis {
    fn unreadable() -> Self {
        Self {
            stats: ScriptStats::default(),
            unreadable: true,
        }
    }
}
