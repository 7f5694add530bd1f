//! Speaker/content separation for normalized lines.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `Speaker: text` at the start of a line. The speaker token is one or more
/// characters that are neither a colon nor whitespace, optionally ending in
/// a `.Appearance` suffix.
static SPEAKER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*([^:\s]+)\s*:\s*(.*)$").expect("Invalid speaker regex"));

/// A content line split into an optional speaker and the spoken text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLine {
    /// Speaker identifier, present for `Speaker: text` lines
    pub speaker: Option<String>,
    /// Appearance from a `Speaker.Appearance: text` prefix
    pub appearance: Option<String>,
    /// Spoken or narrated text, trimmed
    pub content: String,
}

impl ParsedLine {
    /// Whether the line is attributed to a speaker.
    pub fn is_dialogue(&self) -> bool {
        self.speaker.is_some()
    }
}

/// Split a normalized line into speaker and content.
///
/// Lines without a speaker prefix are narration: the whole trimmed line is
/// the content. An appearance suffix (`Kohaku.Happy:`) is split off, so one
/// character in several appearances is still one speaker.
pub fn parse_line(line: &str) -> ParsedLine {
    if let Some(caps) = SPEAKER_LINE.captures(line) {
        let (speaker, appearance) = match caps[1].split_once('.') {
            Some((speaker, appearance)) => (speaker, Some(appearance)),
            None => (&caps[1], None),
        };
        if !speaker.is_empty() {
            return ParsedLine {
                speaker: Some(speaker.to_string()),
                appearance: appearance
                    .filter(|a| !a.is_empty())
                    .map(str::to_string),
                content: caps[2].trim().to_string(),
            };
        }
    }

    ParsedLine {
        speaker: None,
        appearance: None,
        content: line.trim().to_string(),
    }
}
