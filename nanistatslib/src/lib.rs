//! # nanistatslib
//!
//! Dialogue statistics for Naninovel visual-novel scripts (`.nani` files).
//!
//! ## Overview
//!
//! A script mixes spoken lines, narration, commands, labels, comments and
//! inline rich-text markup. This library reduces it to what a reader sees
//! and counts it:
//!
//! - **Characters**: length of dialogue and narration text, markup and
//!   speaker labels excluded
//! - **Words**: tokens split on Unicode whitespace and punctuation
//! - **Speakers**: distinct `Speaker:` identifiers, unioned across files
//! - **Skipped lines**: commands (`@`), labels (`#`), comments (`;`) and blanks
//!
//! ## Pipeline
//!
//! Each line goes through [`classify`] → [`normalize`] → [`parse_line`] →
//! [`tokenize`]; [`analyze_text`] accumulates one file, and [`aggregate_tree`]
//! merges files over a directory tree. Counters are summed while speakers
//! are set-unioned, so a character who speaks in ten files is one speaker
//! in the total.
//!
//! File-system access goes through the [`ScriptSource`] trait. Unreadable
//! files and directories degrade to zero contributions; nothing inside a
//! walk returns an error.
//!
//! ## Example
//!
//! ```rust
//! use nanistatslib::{aggregate, AnalyzeOptions, MemorySource};
//! use std::path::Path;
//!
//! let source = MemorySource::new()
//!     .file("game/Intro.nani", "# Start\nKohaku: Today is<br/>a good day.\n")
//!     .file("game/ch1/Scene.nani", "@bgm Town\nKohaku: Hello, world!\n")
//!     .file("game/Backup/Old.nani", "Ghost: ignored\n");
//!
//! let options = AnalyzeOptions::new().exclude("Backup");
//! let total = aggregate(Path::new("game"), &options, &source);
//!
//! assert_eq!(total.file_count, 2);
//! assert_eq!(total.word_count, 6);
//! assert_eq!(total.speaker_count(), 1);
//! assert_eq!(total.skipped_lines, 2);
//! ```

pub mod aggregator;
pub mod analyzer;
pub mod cache;
pub mod error;
pub mod markup;
pub mod options;
pub mod parser;
pub mod source;
pub mod stats;
pub mod syntax;
pub mod table;
pub mod tokenizer;

pub use aggregator::{
    aggregate, aggregate_tree, aggregate_tree_cached, analyze_workspace, analyze_workspace_cached,
};
pub use analyzer::{analyze_bytes, analyze_file, analyze_text, FileAnalysis};
pub use cache::StatsCache;
pub use error::NanistatsError;
pub use markup::normalize;
pub use options::{AnalyzeOptions, Layout, DEFAULT_EXTENSION};
pub use parser::{parse_line, ParsedLine};
pub use source::{Entry, EntryKind, FsSource, MemorySource, ScriptSource};
pub use stats::{AggregateStats, FileStats, NodeKind, ScriptStats, StatsNode};
pub use syntax::{classify, LineKind, SkipReason};
pub use table::{format_thousands, StatsTable, TableRow};
pub use tokenizer::{tokenize, word_count};

/// Result type for nanistatslib operations
pub type Result<T> = std::result::Result<T, NanistatsError>;
