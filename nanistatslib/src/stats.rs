//! Core data structures for script statistics

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::path::PathBuf;

/// Statistics for one script file or a merged set of files.
///
/// Merging (`+`, `+=`, [`Sum`]) adds every counter, unions `speakers` and
/// concatenates `words`. A speaker who appears in several files is therefore
/// counted once in the merged value while each file still lists it.
/// Merging is associative and commutative for everything except the order of
/// `words`, which only affects presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStats {
    /// Number of script files that contributed
    pub file_count: u64,
    /// Characters of spoken/narrated text, markup and speaker labels excluded
    pub body_char_count: u64,
    /// Word tokens in the same text
    pub word_count: u64,
    /// Distinct speaker identifiers
    pub speakers: BTreeSet<String>,
    /// Every word token, duplicates retained
    pub words: Vec<String>,
    /// Content lines attributed to a speaker
    pub dialogue_lines: u64,
    /// Content lines without a speaker
    pub narration_lines: u64,
    /// Blank, command, label and comment lines, and lines that were only markup
    pub skipped_lines: u64,
}

/// Merged statistics for a directory subtree.
pub type AggregateStats = ScriptStats;

impl ScriptStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct speakers
    pub fn speaker_count(&self) -> u64 {
        self.speakers.len() as u64
    }

    /// Distinct words, deduplicated for display
    pub fn unique_words(&self) -> BTreeSet<&str> {
        self.words.iter().map(String::as_str).collect()
    }

    /// Content lines of either kind
    pub fn content_lines(&self) -> u64 {
        self.dialogue_lines + self.narration_lines
    }

    /// Whether nothing was counted
    pub fn is_empty(&self) -> bool {
        self.file_count == 0 && self.content_lines() == 0 && self.skipped_lines == 0
    }

    /// Merge another value into this one without consuming it.
    pub fn merge(&mut self, other: &ScriptStats) {
        self.file_count += other.file_count;
        self.body_char_count += other.body_char_count;
        self.word_count += other.word_count;
        self.speakers.extend(other.speakers.iter().cloned());
        self.words.extend(other.words.iter().cloned());
        self.dialogue_lines += other.dialogue_lines;
        self.narration_lines += other.narration_lines;
        self.skipped_lines += other.skipped_lines;
    }
}

impl Add for ScriptStats {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl AddAssign for ScriptStats {
    fn add_assign(&mut self, other: Self) {
        self.file_count += other.file_count;
        self.body_char_count += other.body_char_count;
        self.word_count += other.word_count;
        self.speakers.extend(other.speakers);
        self.words.extend(other.words);
        self.dialogue_lines += other.dialogue_lines;
        self.narration_lines += other.narration_lines;
        self.skipped_lines += other.skipped_lines;
    }
}

impl Sum for ScriptStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::new(), Add::add)
    }
}

/// Statistics for a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    /// Path to the file
    pub path: PathBuf,
    /// Statistics for this file
    pub stats: ScriptStats,
}

impl FileStats {
    /// Create new file stats
    pub fn new(path: PathBuf, stats: ScriptStats) -> Self {
        Self { path, stats }
    }
}

/// Whether a tree node is a directory or a script file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

/// One node of an analyzed tree.
///
/// A directory's `stats` is the merge of all of its children. Children are
/// kept in directory-listing order; sorting for display happens elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsNode {
    /// File or directory name
    pub name: String,
    /// Full path
    pub path: PathBuf,
    /// Directory or file
    pub kind: NodeKind,
    /// Statistics for this node (merged subtree for directories)
    pub stats: ScriptStats,
    /// Set when a file could not be read or decoded
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unreadable: bool,
    /// Child nodes (always empty for files)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StatsNode>,
}

impl StatsNode {
    /// Create an empty directory node
    pub fn directory(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            path,
            kind: NodeKind::Directory,
            stats: ScriptStats::new(),
            unreadable: false,
            children: Vec::new(),
        }
    }

    /// Create a file node
    pub fn file(name: impl Into<String>, path: PathBuf, stats: ScriptStats) -> Self {
        Self {
            name: name.into(),
            path,
            kind: NodeKind::File,
            stats,
            unreadable: false,
            children: Vec::new(),
        }
    }

    /// Whether this node is a directory
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Attach a child and merge its stats into this node
    pub fn add_child(&mut self, child: StatsNode) {
        self.stats.merge(&child.stats);
        self.children.push(child);
    }

    /// All file nodes in this subtree, depth-first in listing order
    pub fn files(&self) -> Vec<FileStats> {
        let mut files = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node.kind {
                NodeKind::File => files.push(FileStats::new(node.path.clone(), node.stats.clone())),
                NodeKind::Directory => stack.extend(node.children.iter().rev()),
            }
        }
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stats(chars: u64, words: &[&str], speakers: &[&str]) -> ScriptStats {
        ScriptStats {
            file_count: 1,
            body_char_count: chars,
            word_count: words.len() as u64,
            speakers: speakers.iter().map(|s| s.to_string()).collect(),
            words: words.iter().map(|s| s.to_string()).collect(),
            dialogue_lines: speakers.len() as u64,
            narration_lines: 1,
            skipped_lines: 2,
        }
    }

    #[test]
    fn test_default_is_empty() {
        let s = ScriptStats::new();
        assert!(s.is_empty());
        assert_eq!(s.speaker_count(), 0);
        assert!(s.unique_words().is_empty());
    }

    #[test]
    fn test_add_sums_counts_and_unions_speakers() {
        let a = stats(10, &["a", "b"], &["Kohaku", "Yuko"]);
        let b = stats(5, &["a"], &["Kohaku"]);

        let sum = a + b;
        assert_eq!(sum.file_count, 2);
        assert_eq!(sum.body_char_count, 15);
        assert_eq!(sum.word_count, 3);
        assert_eq!(sum.speaker_count(), 2);
        assert_eq!(sum.words, vec!["a", "b", "a"]);
        assert_eq!(sum.unique_words().len(), 2);
        assert_eq!(sum.skipped_lines, 4);
        assert_eq!(sum.content_lines(), 5);
    }

    #[test]
    fn test_merge_matches_add_assign() {
        let a = stats(3, &["x"], &["A"]);
        let b = stats(4, &["y"], &["B"]);

        let mut by_ref = a.clone();
        by_ref.merge(&b);
        let mut by_value = a;
        by_value += b;

        assert_eq!(by_ref, by_value);
    }

    #[test]
    fn test_same_speaker_in_five_files_counts_once() {
        let files: Vec<ScriptStats> = (0..5).map(|_| stats(1, &["hi"], &["Kohaku"])).collect();
        for f in &files {
            assert!(f.speakers.contains("Kohaku"));
        }

        let total: ScriptStats = files.into_iter().sum();
        assert_eq!(total.speaker_count(), 1);
        assert_eq!(total.file_count, 5);
        assert_eq!(total.word_count, 5);
    }

    #[test]
    fn test_node_add_child_and_files() {
        let mut root = StatsNode::directory("root", PathBuf::from("root"));
        let mut sub = StatsNode::directory("sub", PathBuf::from("root/sub"));
        sub.add_child(StatsNode::file(
            "b.nani",
            PathBuf::from("root/sub/b.nani"),
            stats(2, &["b"], &["B"]),
        ));
        root.add_child(StatsNode::file(
            "a.nani",
            PathBuf::from("root/a.nani"),
            stats(1, &["a"], &["A"]),
        ));
        root.add_child(sub);

        assert_eq!(root.stats.file_count, 2);
        assert_eq!(root.stats.body_char_count, 3);
        let files = root.files();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, PathBuf::from("root/a.nani"));
        assert_eq!(files[1].path, PathBuf::from("root/sub/b.nani"));
    }

    fn arb_stats() -> impl Strategy<Value = ScriptStats> {
        (
            0u64..1000,
            prop::collection::vec("[a-c]", 0..4),
            prop::collection::btree_set("[A-D]", 0..3),
            0u64..20,
        )
            .prop_map(|(chars, words, speakers, skipped)| ScriptStats {
                file_count: 1,
                body_char_count: chars,
                word_count: words.len() as u64,
                speakers,
                words,
                dialogue_lines: 0,
                narration_lines: 1,
                skipped_lines: skipped,
            })
    }

    /// Everything except word order, which merging does not promise to keep.
    fn canonical(mut s: ScriptStats) -> ScriptStats {
        s.words.sort();
        s
    }

    proptest! {
        #[test]
        fn prop_merge_is_associative_and_commutative(
            a in arb_stats(),
            b in arb_stats(),
            c in arb_stats(),
        ) {
            let left = (a.clone() + b.clone()) + c.clone();
            let right = a.clone() + (b.clone() + c.clone());
            prop_assert_eq!(&left, &right);

            let swapped = c + b + a;
            prop_assert_eq!(canonical(left), canonical(swapped));
        }

        #[test]
        fn prop_grouping_does_not_change_totals(
            files in prop::collection::vec(arb_stats(), 0..8),
            split in 0usize..8,
        ) {
            let split = split.min(files.len());
            let whole: ScriptStats = files.iter().cloned().sum();
            let first: ScriptStats = files[..split].iter().cloned().sum();
            let second: ScriptStats = files[split..].iter().cloned().sum();
            prop_assert_eq!(first + second, whole);
        }
    }
}
