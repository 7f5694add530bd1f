//! Recursive aggregation over a directory tree.
//!
//! This module provides the main entry points for analyzing a tree of
//! script files. The walk uses an explicit stack of directory frames instead
//! of recursion, and a visited set keyed by [`ScriptSource::identity`] so a
//! symlink back to an ancestor cannot loop forever.
//!
//! Failures never abort a walk: an unreadable file contributes zero, a
//! directory that cannot be listed is an empty subtree. Only
//! [`analyze_workspace`] can fail, when its root does not exist.

use std::collections::HashSet;
use std::mem;
use std::path::Path;

use rayon::prelude::*;

use crate::analyzer::analyze_file_with;
use crate::cache::StatsCache;
use crate::error::NanistatsError;
use crate::options::AnalyzeOptions;
use crate::source::{Entry, EntryKind, FsSource, ScriptSource};
use crate::stats::{AggregateStats, StatsNode};
use crate::Result;

/// Aggregate statistics for every script under `root`.
///
/// Counts are summed across files; speakers are unioned, so a speaker who
/// appears in many files is counted once.
pub fn aggregate(
    root: &Path,
    options: &AnalyzeOptions,
    source: &dyn ScriptSource,
) -> AggregateStats {
    aggregate_tree(root, options, source).stats
}

/// Analyze the tree under `root`, keeping per-directory and per-file results.
pub fn aggregate_tree(
    root: &Path,
    options: &AnalyzeOptions,
    source: &dyn ScriptSource,
) -> StatsNode {
    walk(root, options, source, None)
}

/// Like [`aggregate_tree`], reusing results from `cache` for unchanged files.
pub fn aggregate_tree_cached(
    root: &Path,
    options: &AnalyzeOptions,
    source: &dyn ScriptSource,
    cache: &StatsCache,
) -> StatsNode {
    walk(root, options, source, Some(cache))
}

/// Analyze a path on the real file system.
///
/// A directory is walked with [`aggregate_tree`]; a single file is analyzed
/// on its own whatever its extension.
///
/// # Example
///
/// ```rust,ignore
/// use nanistatslib::{analyze_workspace, AnalyzeOptions};
///
/// let options = AnalyzeOptions::new().exclude("Backup");
/// let tree = analyze_workspace("Assets/Scripts", &options)?;
/// println!("{} unique speakers", tree.stats.speaker_count());
/// ```
pub fn analyze_workspace(root: impl AsRef<Path>, options: &AnalyzeOptions) -> Result<StatsNode> {
    analyze_root(root.as_ref(), options, None)
}

/// Like [`analyze_workspace`], reusing results from `cache` for unchanged files.
pub fn analyze_workspace_cached(
    root: impl AsRef<Path>,
    options: &AnalyzeOptions,
    cache: &StatsCache,
) -> Result<StatsNode> {
    analyze_root(root.as_ref(), options, Some(cache))
}

fn analyze_root(
    root: &Path,
    options: &AnalyzeOptions,
    cache: Option<&StatsCache>,
) -> Result<StatsNode> {
    if !root.exists() {
        return Err(NanistatsError::RootNotFound(root.to_path_buf()));
    }

    let source = FsSource::new();
    if root.is_file() {
        let entry = Entry::new(root.to_path_buf(), EntryKind::File);
        return Ok(analyze_entry(&entry, &source, cache));
    }

    Ok(walk(root, options, &source, cache))
}

/// Work still to do in a directory, in listing order.
enum Pending {
    Dir(Entry),
    File(StatsNode),
}

struct Frame {
    node: StatsNode,
    pending: std::vec::IntoIter<Pending>,
    depth: usize,
}

fn walk(
    root: &Path,
    options: &AnalyzeOptions,
    source: &dyn ScriptSource,
    cache: Option<&StatsCache>,
) -> StatsNode {
    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    let mut visited = HashSet::new();
    visited.insert(source.identity(root));

    let mut stack: Vec<Frame> = Vec::new();
    let mut current = open_frame(root, root_name, 0, options, source, cache);

    loop {
        match current.pending.next() {
            Some(Pending::File(node)) => current.node.add_child(node),
            Some(Pending::Dir(entry)) => {
                let depth = current.depth + 1;
                if options.is_excluded(&entry.name) {
                    tracing::debug!(path = %entry.path.display(), "excluded directory");
                    continue;
                }
                if options.max_depth.is_some_and(|max| depth > max) {
                    tracing::debug!(path = %entry.path.display(), depth, "max depth reached");
                    continue;
                }
                if !visited.insert(source.identity(&entry.path)) {
                    tracing::debug!(path = %entry.path.display(), "directory already visited");
                    continue;
                }

                let child = open_frame(&entry.path, entry.name, depth, options, source, cache);
                stack.push(mem::replace(&mut current, child));
            }
            None => match stack.pop() {
                Some(mut parent) => {
                    parent.node.add_child(current.node);
                    current = parent;
                }
                None => {
                    tracing::debug!(
                        root = %root.display(),
                        files = current.node.stats.file_count,
                        "aggregation finished"
                    );
                    return current.node;
                }
            },
        }
    }
}

/// List a directory and analyze its script files.
///
/// Files are analyzed up front (in parallel when enabled) and slotted back
/// into listing order; subdirectories are left for the walk to open.
fn open_frame(
    dir: &Path,
    name: String,
    depth: usize,
    options: &AnalyzeOptions,
    source: &dyn ScriptSource,
    cache: Option<&StatsCache>,
) -> Frame {
    let entries = match source.list_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(path = %dir.display(), error = %err, "failed to list directory");
            Vec::new()
        }
    };

    let scripts: Vec<&Entry> = entries
        .iter()
        .filter(|e| e.kind == EntryKind::File && options.is_script(&e.path))
        .collect();

    let analyzed: Vec<StatsNode> = if options.parallel && scripts.len() > 1 {
        scripts
            .par_iter()
            .map(|entry| analyze_entry(entry, source, cache))
            .collect()
    } else {
        scripts
            .iter()
            .map(|entry| analyze_entry(entry, source, cache))
            .collect()
    };

    let mut analyzed = analyzed.into_iter();
    let pending: Vec<Pending> = entries
        .into_iter()
        .filter_map(|entry| match entry.kind {
            EntryKind::Directory => Some(Pending::Dir(entry)),
            EntryKind::File if options.is_script(&entry.path) => {
                analyzed.next().map(Pending::File)
            }
            EntryKind::File => None,
        })
        .collect();

    Frame {
        node: StatsNode::directory(name, dir.to_path_buf()),
        pending: pending.into_iter(),
        depth,
    }
}

fn analyze_entry(
    entry: &Entry,
    source: &dyn ScriptSource,
    cache: Option<&StatsCache>,
) -> StatsNode {
    let analysis = analyze_file_with(&entry.path, source, cache);
    let mut node = StatsNode::file(entry.name.clone(), entry.path.clone(), analysis.stats);
    node.unreadable = analysis.unreadable;
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze_text;
    use crate::source::MemorySource;
    use crate::stats::{NodeKind, ScriptStats};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn project() -> MemorySource {
        MemorySource::new()
            .file("game/Intro.nani", "# Start\nKohaku: Hello there.\nThe sun rose.\n")
            .file("game/notes.txt", "Kohaku: not a script\n")
            .file("game/ch1/Scene1.nani", "Kohaku: Again!\nYuko: Hi.\n@wait 1\n")
            .file("game/ch1/Scene2.nani", "Yuko: Bye-bye.\n")
            .file("game/Backup/Old.nani", "Ghost: Should not count.\n")
    }

    #[test]
    fn test_aggregate_sums_and_unions() {
        let options = AnalyzeOptions::new().exclude("Backup");
        let total = aggregate(Path::new("game"), &options, &project());

        assert_eq!(total.file_count, 3);
        assert_eq!(
            total.speakers.iter().collect::<Vec<_>>(),
            vec!["Kohaku", "Yuko"]
        );
        // Hello there / The sun rose / Again / Hi / Bye bye
        assert_eq!(total.word_count, 2 + 3 + 1 + 1 + 2);
        assert_eq!(total.skipped_lines, 2);
        assert!(!total.speakers.contains("Ghost"));
    }

    #[test]
    fn test_tree_shape_follows_listing_order() {
        let options = AnalyzeOptions::new();
        let tree = aggregate_tree(Path::new("game"), &options, &project());

        assert_eq!(tree.kind, NodeKind::Directory);
        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Backup", "Intro.nani", "ch1"]);

        let ch1 = &tree.children[2];
        assert_eq!(ch1.stats.file_count, 2);
        assert_eq!(ch1.children.len(), 2);
        assert!(ch1.children.iter().all(|c| c.kind == NodeKind::File));
        assert!(tree.stats.speakers.contains("Ghost"));
    }

    #[test]
    fn test_directory_totals_equal_sum_of_files() {
        let source = project();
        let options = AnalyzeOptions::new();
        let tree = aggregate_tree(Path::new("game"), &options, &source);

        let by_file: ScriptStats = tree.files().into_iter().map(|f| f.stats).sum();
        assert_eq!(by_file, tree.stats);

        // Regrouping: each subtree aggregated separately then merged
        let root_files = aggregate(Path::new("game"), &options.clone().max_depth(0), &source);
        let ch1 = aggregate(Path::new("game/ch1"), &options, &source);
        let backup = aggregate(Path::new("game/Backup"), &options, &source);
        let regrouped = root_files + backup + ch1;
        assert_eq!(regrouped.file_count, tree.stats.file_count);
        assert_eq!(regrouped.word_count, tree.stats.word_count);
        assert_eq!(regrouped.body_char_count, tree.stats.body_char_count);
        assert_eq!(regrouped.speakers, tree.stats.speakers);
    }

    #[test]
    fn test_same_speaker_in_five_files() {
        let mut source = MemorySource::new();
        for i in 0..5 {
            source = source.file(format!("root/d{i}/s.nani"), "Kohaku: line\n");
        }

        let tree = aggregate_tree(Path::new("root"), &AnalyzeOptions::new(), &source);
        assert_eq!(tree.stats.speakers.len(), 1);
        assert_eq!(tree.stats.file_count, 5);
        for file in tree.files() {
            assert!(file.stats.speakers.contains("Kohaku"));
        }
    }

    #[test]
    fn test_excluded_subtree_is_zero() {
        let source = MemorySource::new().file("root/Drafts/a.nani", "A: words here\n");
        let options = AnalyzeOptions::new().exclude("Drafts");

        let total = aggregate(Path::new("root"), &options, &source);
        assert_eq!(total.body_char_count, 0);
        assert_eq!(total.word_count, 0);
        assert!(total.speakers.is_empty());
        assert!(total.is_empty());
    }

    #[test]
    fn test_empty_directory() {
        let source = MemorySource::new().dir("root/empty");
        let tree = aggregate_tree(Path::new("root"), &AnalyzeOptions::new(), &source);
        assert!(tree.stats.is_empty());
        assert_eq!(tree.children.len(), 1);
    }

    #[test]
    fn test_undecodable_file_contributes_zero() {
        let source = MemorySource::new()
            .file("root/a.nani", "A: one two\n")
            .file("root/bad.nani", vec![0xffu8, 0xfe, 0xfd])
            .file("root/c.nani", "C: three\n");

        let tree = aggregate_tree(Path::new("root"), &AnalyzeOptions::new(), &source);
        let siblings = analyze_text("A: one two\n") + analyze_text("C: three\n");
        assert_eq!(tree.stats, siblings);

        let bad = tree.children.iter().find(|c| c.name == "bad.nani").unwrap();
        assert!(bad.unreadable);
        assert_eq!(bad.stats, ScriptStats::default());
    }

    #[test]
    fn test_listing_failure_is_empty_subtree() {
        let source = MemorySource::new()
            .file("root/ok/a.nani", "A: fine\n")
            .file("root/locked/b.nani", "B: hidden\n")
            .fail_listing("root/locked");

        let total = aggregate(Path::new("root"), &AnalyzeOptions::new(), &source);
        assert_eq!(total.file_count, 1);
        assert!(total.speakers.contains("A"));

        let root_fails = source.clone().fail_listing("root");
        let total = aggregate(Path::new("root"), &AnalyzeOptions::new(), &root_fails);
        assert!(total.is_empty());
    }

    #[test]
    fn test_max_depth() {
        let source = MemorySource::new()
            .file("root/a.nani", "A: x\n")
            .file("root/one/b.nani", "B: x\n")
            .file("root/one/two/c.nani", "C: x\n");

        let depth0 = aggregate(Path::new("root"), &AnalyzeOptions::new().max_depth(0), &source);
        let depth1 = aggregate(Path::new("root"), &AnalyzeOptions::new().max_depth(1), &source);
        let all = aggregate(Path::new("root"), &AnalyzeOptions::new(), &source);
        assert_eq!(depth0.file_count, 1);
        assert_eq!(depth1.file_count, 2);
        assert_eq!(all.file_count, 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut source = MemorySource::new();
        for i in 0..20 {
            source = source.file(
                format!("root/s{i:02}.nani"),
                format!("Speaker{}: line number {i}\n", i % 3),
            );
        }

        let parallel = aggregate_tree(Path::new("root"), &AnalyzeOptions::new(), &source);
        let sequential = aggregate_tree(
            Path::new("root"),
            &AnalyzeOptions::new().parallel(false),
            &source,
        );
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_cached_walk_matches_and_populates_cache() {
        let source = project();
        let cache = StatsCache::new();
        let options = AnalyzeOptions::new();

        let plain = aggregate_tree(Path::new("game"), &options, &source);
        let first = aggregate_tree_cached(Path::new("game"), &options, &source, &cache);
        let second = aggregate_tree_cached(Path::new("game"), &options, &source, &cache);

        assert_eq!(plain, first);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 4);
        assert!(cache.contains(Path::new("game/ch1/Scene1.nani")));
    }

    #[test]
    fn test_analyze_workspace_on_disk() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("scripts/Backup")).unwrap();
        fs::write(temp.path().join("scripts/a.nani"), "Kohaku: Hello, world!\n").unwrap();
        fs::write(temp.path().join("scripts/Backup/b.nani"), "Old: text\n").unwrap();

        let options = AnalyzeOptions::new().exclude("Backup");
        let tree = analyze_workspace(temp.path(), &options).unwrap();
        assert_eq!(tree.stats.file_count, 1);
        assert_eq!(tree.stats.word_count, 2);

        let file = analyze_workspace(temp.path().join("scripts/a.nani"), &options).unwrap();
        assert_eq!(file.kind, NodeKind::File);
        assert_eq!(file.stats.speakers.len(), 1);
    }

    #[test]
    fn test_analyze_workspace_missing_root() {
        let result = analyze_workspace("/nonexistent/nanistats/root", &AnalyzeOptions::new());
        match result {
            Err(NanistatsError::RootNotFound(path)) => {
                assert_eq!(path, PathBuf::from("/nonexistent/nanistats/root"));
            }
            other => panic!("Expected RootNotFound, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_terminates() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("root");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("sub/a.nani"), "A: hi\n").unwrap();
        std::os::unix::fs::symlink(&root, root.join("sub/loop")).unwrap();

        let tree = analyze_workspace(&root, &AnalyzeOptions::new()).unwrap();
        assert_eq!(tree.stats.file_count, 1);
    }
}
