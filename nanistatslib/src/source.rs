//! Injected file-system capabilities.
//!
//! The analyzer never touches the file system directly. It lists directories
//! and reads files through a [`ScriptSource`], so hosts can plug in an editor's
//! virtual file system and tests can use an in-memory tree.
//!
//! - [`FsSource`]: the real file system, listed with `walkdir`
//! - [`MemorySource`]: an in-memory tree of byte blobs

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One direct child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Full path of the entry
    pub path: PathBuf,
    /// Final path component
    pub name: String,
    /// Directory or file
    pub kind: EntryKind,
}

impl Entry {
    /// Create an entry, taking the name from the last path component.
    pub fn new(path: PathBuf, kind: EntryKind) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name, kind }
    }
}

/// Directory listing and file reading, as used by the analyzer.
///
/// Implementations must be shareable across threads because files of one
/// directory level may be read concurrently.
pub trait ScriptSource: Sync {
    /// List the direct children of `dir`, in the order they should be processed.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<Entry>>;

    /// Read the full contents of a file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// A stable identity for a directory, used to detect cycles.
    ///
    /// Two paths that reach the same directory (through symlinks, say) must
    /// return the same identity.
    fn identity(&self, dir: &Path) -> PathBuf {
        dir.to_path_buf()
    }
}

/// The real file system.
///
/// Symlinks are followed; [`ScriptSource::identity`] canonicalizes so a link
/// back to an ancestor is recognized as already visited.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl FsSource {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptSource for FsSource {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        let mut entries = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    // An unreadable root is a listing failure; a broken child
                    // (dangling symlink) is just left out.
                    if err.depth() == 0 {
                        return Err(err
                            .into_io_error()
                            .unwrap_or_else(|| io::Error::other("directory walk failed")));
                    }
                    tracing::debug!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            let kind = if entry.file_type().is_dir() {
                EntryKind::Directory
            } else if entry.file_type().is_file() {
                EntryKind::File
            } else {
                continue;
            };
            entries.push(Entry::new(entry.into_path(), kind));
        }

        Ok(entries)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn identity(&self, dir: &Path) -> PathBuf {
        std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
    }
}

/// An in-memory tree of files.
///
/// Directories are implied by file paths and can also be added empty.
/// Listing is sorted by name; a path registered with
/// [`MemorySource::fail_listing`] returns an error when listed.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    failing_dirs: BTreeSet<PathBuf>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given contents, creating parent directories.
    pub fn file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.files.insert(path, contents.into());
        self
    }

    /// Add an empty directory.
    pub fn dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.dirs.insert(path);
        self
    }

    /// Make listing `path` fail.
    pub fn fail_listing(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing_dirs.insert(path.into());
        self
    }

    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(dir) = parent {
            if dir.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(dir.to_path_buf());
            parent = dir.parent();
        }
    }
}

impl ScriptSource for MemorySource {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        if self.failing_dirs.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("listing {} failed", dir.display()),
            ));
        }
        if !self.dirs.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", dir.display()),
            ));
        }

        let is_child = |p: &&PathBuf| p.parent() == Some(dir);
        let mut entries: Vec<Entry> = self
            .dirs
            .iter()
            .filter(is_child)
            .map(|p| Entry::new(p.clone(), EntryKind::Directory))
            .chain(
                self.files
                    .keys()
                    .filter(is_child)
                    .map(|p| Entry::new(p.clone(), EntryKind::File)),
            )
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }
}
