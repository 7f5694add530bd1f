//! Input options for script analysis.
//!
//! This module contains the configuration types that control which files
//! are analyzed and how results are laid out.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

/// Default script file extension.
pub const DEFAULT_EXTENSION: &str = "nani";

/// Options for walking and analyzing a script tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeOptions {
    /// Script file extension, without the dot (compared case-insensitively)
    pub extension: String,
    /// Directory names skipped entirely (exact match)
    pub exclude: BTreeSet<String>,
    /// Maximum directory depth below the root (`None` = unlimited)
    pub max_depth: Option<usize>,
    /// Analyze the files of each directory level in parallel
    pub parallel: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            exclude: BTreeSet::new(),
            max_depth: None,
            parallel: true,
        }
    }
}

impl AnalyzeOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the script extension. A leading dot is ignored.
    pub fn extension(mut self, ext: &str) -> Self {
        self.extension = ext.trim_start_matches('.').to_string();
        self
    }

    /// Skip directories with this exact name.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.exclude.insert(name.into());
        self
    }

    /// Skip directories with any of these names.
    pub fn exclude_many<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(names.into_iter().map(Into::into));
        self
    }

    /// Limit how deep the walk descends.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Enable or disable parallel file analysis.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Whether a directory with this name is excluded.
    pub fn is_excluded(&self, dir_name: &str) -> bool {
        self.exclude.contains(dir_name)
    }

    /// Whether a file path has the script extension.
    pub fn is_script(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(&self.extension))
    }
}

/// How a result tree is laid out for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Layout {
    /// Only the total
    #[default]
    Total,
    /// One row per script file
    ByFile,
    /// The directory tree, directories before files
    Tree,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "total" => Ok(Layout::Total),
            "file" | "files" | "by-file" => Ok(Layout::ByFile),
            "tree" => Ok(Layout::Tree),
            _ => Err(format!("Unknown layout: {}", s)),
        }
    }
}
