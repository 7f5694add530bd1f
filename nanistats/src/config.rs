//! `nanistats.toml` configuration file.
//!
//! ```toml
//! extension = "nani"
//! exclude = ["Backup", "Drafts"]
//! max_depth = 32
//! parallel = true
//! ```
//!
//! Every key is optional. Command-line flags override file values, and
//! `--exclude` names are added to the file's list.

use std::fs;
use std::path::Path;

use nanistatslib::{AnalyzeOptions, NanistatsError};
use serde::Deserialize;

/// File looked up in the analyzed directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "nanistats.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub extension: Option<String>,
    pub exclude: Vec<String>,
    pub max_depth: Option<usize>,
    pub parallel: Option<bool>,
}

impl Config {
    /// Load a configuration file.
    pub fn load(path: &Path) -> nanistatslib::Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| NanistatsError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse configuration text; `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> nanistatslib::Result<Self> {
        toml::from_str(text).map_err(|e| NanistatsError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `nanistats.toml` from the analysis root (or the directory of a
    /// single-file root). A missing file yields the default configuration.
    pub fn discover(root: &Path) -> nanistatslib::Result<Self> {
        let dir = if root.is_file() { root.parent() } else { Some(root) };
        match dir.map(|d| d.join(CONFIG_FILE_NAME)) {
            Some(candidate) if candidate.is_file() => {
                tracing::info!(path = %candidate.display(), "using configuration file");
                Self::load(&candidate)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Convert into analysis options.
    pub fn into_options(self) -> AnalyzeOptions {
        let mut options = AnalyzeOptions::new().exclude_many(self.exclude);
        if let Some(ext) = self.extension {
            options = options.extension(&ext);
        }
        if let Some(depth) = self.max_depth {
            options = options.max_depth(depth);
        }
        if let Some(parallel) = self.parallel {
            options = options.parallel(parallel);
        }
        options
    }
}
