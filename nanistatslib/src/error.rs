//! Error types for nanistatslib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur at the boundary of an analysis.
///
/// Per-file and per-directory failures inside a tree walk are recovered
/// locally and never show up here; only the workspace root and
/// configuration can fail an analysis.
#[derive(Error, Debug)]
pub enum NanistatsError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The analysis root does not exist
    #[error("path does not exist: {0}")]
    RootNotFound(PathBuf),

    /// A configuration file could not be parsed
    #[error("invalid configuration in '{path}': {message}")]
    ConfigParse { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_names_its_path() {
        let errors = [
            NanistatsError::FileRead {
                path: PathBuf::from("cfg/nanistats.toml"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            },
            NanistatsError::RootNotFound(PathBuf::from("cfg/nanistats.toml")),
            NanistatsError::ConfigParse {
                path: PathBuf::from("cfg/nanistats.toml"),
                message: "bad key".to_string(),
            },
        ];

        for err in &errors {
            let path = match err {
                NanistatsError::FileRead { path, .. }
                | NanistatsError::RootNotFound(path)
                | NanistatsError::ConfigParse { path, .. } => path,
            };
            assert!(err.to_string().contains(&*path.to_string_lossy()));
        }
    }
}
