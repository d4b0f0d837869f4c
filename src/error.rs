//! Error types shared by the planning, moving and undo stages.
//!
//! Batch-level errors (missing directory, missing log, unreadable
//! configuration) abort the requested operation before anything is touched.
//! Per-file errors are produced by the same enum but are collected into
//! reports by the caller instead of being propagated.

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while organizing a directory or reverting it.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The target path does not exist or is not a directory.
    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// A single file could not be moved.
    #[error("Failed to move {} to {}: {reason}", from.display(), to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    /// The destination of a move is already occupied.
    #[error("Destination already exists: {}", path.display())]
    DestinationExists { path: PathBuf },

    /// Undo was requested but no move log is stored.
    #[error("No recent moves to revert (no log at {})", path.display())]
    NoLogFound { path: PathBuf },

    /// A confirmation answer could not be understood.
    #[error("Unrecognized answer '{input}', please answer 'y' or 'n'")]
    InvalidResponse { input: String },

    /// The move log could not be written.
    #[error("Failed to write move log {}: {source}", path.display())]
    LogWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The move log could not be read.
    #[error("Failed to read move log {}: {source}", path.display())]
    LogReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The move log exists but its content is not a valid log.
    #[error("Invalid move log format: {reason}")]
    InvalidLogFormat { reason: String },

    /// The move log was written by a newer version of the tool.
    #[error("Move log version {found} is not supported (latest known is {supported})")]
    UnsupportedLogVersion { found: u32, supported: u32 },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OrganizeError {
    /// Process exit code for an error that ended the run.
    ///
    /// `0` is reserved for success, a declined confirmation or an empty plan,
    /// so it never appears here.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::DirectoryNotFound { .. } => 1,
            Self::NoLogFound { .. } => 2,
            Self::Config(_) => 3,
            _ => 4,
        }
    }
}

/// Result type for organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let missing = OrganizeError::DirectoryNotFound {
            path: PathBuf::from("/nope"),
        };
        let no_log = OrganizeError::NoLogFound {
            path: PathBuf::from("log.json"),
        };
        let config = OrganizeError::Config(ConfigError::Invalid("bad".to_string()));
        let format = OrganizeError::InvalidLogFormat {
            reason: "truncated".to_string(),
        };

        assert_eq!(missing.exit_code(), 1);
        assert_eq!(no_log.exit_code(), 2);
        assert_eq!(config.exit_code(), 3);
        assert_eq!(format.exit_code(), 4);
    }

    #[test]
    fn test_display_mentions_path() {
        let err = OrganizeError::DirectoryNotFound {
            path: PathBuf::from("/srv/missing"),
        };
        assert!(err.to_string().contains("/srv/missing"));
    }
}
