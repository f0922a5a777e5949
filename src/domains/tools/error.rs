//! Tool-specific error types.
//!
//! Every tool handler reports failures through [`ToolError`] rather than
//! formatting ad-hoc strings. The variant identifies the failure kind; the
//! `Display` text is what ends up, `✗`-prefixed, in the tool's reply.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::security::PathSecurityError;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A path argument did not resolve to an existing file or directory.
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// A directory was expected but something else was found.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A non-empty directory cannot be deleted without `recursive=true`.
    #[error("Directory is not empty: {0}. Use recursive=true to delete it and its contents.")]
    DirectoryNotEmpty(PathBuf),

    /// The operating system refused the operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// `read_file` was asked for an encoding the server does not support.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// A glob pattern argument failed to parse.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A subprocess exceeded its wall-clock budget.
    #[error("Command timed out after {timeout}s: {command}")]
    Timeout { timeout: u64, command: String },

    /// A subprocess could not be started at all.
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// A path argument violated the configured security policy.
    #[error("Path security validation failed: {0}")]
    PathSecurity(PathSecurityError),

    /// Any other I/O fault, with a short description of what was attempted.
    #[error("{context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

/// A plain missing path is an expected condition, not a policy violation;
/// give it the dedicated variant so its message reads accordingly.
impl From<PathSecurityError> for ToolError {
    fn from(e: PathSecurityError) -> Self {
        match e {
            PathSecurityError::PathNotFound { path } => Self::PathNotFound(path),
            other => Self::PathSecurity(other),
        }
    }
}

impl ToolError {
    /// Wrap an I/O error with a description of the failed operation.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Classify an I/O error against a path, mapping the common kinds to
    /// their dedicated variants.
    pub fn from_io_for_path(path: &std::path::Path, context: &str, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::PathNotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::io(format!("{} '{}'", context, path.display()), source),
        }
    }

    /// Create a timeout error naming the duration and the original command.
    pub fn timeout(timeout: u64, command: impl Into<String>) -> Self {
        Self::Timeout {
            timeout,
            command: command.into(),
        }
    }

    /// Create a spawn-failure error for a program that could not start.
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_duration_and_command() {
        let err = ToolError::timeout(300, "sleep 1000");
        let msg = err.to_string();
        assert!(msg.contains("300s"));
        assert!(msg.contains("sleep 1000"));
    }

    #[test]
    fn test_io_kind_classification() {
        let path = std::path::Path::new("/some/file");
        let not_found = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            ToolError::from_io_for_path(path, "Error reading", not_found),
            ToolError::PathNotFound(_)
        ));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
        assert!(matches!(
            ToolError::from_io_for_path(path, "Error reading", denied),
            ToolError::PermissionDenied(_)
        ));
    }

    #[test]
    fn test_directory_not_empty_suggests_recursive() {
        let err = ToolError::DirectoryNotEmpty(PathBuf::from("/tmp/full"));
        assert!(err.to_string().contains("recursive=true"));
    }

    #[test]
    fn test_security_not_found_maps_to_path_not_found() {
        let sec = PathSecurityError::PathNotFound {
            path: PathBuf::from("/gone"),
        };
        let err: ToolError = sec.into();
        assert!(matches!(err, ToolError::PathNotFound(_)));
        assert_eq!(err.to_string(), "Path does not exist: /gone");
    }
}
