use std::io;
use std::path::{Component, Path, PathBuf};

use crate::core::config::Config;

/// Errors that can occur during path validation
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Path '{path}' is outside allowed root directory '{root}'")]
    OutsideRootDirectory { path: PathBuf, root: PathBuf },

    #[error("Symlink '{path}' points outside allowed root directory")]
    SymlinkOutsideRoot { path: PathBuf },

    #[error("Cannot canonicalize path '{path}': {error}")]
    CannotCanonicalize { path: PathBuf, error: io::Error },

    #[error("Path does not exist: '{path}'")]
    PathNotFound { path: PathBuf },

    #[error("IO error for path '{path}': {error}")]
    IoError { path: PathBuf, error: io::Error },
}

/// Validates that an existing path is within the configured security boundaries.
///
/// This function performs the following checks:
/// 1. Canonicalizes the input path to resolve `.`, `..`, and symlinks
/// 2. If a root path is configured, ensures the canonical path is within that root
/// 3. Handles symlinks according to the configured policy
///
/// # Arguments
///
/// * `input_path` - The path to validate (can be relative or absolute)
/// * `config` - The server configuration containing security settings
///
/// # Returns
///
/// * `Ok(PathBuf)` - The canonicalized, validated path
/// * `Err(PathSecurityError)` - If validation fails
pub fn validate_path(input_path: &str, config: &Config) -> Result<PathBuf, PathSecurityError> {
    let expanded = expand_tilde(input_path);
    let path = Path::new(&expanded);

    // If no root path is configured, only do basic canonicalization
    let Some(ref root) = config.security.root_path else {
        return canonicalize_existing(path);
    };

    let canonical_root = canonical_root(root)?;

    if !path.exists() {
        return Err(PathSecurityError::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    // Handle symlinks according to policy
    if path.is_symlink() && !config.security.allow_symlinks {
        let target = path.read_link().map_err(|e| PathSecurityError::IoError {
            path: path.to_path_buf(),
            error: e,
        })?;

        let canonical_target =
            canonicalize_existing(&target).map_err(|_| PathSecurityError::SymlinkOutsideRoot {
                path: path.to_path_buf(),
            })?;

        if !canonical_target.starts_with(&canonical_root) {
            return Err(PathSecurityError::SymlinkOutsideRoot {
                path: path.to_path_buf(),
            });
        }
    }

    let canonical_path =
        path.canonicalize()
            .map_err(|e| PathSecurityError::CannotCanonicalize {
                path: path.to_path_buf(),
                error: e,
            })?;

    if !canonical_path.starts_with(&canonical_root) {
        return Err(PathSecurityError::OutsideRootDirectory {
            path: canonical_path,
            root: canonical_root,
        });
    }

    Ok(canonical_path)
}

/// Resolves a path that may not exist yet (e.g. a file about to be written)
/// to an absolute form and validates it against the configured root.
///
/// The longest existing ancestor is canonicalized, the non-existing remainder
/// is normalized lexically (`.` removed, `..` rejected via canonical prefix
/// check) and re-appended. This mirrors `validate_path` but does not require
/// the final component to exist.
pub fn resolve_new_path(input_path: &str, config: &Config) -> Result<PathBuf, PathSecurityError> {
    let expanded = expand_tilde(input_path);
    let path = Path::new(&expanded);

    let resolved = resolve_against_existing_ancestor(path)?;

    if let Some(ref root) = config.security.root_path {
        let canonical_root = canonical_root(root)?;
        if !resolved.starts_with(&canonical_root) {
            return Err(PathSecurityError::OutsideRootDirectory {
                path: resolved,
                root: canonical_root,
            });
        }
    }

    Ok(resolved)
}

/// Expand a leading `~` or `~/` to the user's home directory.
///
/// Left untouched when `HOME` is unset or the `~` prefixes another user's
/// name (`~alice`), which this server does not resolve.
fn expand_tilde(input: &str) -> String {
    if input == "~" || input.starts_with("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return format!("{}{}", home, &input[1..]);
        }
    }
    input.to_string()
}

fn canonical_root(root: &Path) -> Result<PathBuf, PathSecurityError> {
    root.canonicalize().map_err(|e| PathSecurityError::IoError {
        path: root.to_path_buf(),
        error: e,
    })
}

/// Canonicalize the deepest existing ancestor of `path`, then re-append the
/// components that do not exist yet.
fn resolve_against_existing_ancestor(path: &Path) -> Result<PathBuf, PathSecurityError> {
    // Make the path absolute relative to the current directory first so the
    // ancestor walk terminates at a real root.
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| PathSecurityError::IoError {
                path: path.to_path_buf(),
                error: e,
            })?
            .join(path)
    };

    let mut current = absolute.clone();
    let mut pending: Vec<std::ffi::OsString> = Vec::new();

    loop {
        if current.exists() {
            let canonical = current
                .canonicalize()
                .map_err(|e| PathSecurityError::CannotCanonicalize {
                    path: current.clone(),
                    error: e,
                })?;
            let mut resolved = canonical;
            for part in pending.iter().rev() {
                resolved.push(part);
            }
            return Ok(resolved);
        }

        match current.file_name() {
            Some(name) => pending.push(name.to_owned()),
            None => {
                // file_name() is None at the filesystem root or when the
                // path ends in `..`. A `..` through a non-existing directory
                // cannot be resolved against anything real; refuse it.
                let err = if matches!(current.components().next_back(), Some(Component::ParentDir))
                {
                    PathSecurityError::CannotCanonicalize {
                        path: absolute.clone(),
                        error: io::Error::new(
                            io::ErrorKind::InvalidInput,
                            "parent traversal through a non-existing path",
                        ),
                    }
                } else {
                    PathSecurityError::PathNotFound {
                        path: absolute.clone(),
                    }
                };
                return Err(err);
            }
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => {
                return Err(PathSecurityError::PathNotFound { path: absolute });
            }
        }
    }
}

/// Attempts to canonicalize a path, mapping a missing file to `PathNotFound`.
fn canonicalize_existing(path: &Path) -> Result<PathBuf, PathSecurityError> {
    path.canonicalize().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PathSecurityError::PathNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PathSecurityError::CannotCanonicalize {
                path: path.to_path_buf(),
                error: e,
            }
        }
    })
}
