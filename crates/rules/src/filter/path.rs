//! Path normalization into the matcher's root-relative, `/`-separated form.

use std::path::{Component, Path, PathBuf};

/// Why a path could not be classified against the project root.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Resolves outside the project root (or onto another volume).
    #[error("path is outside the project root: {0}")]
    OutsideRoot(PathBuf),

    /// Resolves to the project root itself.
    #[error("path resolves to the project root: {0}")]
    IsRoot(PathBuf),

    #[error("path is not valid UTF-8: {0}")]
    NonUtf8(PathBuf),
}

/// Resolve `path` against `root` and return its root-relative form.
///
/// Absolute inputs are taken as-is; relative inputs are joined onto `root`.
/// `.` and `..` are collapsed lexically, without touching the filesystem, and
/// components are joined with `/` on every platform. A trailing separator
/// names the same path and is dropped.
pub fn normalize(root: &Path, path: &Path) -> Result<String, PathError> {
    let resolved = lexical_clean(&root.join(path));
    let relative = resolved
        .strip_prefix(root)
        .map_err(|_| PathError::OutsideRoot(path.to_path_buf()))?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part
                    .to_str()
                    .ok_or_else(|| PathError::NonUtf8(path.to_path_buf()))?;
                parts.push(part);
            }
            _ => return Err(PathError::OutsideRoot(path.to_path_buf())),
        }
    }
    if parts.is_empty() {
        return Err(PathError::IsRoot(path.to_path_buf()));
    }

    Ok(parts.join("/"))
}

/// Collapse `.` and `..` components without resolving symlinks.
///
/// `..` at the filesystem root stays at the root.
pub(crate) fn lexical_clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}
