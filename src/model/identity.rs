//! Identity types for documents, surfaces and reveal requests

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Stable key for one open document
///
/// Built from a path that has been normalized, so `./a/../graph.dot` and
/// `graph.dot` resolve to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(PathBuf);

impl DocumentId {
    /// Normalize a path into a document key
    ///
    /// Existing files are canonicalized (symlinks resolved). Paths that do not
    /// exist yet are folded lexically against the current directory.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if let Ok(canonical) = path.canonicalize() {
            return Self(canonical);
        }

        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        };
        Self(normalize_lexically(&absolute))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File name used in default panel titles
    pub fn file_name(&self) -> String {
        self.0
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.0.display().to_string())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Unique identifier for a rendering surface (never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Correlates one reveal request with its completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RevealTicket(pub u64);

/// Where a surface should be shown when revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayTarget {
    /// The currently active column
    #[default]
    Active,
    /// Next to the active column
    Beside,
    /// A specific column (1-based)
    Column(u8),
}
