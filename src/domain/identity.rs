//! Document identity
//!
//! A [`DocumentId`] is the normalized absolute path of a file. It is the key of
//! every node in the dependency graph, so `docs/a.md`, `./docs/a.md` and
//! `docs/sub/../a.md` all collapse to one node.
//!
//! Normalization is purely lexical: `.` components are dropped and `..` pops
//! the previous component. Symlinks and letter case are not resolved.

use serde::{Serialize, Serializer};
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Normalized absolute path of a document or quoted file
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId {
    path: PathBuf,
}

impl DocumentId {
    /// Creates an identity for a path given on the command line or by discovery
    ///
    /// Relative paths are resolved against the current working directory.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        Ok(Self {
            path: normalize(&absolute),
        })
    }

    /// Resolves a path referenced from inside this document
    ///
    /// Relative references are taken relative to the directory containing
    /// this document; absolute references are used as-is.
    pub fn resolve(&self, referenced: &str) -> Self {
        let referenced = Path::new(referenced);
        let joined = if referenced.is_absolute() {
            referenced.to_path_buf()
        } else {
            self.dir().join(referenced)
        };
        Self {
            path: normalize(&joined),
        }
    }

    /// Returns the normalized absolute path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the directory containing this file
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(&self.path)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.path.display())
    }
}

/// Lexically normalizes an absolute path
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `/..` stays `/`
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
