//! Stylesheet sources and the filesystem handles they read from.
//!
//! A [`Source`] pairs a [`SourceFs`] handle with an optional root inside it
//! and an optional layer prefix. Two handles ship with the crate:
//! [`DirFs`] for real directories and [`MemoryFs`] for in-memory trees.

use crate::layer::normalize_root;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// An entry reported by [`SourceFs::walk`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Slash-separated path relative to the handle
    pub path: String,
    /// True for directories
    pub is_dir: bool,
}

impl Entry {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }
}

/// Read-only filesystem capability consumed by the build.
pub trait SourceFs {
    /// Recursively list every entry under `root`.
    ///
    /// An empty `root` means the handle's own root. Returned paths are
    /// relative to the handle (not to `root`) and use `/` separators.
    fn walk(&self, root: &str) -> io::Result<Vec<Entry>>;

    /// Read the full content of the file at `path`.
    fn read_to_string(&self, path: &str) -> io::Result<String>;
}

impl<T: SourceFs + ?Sized> SourceFs for &T {
    fn walk(&self, root: &str) -> io::Result<Vec<Entry>> {
        (**self).walk(root)
    }

    fn read_to_string(&self, path: &str) -> io::Result<String> {
        (**self).read_to_string(path)
    }
}

/// A directory on disk
#[derive(Debug, Clone)]
pub struct DirFs {
    base: PathBuf,
}

impl DirFs {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl SourceFs for DirFs {
    fn walk(&self, root: &str) -> io::Result<Vec<Entry>> {
        let root = normalize_root(root);

        // Entry paths are relative to the handle, which an absolute root
        // would bypass
        if root.starts_with('/') || Path::new(&root).has_root() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{}: root must be relative to {}", root, self.base.display()),
            ));
        }

        let start = if root.is_empty() {
            self.base.clone()
        } else {
            self.base.join(&root)
        };

        let mut entries = Vec::new();

        for entry in WalkDir::new(&start).follow_links(false) {
            let entry = entry?;

            let rel = entry.path().strip_prefix(&self.base).map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "{} is outside {}",
                        entry.path().display(),
                        self.base.display()
                    ),
                )
            })?;

            // The handle root itself
            if rel.as_os_str().is_empty() {
                continue;
            }

            entries.push(Entry {
                path: to_slash(rel),
                is_dir: entry.file_type().is_dir(),
            });
        }

        Ok(entries)
    }

    fn read_to_string(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(self.base.join(path))
    }
}

/// Render a relative path with `/` separators regardless of platform
fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// An in-memory tree of files; directories are implied by file paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: BTreeMap<String, String>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, returning the updated tree
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add or replace a file
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl<P: Into<String>, C: Into<String>> FromIterator<(P, C)> for MemoryFs {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut memory = MemoryFs::new();
        for (path, content) in iter {
            memory.insert(path, content);
        }
        memory
    }
}

impl SourceFs for MemoryFs {
    fn walk(&self, root: &str) -> io::Result<Vec<Entry>> {
        let root = normalize_root(root);
        let root = root.as_str();

        let mut dirs = BTreeSet::new();
        let mut entries = Vec::new();

        for path in self.files.keys() {
            let inside = root.is_empty()
                || path == root
                || path
                    .strip_prefix(root)
                    .is_some_and(|rest| rest.starts_with('/'));
            if !inside {
                continue;
            }

            // Every ancestor directory at or below the root
            let mut end = 0;
            while let Some(offset) = path[end..].find('/') {
                end += offset;
                let dir = &path[..end];
                if dir.len() >= root.len() && dirs.insert(dir.to_string()) {
                    entries.push(Entry::dir(dir));
                }
                end += 1;
            }

            entries.push(Entry::file(path.as_str()));
        }

        if entries.is_empty() && !root.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: no such file or directory", root),
            ));
        }

        Ok(entries)
    }

    fn read_to_string(&self, path: &str) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: no such file or directory", path),
            )
        })
    }
}

/// One input to a build: a filesystem handle, the root to walk inside it,
/// and an optional namespace prefix for every layer it contributes.
#[derive(Clone)]
pub struct Source<'a> {
    fs: &'a dyn SourceFs,
    root: String,
    prefix: String,
}

impl<'a> Source<'a> {
    /// Source covering the whole handle, without prefix
    pub fn new(fs: &'a dyn SourceFs) -> Self {
        Self {
            fs,
            root: String::new(),
            prefix: String::new(),
        }
    }

    /// Walk only below `root`; layer names are derived relative to it
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = normalize_root(&root.into());
        self
    }

    /// Prepend `prefix.` to every layer name from this source
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn fs(&self) -> &'a dyn SourceFs {
        self.fs
    }

    pub fn root_path(&self) -> &str {
        &self.root
    }

    pub fn layer_prefix(&self) -> &str {
        &self.prefix
    }
}

impl fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("root", &self.root)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
