//! Directory listing behind a trait so trees can live on disk or in memory

use crate::domain::violations::EntryKind;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self { name: name.into(), kind }
    }
}

/// Source of directory listings.
///
/// `dir` is a `/`-separated path relative to the lint root; `""` is the root.
pub trait FileSystem: Send + Sync {
    fn read_dir(&self, dir: &str) -> io::Result<Vec<DirEntry>>;
}

/// Real filesystem rooted at a directory
#[derive(Debug, Clone)]
pub struct OsFileSystem {
    root: PathBuf,
}

impl OsFileSystem {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileSystem for OsFileSystem {
    fn read_dir(&self, dir: &str) -> io::Result<Vec<DirEntry>> {
        let path = if dir.is_empty() { self.root.clone() } else { self.root.join(dir) };

        let mut entries = Vec::new();
        for entry in WalkDir::new(&path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            let name = entry.file_name().to_string_lossy().into_owned();
            // Symlinks are not followed, so they are checked as files.
            let kind = if entry.file_type().is_dir() { EntryKind::Directory } else { EntryKind::File };
            entries.push(DirEntry { name, kind });
        }

        Ok(entries)
    }
}

/// In-memory tree with optional read failures
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    dirs: BTreeMap<String, BTreeMap<String, EntryKind>>,
    unreadable: BTreeSet<String>,
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        let mut dirs = BTreeMap::new();
        dirs.insert(String::new(), BTreeMap::new());
        Self { dirs, unreadable: BTreeSet::new() }
    }
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from `/`-separated file paths; parents are created as needed
    pub fn from_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fs = Self::new();
        for file in files {
            fs.add_file(file.as_ref());
        }
        fs
    }

    /// Add a file and any missing parent directories
    pub fn add_file(&mut self, path: &str) -> &mut Self {
        self.add_entry(path, EntryKind::File)
    }

    /// Add an (empty) directory and any missing parents
    pub fn add_dir(&mut self, path: &str) -> &mut Self {
        self.add_entry(path, EntryKind::Directory)
    }

    /// Make listing `dir` fail with a permission error
    pub fn fail_read(&mut self, dir: &str) -> &mut Self {
        self.unreadable.insert(dir.trim_matches('/').to_string());
        self
    }

    fn add_entry(&mut self, path: &str, kind: EntryKind) -> &mut Self {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return self;
        }

        let mut parent = String::new();
        let mut components = path.split('/').filter(|c| !c.is_empty()).peekable();
        while let Some(name) = components.next() {
            let child_kind =
                if components.peek().is_some() { EntryKind::Directory } else { kind };
            self.dirs.entry(parent.clone()).or_default().insert(name.to_string(), child_kind);

            parent = if parent.is_empty() { name.to_string() } else { format!("{parent}/{name}") };
            if child_kind.is_directory() {
                self.dirs.entry(parent.clone()).or_default();
            }
        }
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_dir(&self, dir: &str) -> io::Result<Vec<DirEntry>> {
        if self.unreadable.contains(dir) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
        }
        self.dirs
            .get(dir)
            .map(|children| {
                children.iter().map(|(name, kind)| DirEntry::new(name.clone(), *kind)).collect()
            })
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no directory '{dir}'")))
    }
}
