//! Directory entry classification shared by all walk strategies

use crate::error::{WalkError, WalkResult};
use crate::ignore::IgnoreMatcher;
use std::fs::{self, FileType};
use std::path::{Path, PathBuf};

/// Kind of a directory entry as reported by the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    /// Symlink, socket, device, fifo...
    Other,
}

impl EntryKind {
    /// Classify without following symlinks
    pub fn from_file_type(ft: FileType) -> Self {
        if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }

    /// True for directories, which are descended into
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// True for regular files, which are handed to the file action
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File)
    }
}

/// One child of a listed directory, already filtered
#[derive(Debug, Clone)]
pub struct Child {
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Check that `root` is a directory, following symlinks
pub fn ensure_dir(root: &Path) -> WalkResult<()> {
    let meta = fs::metadata(root).map_err(|source| WalkError::Metadata {
        path: root.to_path_buf(),
        source,
    })?;

    if meta.is_dir() {
        Ok(())
    } else {
        Err(WalkError::NotADirectory {
            path: root.to_path_buf(),
        })
    }
}

/// List `root` and drop entries excluded by `ignore`
///
/// Entries come back in filesystem enumeration order. The kind check is left
/// to the caller so unsupported entries fail at the point they would have
/// been visited.
pub fn list_children(root: &Path, ignore: &IgnoreMatcher) -> WalkResult<Vec<Child>> {
    let list_err = |source: std::io::Error| WalkError::ListDirectory {
        path: root.to_path_buf(),
        source,
    };

    let mut children = Vec::new();
    for entry in fs::read_dir(root).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let path = root.join(entry.file_name());

        if ignore.is_match(&path) {
            continue;
        }

        let kind = EntryKind::from_file_type(entry.file_type().map_err(list_err)?);
        children.push(Child { path, kind });
    }

    Ok(children)
}
