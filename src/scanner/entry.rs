use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What kind of filesystem object an entry is.
///
/// Symlinks are their own kind: they are stat'd without following, so their
/// size is the link's own on-disk size and the target is never counted
/// through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
}

/// One immediate child of a scanned directory.
///
/// For directories, `size` is the aggregated size of everything beneath
/// them, folded in bottom-up as the scan returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name (last component of path)
    pub name: String,

    /// Full path to the entry
    pub path: PathBuf,

    /// Size in bytes (aggregated for directories)
    pub size: u64,

    /// Kind of entry
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// Name for display; symlinks are marked with a trailing `@`.
    pub fn display_name(&self) -> String {
        match self.kind {
            EntryKind::Symlink => format!("{}@", self.name),
            EntryKind::Dir => format!("{}/", self.name),
            EntryKind::File => self.name.clone(),
        }
    }
}

/// A file on the largest-files shortlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Result of scanning one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Immediate children of the scanned root, sorted by size descending
    pub entries: Vec<DirEntry>,

    /// Largest individual files anywhere under the root, size descending
    pub large_files: Vec<FileEntry>,

    /// Sum of the sizes of all entries; equals the subtree total
    pub total_size: u64,
}
