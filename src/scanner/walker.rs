use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fs;
use std::path::Path;

use rayon::prelude::*;

use crate::config::ScannerConfig;
use crate::error::{ConfigError, Result, SpelunkError};

use super::entry::{DirEntry, EntryKind, FileEntry, ScanResult};
use super::progress::{CancelToken, ScanProgress};

/// Concurrent directory scanner with a bounded fan-out.
///
/// The internal thread pool caps how many subtrees are open at once; this
/// limits file-descriptor pressure, not correctness — child sums are
/// commutative and each entry contributes exactly once, so the totals are
/// identical at any fan-out.
pub struct Scanner {
    pool: rayon::ThreadPool,
    large_files_cap: usize,
}

impl Scanner {
    pub fn new(options: &ScannerConfig) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.fan_out)
            .thread_name(|i| format!("spelunk-scan-{}", i))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("cannot build scan pool: {}", e)))?;

        Ok(Self {
            pool,
            large_files_cap: options.large_files,
        })
    }

    /// Scan `root` and return its immediate children with aggregated sizes.
    ///
    /// Failure to read the root itself is fatal and returned to the caller,
    /// with permission problems distinguished from other IO errors.
    /// Unreadable descendants are skipped: that branch contributes zero,
    /// the error counter ticks, and the scan continues.
    pub fn scan(
        &self,
        root: &Path,
        progress: &ScanProgress,
        cancel: &CancelToken,
    ) -> Result<ScanResult> {
        let root = root
            .canonicalize()
            .map_err(|e| SpelunkError::from_io(root.to_path_buf(), e))?;

        let read_dir =
            fs::read_dir(&root).map_err(|e| SpelunkError::from_io(root.clone(), e))?;

        let children: Vec<_> = read_dir
            .filter_map(|entry| match entry {
                Ok(e) => Some(e.path()),
                Err(_) => {
                    progress.add_error();
                    None
                }
            })
            .collect();

        let cap = self.large_files_cap;
        let scanned: Vec<(DirEntry, TopFiles)> = self.pool.install(|| {
            children
                .par_iter()
                .filter_map(|path| scan_child(path, cap, progress, cancel))
                .collect()
        });

        // A cancelled traversal produced a partial tree; report it as
        // cancelled so nothing mistakes it for a complete result.
        if cancel.is_cancelled() {
            return Err(SpelunkError::Cancelled);
        }

        let mut entries = Vec::with_capacity(scanned.len());
        let mut top = TopFiles::new(cap);
        for (entry, child_top) in scanned {
            top.merge(child_top);
            entries.push(entry);
        }

        entries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name)));
        let total_size = entries.iter().map(|e| e.size).sum();

        Ok(ScanResult {
            entries,
            large_files: top.into_sorted_vec(),
            total_size,
        })
    }
}

/// Produce the entry for one immediate child of the scan root.
fn scan_child(
    path: &Path,
    cap: usize,
    progress: &ScanProgress,
    cancel: &CancelToken,
) -> Option<(DirEntry, TopFiles)> {
    if cancel.is_cancelled() {
        return None;
    }

    // lstat: symlinks are sized as themselves, never followed
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(_) => {
            progress.add_error();
            return None;
        }
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if meta.file_type().is_symlink() {
        let size = meta.len();
        progress.add_file(size);
        let entry = DirEntry {
            name,
            path: path.to_path_buf(),
            size,
            kind: EntryKind::Symlink,
        };
        return Some((entry, TopFiles::new(cap)));
    }

    if meta.is_dir() {
        progress.add_dir();
        let subtree = aggregate(path, cap, progress, cancel);
        let entry = DirEntry {
            name,
            path: path.to_path_buf(),
            size: subtree.size,
            kind: EntryKind::Dir,
        };
        return Some((entry, subtree.top));
    }

    let size = meta.len();
    progress.add_file(size);
    let mut top = TopFiles::new(cap);
    top.push(FileEntry {
        name: name.clone(),
        path: path.to_path_buf(),
        size,
    });
    let entry = DirEntry {
        name,
        path: path.to_path_buf(),
        size,
        kind: EntryKind::File,
    };
    Some((entry, top))
}

/// Value-typed summary of a subtree, returned up the call stack.
struct Subtree {
    size: u64,
    top: TopFiles,
}

/// Aggregate a directory subtree bottom-up.
///
/// Subdirectories recurse in parallel on the scanner pool; each call owns
/// its partial sums and shortlist outright, so no state is shared between
/// workers beyond the atomic counters.
fn aggregate(path: &Path, cap: usize, progress: &ScanProgress, cancel: &CancelToken) -> Subtree {
    let mut size = 0u64;
    let mut top = TopFiles::new(cap);

    if cancel.is_cancelled() {
        return Subtree { size, top };
    }

    let read_dir = match fs::read_dir(path) {
        Ok(rd) => rd,
        Err(_) => {
            // Unreadable branch contributes zero; the scan keeps going.
            progress.add_error();
            return Subtree { size, top };
        }
    };

    let mut subdirs = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => {
                progress.add_error();
                continue;
            }
        };

        let child = entry.path();
        let meta = match fs::symlink_metadata(&child) {
            Ok(m) => m,
            Err(_) => {
                progress.add_error();
                continue;
            }
        };

        if meta.file_type().is_symlink() {
            size += meta.len();
            progress.add_file(meta.len());
        } else if meta.is_dir() {
            progress.add_dir();
            subdirs.push(child);
        } else {
            let len = meta.len();
            size += len;
            progress.add_file(len);
            top.push(FileEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: child,
                size: len,
            });
        }
    }

    let subtrees: Vec<Subtree> = subdirs
        .par_iter()
        .map(|dir| aggregate(dir, cap, progress, cancel))
        .collect();

    for sub in subtrees {
        size += sub.size;
        top.merge(sub.top);
    }

    Subtree { size, top }
}

/// Bounded shortlist of the largest files seen, min-heap backed: when full,
/// a larger file evicts the current smallest.
pub(crate) struct TopFiles {
    cap: usize,
    heap: BinaryHeap<Reverse<BySize>>,
}

impl TopFiles {
    pub(crate) fn new(cap: usize) -> Self {
        Self {
            cap,
            heap: BinaryHeap::with_capacity(cap + 1),
        }
    }

    pub(crate) fn push(&mut self, file: FileEntry) {
        if self.cap == 0 {
            return;
        }
        self.heap.push(Reverse(BySize(file)));
        if self.heap.len() > self.cap {
            self.heap.pop();
        }
    }

    pub(crate) fn merge(&mut self, other: TopFiles) {
        for Reverse(BySize(file)) in other.heap {
            self.push(file);
        }
    }

    /// Drain into a vec sorted by size descending.
    pub(crate) fn into_sorted_vec(self) -> Vec<FileEntry> {
        let mut files: Vec<FileEntry> = self.heap.into_iter().map(|r| r.0 .0).collect();
        files.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        files
    }
}

/// Orders file entries by size, path as tie-break.
#[derive(PartialEq, Eq)]
struct BySize(FileEntry);

impl Ord for BySize {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .size
            .cmp(&other.0.size)
            .then_with(|| self.0.path.cmp(&other.0.path))
    }
}

impl PartialOrd for BySize {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
