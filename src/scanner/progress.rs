//! Shared progress counters and cancellation for in-flight scans.
//!
//! Workers touch these exclusively through atomic operations so a progress
//! reporter can sample them concurrently without any locking.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Live counters for a running scan.
///
/// Shared between the scan workers and whatever is rendering progress;
/// cheap to clone via `Arc`.
#[derive(Debug, Default)]
pub struct ScanProgress {
    files: AtomicU64,
    dirs: AtomicU64,
    bytes: AtomicU64,
    errors: AtomicU64,
}

impl ScanProgress {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn add_file(&self, bytes: u64) {
        self.files.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn add_dir(&self) {
        self.dirs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of files (and symlinks) visited so far
    pub fn files(&self) -> u64 {
        self.files.load(Ordering::Relaxed)
    }

    /// Number of directories visited so far, excluding the scan root
    pub fn dirs(&self) -> u64 {
        self.dirs.load(Ordering::Relaxed)
    }

    /// Bytes accounted so far
    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    /// Unreadable descendants skipped so far
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Reset all counters, e.g. before reusing the handle for a new scan.
    pub fn reset(&self) {
        self.files.store(0, Ordering::Relaxed);
        self.dirs.store(0, Ordering::Relaxed);
        self.bytes.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
    }
}

/// Cooperative cancellation flag for a scan.
///
/// Workers check it before descending into each directory; once set, the
/// traversal unwinds at the next opportunity and the partial result is
/// discarded rather than cached.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Clear the flag so the token can drive another scan.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }
}
