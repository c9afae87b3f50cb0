//! Facade exposed to the navigation/rendering layer.
//!
//! Wires the scanner, result cache, overview store, and deletion executor
//! together. The rendering layer owns keystrokes and confirmation dialogs;
//! this type owns the data flow: fast overview first, detailed scan behind
//! it, cache reuse on revisit, and cache invalidation after a delete.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use crate::cache::{CachePolicy, ScanCache};
use crate::config::Config;
use crate::error::Result;
use crate::overview::OverviewStore;
use crate::scanner::{CancelToken, ScanProgress, ScanResult, Scanner};
use crate::trash::move_to_trash;

/// Whether a cached scan satisfied the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

pub struct Explorer {
    scanner: Scanner,
    cache: ScanCache,
    overview: OverviewStore,
    progress: Arc<ScanProgress>,
    cancel: CancelToken,
}

impl Explorer {
    /// Build an explorer over the default per-user cache locations.
    pub fn new(config: &Config) -> Result<Self> {
        let policy = CachePolicy::from(&config.cache);
        let cache = match &config.cache.directory {
            Some(dir) => ScanCache::open(dir.join("scans"), policy)?,
            None => ScanCache::open_default(policy)?,
        };
        let overview = match &config.cache.directory {
            Some(dir) => OverviewStore::open(dir.join("overview.json")),
            None => OverviewStore::open_default()?,
        };

        Ok(Self {
            scanner: Scanner::new(&config.scanner)?,
            cache,
            overview,
            progress: ScanProgress::new(),
            cancel: CancelToken::new(),
        })
    }

    /// Fresh scan of `path`; the result is cached on success.
    ///
    /// Cancelled or failed scans are never cached.
    pub fn scan(&self, path: &Path) -> Result<ScanResult> {
        let path = canonical(path);
        self.progress.reset();
        let result = self.scanner.scan(&path, &self.progress, &self.cancel)?;

        if let Err(e) = self.cache.save(&path, &result) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to save scan cache");
        }
        Ok(result)
    }

    /// Scan of `path` served from cache when still valid.
    pub fn cached_scan(&self, path: &Path) -> Result<(ScanResult, CacheStatus)> {
        let path = canonical(path);
        if let Some(result) = self.cache.load(&path) {
            tracing::debug!(path = %path.display(), "Scan cache hit");
            return Ok((result, CacheStatus::Hit));
        }
        self.scan(&path).map(|r| (r, CacheStatus::Miss))
    }

    /// Live total-size measurement, stored in the overview index.
    pub fn overview(&self, path: &Path) -> Result<u64> {
        self.overview.measure(&canonical(path))
    }

    /// Last stored overview total, instant and possibly stale.
    pub fn stored_overview(&self, path: &Path) -> Option<u64> {
        self.overview.load_stored(&canonical(path))
    }

    /// Move `path` to the trash, bumping `counter` once per file.
    ///
    /// On success the scan cache for the path and all its ancestors is
    /// invalidated (their cached totals include the freed space), and
    /// overview entries under the path are dropped. On failure every cache
    /// is left untouched.
    pub fn trash(&self, path: &Path, counter: &AtomicU64) -> Result<u64> {
        let path = canonical(path);
        let files = move_to_trash(&path, counter)?;

        self.cache.invalidate_ancestors(&path);
        if let Err(e) = self.overview.forget_subtree(&path) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to update overview index");
        }

        Ok(files)
    }

    /// Counters a renderer can sample while a scan runs.
    pub fn progress(&self) -> Arc<ScanProgress> {
        Arc::clone(&self.progress)
    }

    /// Token that aborts the in-flight scan at the next opportunity.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

/// Cache keys must be stable across process restarts, so resolve to the
/// canonical absolute form when the path still exists; fall back to the
/// given path (e.g. when invalidating an already-deleted one).
fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
