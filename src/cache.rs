//! Disk-backed cache of scan results.
//!
//! One JSON record per scanned path, stored under the per-user cache
//! directory and keyed by a hash of the absolute path, so repeated queries
//! hit the same file across process restarts. Saves are atomic
//! (temp-file-then-rename); a crash mid-write never corrupts a record.
//!
//! A record is served only while it is both fresh (younger than the
//! freshness ceiling) and untouched (the directory's mtime has not advanced
//! past the scan time plus a short grace window). Anything else — including
//! a corrupt or unreadable record — is a miss, and the record is deleted
//! rather than left around as stale bait.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::CacheConfig;
use crate::error::{Result, SpelunkError};
use crate::scanner::ScanResult;

const CACHE_VERSION: u32 = 1;

/// Validity policy for cached scans.
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    /// Maximum record age regardless of mtime; bounds staleness even for
    /// directories that are never touched.
    pub freshness_ceiling: Duration,
    /// Tolerance for the directory mtime advancing past the scan time;
    /// absorbs filesystem timestamp granularity and clock skew.
    pub grace_window: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            freshness_ceiling: Duration::from_secs(7 * 24 * 60 * 60),
            grace_window: Duration::from_secs(2),
        }
    }
}

impl From<&CacheConfig> for CachePolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            freshness_ceiling: config.freshness_ceiling(),
            grace_window: config.grace_window(),
        }
    }
}

/// Persisted record: a scan result plus when it was taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheRecord {
    version: u32,
    /// Original scanned path, kept for inspection of the cache dir
    path: String,
    /// Unix epoch seconds of the scan
    scanned_at: u64,
    result: ScanResult,
}

/// Per-path scan result cache.
pub struct ScanCache {
    dir: PathBuf,
    policy: CachePolicy,
}

impl ScanCache {
    /// Open a cache rooted at `dir`, creating it if needed.
    pub fn open(dir: PathBuf, policy: CachePolicy) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(|e| SpelunkError::Io {
            path: dir.clone(),
            source: e,
        })?;
        Ok(Self { dir, policy })
    }

    /// Open the default per-user cache: `<cache dir>/spelunk/scans`.
    pub fn open_default(policy: CachePolicy) -> Result<Self> {
        let base = dirs::cache_dir()
            .ok_or_else(|| SpelunkError::InvalidPath("no cache directory for this user".into()))?;
        Self::open(base.join("spelunk").join("scans"), policy)
    }

    /// Save a scan result for `path`, timestamped now.
    pub fn save(&self, path: &Path, result: &ScanResult) -> Result<()> {
        self.save_record(
            path,
            CacheRecord {
                version: CACHE_VERSION,
                path: path.to_string_lossy().into_owned(),
                scanned_at: unix_now(),
                result: result.clone(),
            },
        )
    }

    /// Load the cached result for `path`, if one exists and is still valid.
    ///
    /// An invalid record is removed on the spot, not just skipped.
    pub fn load(&self, path: &Path) -> Option<ScanResult> {
        let record_path = self.record_path(path);
        let content = fs::read_to_string(&record_path).ok()?;

        let record: CacheRecord = match serde_json::from_str(&content) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Corrupt cache record, discarding");
                let _ = fs::remove_file(&record_path);
                return None;
            }
        };

        if record.version != CACHE_VERSION || !self.is_valid(path, record.scanned_at) {
            let _ = fs::remove_file(&record_path);
            return None;
        }

        Some(record.result)
    }

    /// Delete the record for `path`, if any.
    pub fn invalidate(&self, path: &Path) {
        let _ = fs::remove_file(self.record_path(path));
    }

    /// Delete the records for `path` and every ancestor directory.
    ///
    /// Used after a successful trash: every ancestor's cached total still
    /// includes the freed space.
    pub fn invalidate_ancestors(&self, path: &Path) {
        self.invalidate(path);
        let mut current = path;
        while let Some(parent) = current.parent() {
            self.invalidate(parent);
            current = parent;
        }
    }

    fn is_valid(&self, path: &Path, scanned_at: u64) -> bool {
        let scan_time = UNIX_EPOCH + Duration::from_secs(scanned_at);

        // Wall-clock ceiling, independent of mtime
        let age = SystemTime::now()
            .duration_since(scan_time)
            .unwrap_or_default();
        if age > self.policy.freshness_ceiling {
            return false;
        }

        // Content check: the directory must not have changed since the
        // scan, modulo the grace window. A vanished directory is stale too.
        let mtime = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(_) => return false,
        };
        mtime <= scan_time + self.policy.grace_window
    }

    /// Deterministic record file for an absolute path.
    fn record_path(&self, path: &Path) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(path.as_os_str().as_encoded_bytes());
        let digest = format!("{:x}", hasher.finalize());
        self.dir.join(format!("{}.json", &digest[..16]))
    }

    fn save_record(&self, path: &Path, record: CacheRecord) -> Result<()> {
        let record_path = self.record_path(path);
        let tmp_path = record_path.with_extension("json.tmp");

        let serialized = serde_json::to_vec(&record).map_err(|e| SpelunkError::Io {
            path: record_path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;

        fs::write(&tmp_path, serialized).map_err(|e| SpelunkError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        fs::rename(&tmp_path, &record_path).map_err(|e| SpelunkError::Io {
            path: record_path,
            source: e,
        })?;

        Ok(())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
