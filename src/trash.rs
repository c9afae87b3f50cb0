//! Safe deletion: move a subtree to the platform trash, never unlink.
//!
//! The move is one logical operation on the whole subtree — either the
//! path ends up in the recoverable trash, or the call fails and nothing is
//! guaranteed removed. The caller only invalidates caches on success, so a
//! failed delete leaves stale-but-correct data rather than falsely showing
//! freed space.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use walkdir::WalkDir;

use crate::error::{Result, SpelunkError};

/// Move `path` (file or directory subtree) to the recoverable trash.
///
/// Every regular file under the path bumps `progress` once, so a renderer
/// can show movement during a long delete. Returns the number of files
/// moved. Blocking; run it on its own thread when driven from a UI loop.
pub fn move_to_trash(path: &Path, progress: &AtomicU64) -> Result<u64> {
    let meta =
        std::fs::symlink_metadata(path).map_err(|e| SpelunkError::from_io(path.to_path_buf(), e))?;

    let files = if meta.is_dir() {
        let mut count = 0u64;
        for entry in WalkDir::new(path).follow_links(false).into_iter().flatten() {
            if entry.file_type().is_file() {
                count += 1;
                progress.fetch_add(1, Ordering::Relaxed);
            }
        }
        count
    } else {
        progress.fetch_add(1, Ordering::Relaxed);
        1
    };

    tracing::info!(path = %path.display(), files, "Moving to trash");

    trash::delete(path).map_err(|e| SpelunkError::Trash {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(files)
}
