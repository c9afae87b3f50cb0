//! Process-wide overview of total sizes per path.
//!
//! A much lighter store than the scan cache: just `path -> total bytes`,
//! used to paint an instant, roughly-correct number while the full
//! entry-level scan runs in the background. Measurements are always live —
//! this store never trusts the scan cache — and every update flushes the
//! whole index back to disk.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use walkdir::WalkDir;

use crate::error::{Result, SpelunkError};

/// Overview index with a lazily loaded, mutex-guarded in-memory map.
///
/// An explicitly constructed value rather than an ambient global: the
/// application builds one and hands it around, and tests reset state by
/// constructing a fresh store over a fresh file.
pub struct OverviewStore {
    file: PathBuf,
    /// `None` until first access; loaded at most once per store
    index: Mutex<Option<HashMap<String, u64>>>,
}

impl OverviewStore {
    /// Open a store backed by `file`. The file need not exist yet.
    pub fn open(file: PathBuf) -> Self {
        Self {
            file,
            index: Mutex::new(None),
        }
    }

    /// Open the default per-user store: `<cache dir>/spelunk/overview.json`.
    pub fn open_default() -> Result<Self> {
        let base = dirs::cache_dir()
            .ok_or_else(|| SpelunkError::InvalidPath("no cache directory for this user".into()))?;
        let dir = base.join("spelunk");
        fs::create_dir_all(&dir).map_err(|e| SpelunkError::Io {
            path: dir.clone(),
            source: e,
        })?;
        Ok(Self::open(dir.join("overview.json")))
    }

    /// Live-measure the total size under `path`, store it, and flush.
    ///
    /// Always walks the filesystem; never derives the number from any
    /// cached detailed scan. Symlinks contribute their own lstat size and
    /// are never followed. Unreadable branches contribute zero.
    pub fn measure(&self, path: &Path) -> Result<u64> {
        // Surface root-level failure the same way the scanner does
        fs::symlink_metadata(path).map_err(|e| SpelunkError::from_io(path.to_path_buf(), e))?;

        let total: u64 = WalkDir::new(path)
            .follow_links(false)
            .into_iter()
            .flatten()
            .filter(|e| !e.file_type().is_dir())
            .filter_map(|e| e.metadata().ok())
            .map(|m| m.len())
            .sum();

        let mut guard = self.index.lock().unwrap_or_else(|e| e.into_inner());
        let index = self.load_locked(&mut guard);
        index.insert(path.to_string_lossy().into_owned(), total);
        self.flush_locked(index)?;

        Ok(total)
    }

    /// Last stored total for `path`, without re-measuring.
    pub fn load_stored(&self, path: &Path) -> Option<u64> {
        let mut guard = self.index.lock().unwrap_or_else(|e| e.into_inner());
        let index = self.load_locked(&mut guard);
        index.get(path.to_string_lossy().as_ref()).copied()
    }

    /// Drop stored entries for `path` and everything beneath it.
    pub fn forget_subtree(&self, path: &Path) -> Result<()> {
        let prefix = path.to_string_lossy().into_owned();
        let mut guard = self.index.lock().unwrap_or_else(|e| e.into_inner());
        let index = self.load_locked(&mut guard);
        index.retain(|k, _| k != &prefix && !k.starts_with(&format!("{}/", prefix)));
        self.flush_locked(index)
    }

    /// Load the backing file into memory, once. Callers hold the lock, so
    /// concurrent first access cannot double-load.
    fn load_locked<'a>(
        &self,
        guard: &'a mut Option<HashMap<String, u64>>,
    ) -> &'a mut HashMap<String, u64> {
        guard.get_or_insert_with(|| {
            fs::read_to_string(&self.file)
                .ok()
                .and_then(|content| serde_json::from_str(&content).ok())
                .unwrap_or_default()
        })
    }

    fn flush_locked(&self, index: &HashMap<String, u64>) -> Result<()> {
        let tmp = self.file.with_extension("json.tmp");
        let serialized = serde_json::to_vec(index).map_err(|e| SpelunkError::Io {
            path: self.file.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;

        fs::write(&tmp, serialized).map_err(|e| SpelunkError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &self.file).map_err(|e| SpelunkError::Io {
            path: self.file.clone(),
            source: e,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn store_in(tmp: &TempDir) -> OverviewStore {
        OverviewStore::open(tmp.path().join("overview.json"))
    }

    #[test]
    fn measure_counts_all_files() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data");
        fs::create_dir_all(data.join("nested")).unwrap();
        File::create(data.join("a.bin"))
            .unwrap()
            .write_all(&[0u8; 100])
            .unwrap();
        File::create(data.join("nested/b.bin"))
            .unwrap()
            .write_all(&[0u8; 50])
            .unwrap();

        let store = store_in(&tmp);
        assert_eq!(store.measure(&data).unwrap(), 150);
    }

    #[test]
    fn remeasure_sees_new_bytes() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data");
        fs::create_dir(&data).unwrap();
        File::create(data.join("a.bin"))
            .unwrap()
            .write_all(&[0u8; 100])
            .unwrap();

        let store = store_in(&tmp);
        assert_eq!(store.measure(&data).unwrap(), 100);

        // Growth must show up on the next measure even though the previous
        // value was just stored: measurement is always live.
        File::create(data.join("b.bin"))
            .unwrap()
            .write_all(&[0u8; 25])
            .unwrap();
        assert_eq!(store.measure(&data).unwrap(), 125);
        assert_eq!(store.load_stored(&data), Some(125));
    }

    #[test]
    fn stored_value_survives_reopening() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data");
        fs::create_dir(&data).unwrap();
        File::create(data.join("a.bin"))
            .unwrap()
            .write_all(&[0u8; 64])
            .unwrap();

        store_in(&tmp).measure(&data).unwrap();

        // Fresh store over the same backing file
        let reopened = store_in(&tmp);
        assert_eq!(reopened.load_stored(&data), Some(64));
    }

    #[test]
    fn load_stored_misses_unknown_path() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        assert_eq!(store.load_stored(Path::new("/never/measured")), None);
    }

    #[test]
    fn measure_missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        assert!(store.measure(&tmp.path().join("gone")).is_err());
    }

    #[test]
    fn forget_subtree_drops_path_and_children() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data");
        let nested = data.join("nested");
        fs::create_dir_all(&nested).unwrap();
        File::create(data.join("a.bin"))
            .unwrap()
            .write_all(&[0u8; 10])
            .unwrap();

        let store = store_in(&tmp);
        store.measure(&data).unwrap();
        store.measure(&nested).unwrap();
        store.measure(tmp.path()).unwrap();

        store.forget_subtree(&data).unwrap();
        assert_eq!(store.load_stored(&data), None);
        assert_eq!(store.load_stored(&nested), None);
        assert!(store.load_stored(tmp.path()).is_some());
    }

    #[test]
    fn corrupt_backing_file_resets_to_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("overview.json"), b"garbage").unwrap();

        let store = store_in(&tmp);
        assert_eq!(store.load_stored(Path::new("/x")), None);
    }
}
