//! Application state for the TUI.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::explorer::{CacheStatus, Explorer};
use crate::scanner::ScanResult;

/// The current UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal navigation mode.
    Normal,
    /// Waiting for the user to confirm moving the selection to the trash.
    ConfirmTrash,
    /// Help overlay mode.
    Help,
}

/// Message sent back from a background worker.
#[derive(Debug)]
pub enum Update {
    /// A scan of `path` finished.
    ScanDone {
        path: PathBuf,
        result: ScanResult,
        status: CacheStatus,
    },
    /// A scan of `path` failed.
    ScanFailed { path: PathBuf, message: String },
    /// A trash operation finished.
    TrashDone { path: PathBuf, files: u64 },
    /// A trash operation failed.
    TrashFailed { path: PathBuf, message: String },
}

/// Main application state for the TUI.
///
/// The app owns the explorer facade behind an `Arc` so scans and deletes
/// can run on worker threads while the input loop stays responsive; workers
/// report back over the update channel.
pub struct App {
    /// The data layer.
    pub explorer: Arc<Explorer>,

    /// Directory currently being shown.
    pub cwd: PathBuf,

    /// Listing for `cwd`, once its scan has landed.
    pub listing: Option<ScanResult>,

    /// Instant total painted before the detailed scan completes.
    pub stored_total: Option<u64>,

    /// Currently selected index into `listing.entries`.
    pub selected: usize,

    /// Current UI mode.
    pub mode: Mode,

    /// Whether a scan for `cwd` is in flight.
    pub scanning: bool,

    /// Whether a trash operation is in flight.
    pub trashing: bool,

    /// Files counted so far by the in-flight trash operation.
    pub trash_counter: Arc<AtomicU64>,

    /// Status message to display.
    pub status_message: Option<String>,

    /// Application should quit.
    pub should_quit: bool,

    /// Channel workers report back on.
    pub updates: Sender<Update>,
}

impl App {
    /// Create a new App instance rooted at `cwd`.
    pub fn new(explorer: Arc<Explorer>, cwd: PathBuf, updates: Sender<Update>) -> Self {
        Self {
            explorer,
            cwd,
            listing: None,
            stored_total: None,
            selected: 0,
            mode: Mode::Normal,
            scanning: false,
            trashing: false,
            trash_counter: Arc::new(AtomicU64::new(0)),
            status_message: None,
            should_quit: false,
            updates,
        }
    }

    /// Path of the currently selected entry, if any.
    pub fn selected_path(&self) -> Option<PathBuf> {
        self.listing
            .as_ref()
            .and_then(|l| l.entries.get(self.selected))
            .map(|e| e.path.clone())
    }

    /// Move the selection by `delta`, clamped to the listing.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.listing.as_ref().map_or(0, |l| l.entries.len());
        if len == 0 {
            self.selected = 0;
            return;
        }
        let max = len - 1;
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, max as isize) as usize;
    }

    /// Enter `path`: paint the stored overview immediately and kick off a
    /// background (cache-aware) scan.
    pub fn enter(&mut self, path: PathBuf) {
        self.cwd = path.clone();
        self.listing = None;
        self.selected = 0;
        self.status_message = None;
        self.stored_total = self.explorer.stored_overview(&path);
        self.spawn_scan(path, false);
    }

    /// Enter the selected entry if it is a directory.
    pub fn descend(&mut self) {
        let Some(listing) = &self.listing else { return };
        let Some(entry) = listing.entries.get(self.selected) else {
            return;
        };
        if entry.is_dir() {
            self.enter(entry.path.clone());
        }
    }

    /// Go up to the parent directory.
    pub fn ascend(&mut self) {
        if let Some(parent) = self.cwd.parent() {
            self.enter(parent.to_path_buf());
        }
    }

    /// Rescan the current directory, bypassing the cache.
    pub fn rescan(&mut self) {
        self.listing = None;
        self.status_message = None;
        self.spawn_scan(self.cwd.clone(), true);
    }

    /// Trash the selected entry. Called after confirmation.
    pub fn trash_selected(&mut self) {
        let Some(path) = self.selected_path() else {
            return;
        };
        self.trashing = true;
        self.trash_counter.store(0, Ordering::Relaxed);
        self.status_message = Some(format!("Moving {} to trash...", path.display()));

        let explorer = Arc::clone(&self.explorer);
        let counter = Arc::clone(&self.trash_counter);
        let updates = self.updates.clone();
        std::thread::spawn(move || {
            let update = match explorer.trash(&path, &counter) {
                Ok(files) => Update::TrashDone { path, files },
                Err(e) => Update::TrashFailed {
                    path,
                    message: e.to_string(),
                },
            };
            let _ = updates.send(update);
        });
    }

    /// Apply a worker update to the state.
    pub fn apply(&mut self, update: Update) {
        match update {
            Update::ScanDone {
                path,
                result,
                status,
            } => {
                // Only the scan for the directory we are still looking at
                // gets rendered; abandoned scans are dropped.
                if path == self.cwd {
                    self.scanning = false;
                    self.selected = 0;
                    self.stored_total = Some(result.total_size);
                    self.listing = Some(result);
                    if status == CacheStatus::Hit {
                        self.status_message = Some("(cached)".to_string());
                    }
                }
            }
            Update::ScanFailed { path, message } => {
                if path == self.cwd {
                    self.scanning = false;
                    self.status_message = Some(message);
                }
            }
            Update::TrashDone { path, files } => {
                self.trashing = false;
                self.status_message = Some(format!(
                    "Moved {} ({} file{}) to trash",
                    path.display(),
                    files,
                    if files == 1 { "" } else { "s" }
                ));
                self.rescan();
            }
            Update::TrashFailed { path, message } => {
                self.trashing = false;
                self.status_message =
                    Some(format!("Trash failed for {}: {}", path.display(), message));
            }
        }
    }

    fn spawn_scan(&mut self, path: PathBuf, fresh: bool) {
        self.scanning = true;

        let explorer = Arc::clone(&self.explorer);
        let updates = self.updates.clone();
        std::thread::spawn(move || {
            let outcome = if fresh {
                explorer.scan(&path).map(|r| (r, CacheStatus::Miss))
            } else {
                explorer.cached_scan(&path)
            };
            let update = match outcome {
                Ok((result, status)) => Update::ScanDone {
                    path,
                    result,
                    status,
                },
                Err(e) => Update::ScanFailed {
                    path,
                    message: e.to_string(),
                },
            };
            let _ = updates.send(update);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::scanner::{DirEntry, EntryKind};
    use std::fs::{self, File};
    use std::io::Write;
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_app(tmp: &TempDir) -> (App, std::sync::mpsc::Receiver<Update>) {
        let mut config = Config::default();
        config.cache.directory = Some(tmp.path().join("cachedir"));
        let explorer = Arc::new(Explorer::new(&config).unwrap());
        let (tx, rx) = mpsc::channel();
        (App::new(explorer, tmp.path().to_path_buf(), tx), rx)
    }

    fn listing_of(entries: Vec<DirEntry>) -> ScanResult {
        let total_size = entries.iter().map(|e| e.size).sum();
        ScanResult {
            entries,
            large_files: vec![],
            total_size,
        }
    }

    #[test]
    fn selection_clamps_to_listing() {
        let tmp = TempDir::new().unwrap();
        let (mut app, _rx) = test_app(&tmp);

        app.listing = Some(listing_of(vec![
            DirEntry {
                name: "a".into(),
                path: tmp.path().join("a"),
                size: 10,
                kind: EntryKind::File,
            },
            DirEntry {
                name: "b".into(),
                path: tmp.path().join("b"),
                size: 5,
                kind: EntryKind::File,
            },
        ]));

        app.move_selection(10);
        assert_eq!(app.selected, 1);
        app.move_selection(-10);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn selection_is_stable_with_no_listing() {
        let tmp = TempDir::new().unwrap();
        let (mut app, _rx) = test_app(&tmp);
        app.move_selection(1);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn enter_spawns_scan_and_applies_result() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data");
        fs::create_dir(&data).unwrap();
        File::create(data.join("f.txt"))
            .unwrap()
            .write_all(&[0u8; 33])
            .unwrap();

        let (mut app, rx) = test_app(&tmp);
        app.enter(data.clone());
        assert!(app.scanning);

        let update = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        app.apply(update);

        assert!(!app.scanning);
        let listing = app.listing.as_ref().unwrap();
        assert_eq!(listing.total_size, 33);
        assert_eq!(app.stored_total, Some(33));
    }

    #[test]
    fn stale_scan_result_is_dropped() {
        let tmp = TempDir::new().unwrap();
        let (mut app, _rx) = test_app(&tmp);

        app.scanning = true;
        app.apply(Update::ScanDone {
            path: tmp.path().join("somewhere-else"),
            result: listing_of(vec![]),
            status: CacheStatus::Miss,
        });

        // Result for a directory we already left: still scanning, no listing
        assert!(app.scanning);
        assert!(app.listing.is_none());
    }

    #[test]
    fn trash_failure_sets_status() {
        let tmp = TempDir::new().unwrap();
        let (mut app, _rx) = test_app(&tmp);

        app.trashing = true;
        app.apply(Update::TrashFailed {
            path: tmp.path().join("x"),
            message: "no trash here".into(),
        });

        assert!(!app.trashing);
        assert!(app.status_message.as_ref().unwrap().contains("no trash"));
    }
}
