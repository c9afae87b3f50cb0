mod entry;
mod progress;
mod walker;

pub use entry::{DirEntry, EntryKind, FileEntry, ScanResult};
pub use progress::{CancelToken, ScanProgress};
pub use walker::Scanner;
