//! Spelunk - a disk usage explorer with safe trash-based deletion
//!
//! This crate provides functionality for:
//! - Concurrent directory-size scanning with live progress
//! - Caching scan results with content- and age-based invalidation
//! - Instant total-size overviews ahead of a full scan
//! - Moving unwanted subtrees to the recoverable trash
//! - Interactive TUI for answering "where did my space go"

pub mod cache;
pub mod classifier;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod explorer;
pub mod overview;
pub mod scanner;
pub mod trash;
pub mod tui;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SpelunkError};
pub use explorer::{CacheStatus, Explorer};
pub use scanner::{DirEntry, EntryKind, FileEntry, ScanResult};
