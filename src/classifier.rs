//! Path-domain predicates keeping explorer suggestions disjoint from the
//! other cleanup subsystems.
//!
//! Two other flows already own parts of the filesystem: the deep-clean
//! routine owns the well-known per-user cache/log/trash roots, and the
//! build-artifact purge owns recognizable dependency/output directories.
//! The explorer must never propose deleting something those flows manage,
//! so both predicates below are consulted before a path is offered.

use std::path::Path;

/// Per-user roots owned by the deep-clean routine, relative to a home
/// directory under `/Users/<name>/`.
///
/// This table duplicates the path list the shell-based cleaner acts on and
/// must stay in sync with it; the tests pin the exact entries. Matching is
/// exact and case-sensitive.
pub const DEEP_CLEAN_USER_ROOTS: &[&str] = &[
    "Library/Caches",
    "Library/Logs",
    "Library/Saved Application State",
    ".Trash",
];

/// System-wide roots owned by the deep-clean routine.
pub const DEEP_CLEAN_SYSTEM_ROOTS: &[&str] = &[
    "/Library/Caches",
    "/Library/Logs",
    "/private/var/log",
    "/private/var/folders",
];

/// Directory names recognized as build artifacts, owned by the purge flow.
///
/// Matched by exact final-segment equality, never substring.
pub const CLEANABLE_DIR_NAMES: &[&str] = &[
    // Dependency / vendor directories
    "node_modules",
    "bower_components",
    "vendor",
    ".venv",
    // Build / output directories
    "target",
    "build",
    "dist",
    "out",
    "DerivedData",
    // Coverage output
    "coverage",
    ".nyc_output",
    // Framework-specific caches
    "__pycache__",
    ".gradle",
    ".next",
    ".nuxt",
    "Pods",
];

/// True iff `path` falls under one of the fixed deep-clean roots.
///
/// Per-user roots match beneath any `/Users/<name>/` home; system roots
/// match directly. Prefix comparison is case-sensitive and segment-boundary
/// aware, so `/users/u/library/caches` does not match and neither does
/// `/Library/CachesExtra`.
pub fn is_handled_by_mo_clean(path: &str) -> bool {
    if path.is_empty() || path == "/" {
        return false;
    }

    if let Some(rest) = path.strip_prefix("/Users/") {
        // Skip the user-name segment; what follows must sit under a
        // per-user deep-clean root.
        if let Some((user, below_home)) = rest.split_once('/') {
            if !user.is_empty() {
                return DEEP_CLEAN_USER_ROOTS
                    .iter()
                    .any(|root| matches_prefix_segment(below_home, root));
            }
        }
        return false;
    }

    DEEP_CLEAN_SYSTEM_ROOTS
        .iter()
        .any(|root| matches_prefix_segment(path, root))
}

/// True iff the final path segment names a known build-artifact directory
/// and the path is not already claimed by the deep-clean routine.
pub fn is_cleanable_dir(path: &str) -> bool {
    if path.is_empty() || path == "/" {
        return false;
    }
    if is_handled_by_mo_clean(path) {
        return false;
    }

    let Some(name) = Path::new(path).file_name() else {
        return false;
    };

    CLEANABLE_DIR_NAMES
        .iter()
        .any(|candidate| name == std::ffi::OsStr::new(candidate))
}

/// Prefix match that only succeeds on whole path segments: `prefix` itself,
/// or `prefix` followed by a separator.
fn matches_prefix_segment(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}
