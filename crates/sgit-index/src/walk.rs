//! Lazy working-tree traversal.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Iterate over every file under `root`, excluding any directory named
/// `exclude` (the repository's control subtree).
///
/// The traversal is lazy and yields paths in deterministic name order, so
/// callers that build ordered reports do not need to re-sort. Exclusion is a
/// filter predicate over directory entries rather than a special case in the
/// recursion.
pub fn workdir_files<'a>(
    root: &Path,
    exclude: &'a str,
) -> impl Iterator<Item = walkdir::Result<PathBuf>> + 'a {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| entry.file_name() != OsStr::new(exclude))
        .filter_map(|res| match res {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
}
