//! Working-tree status classification.
//!
//! Every file discovered in the working tree is classified by comparing its
//! current content hash (`f`) against the staged hash (`s`, if the path is
//! staged) and the committed hash (`h`, if the path is in the head snapshot).
//! Equality to the staged hash is checked before equality to the head hash;
//! this precedence decides staged-vs-modified and must be preserved.

use std::collections::btree_map;
use std::collections::BTreeMap;

use sgit_store::FileMeta;
use sgit_types::ObjectId;

use crate::error::{IndexError, IndexResult};

/// The classification of one working-tree file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileState {
    /// Content matches both the staged and committed hashes.
    Unchanged,
    /// Content matches the staged hash, which differs from (or has no)
    /// committed counterpart.
    Staged,
    /// Content differs from the staged hash.
    Modified,
    /// The path is neither staged nor committed.
    New,
}

impl std::fmt::Display for FileState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unchanged => write!(f, "unchanged"),
            Self::Staged => write!(f, "staged"),
            Self::Modified => write!(f, "modified"),
            Self::New => write!(f, "new"),
        }
    }
}

/// Classify one file given its current content hash and the staged/committed
/// metadata for its path.
///
/// The table is total: every presence/equality combination maps to exactly
/// one outcome. A path present in head but absent from staging violates the
/// staging-superset invariant and surfaces as an integrity error.
pub fn classify(
    path: &str,
    file_hash: ObjectId,
    staged: Option<&FileMeta>,
    committed: Option<&FileMeta>,
) -> IndexResult<FileState> {
    let Some(staged) = staged else {
        return match committed {
            Some(_) => Err(IndexError::Integrity(path.to_string())),
            None => Ok(FileState::New),
        };
    };

    // Staged-hash comparison comes first: a file that no longer matches what
    // was staged is modified even if it happens to match the head.
    if file_hash != staged.hash {
        return Ok(FileState::Modified);
    }
    match committed {
        Some(committed) if committed.hash == staged.hash => Ok(FileState::Unchanged),
        _ => Ok(FileState::Staged),
    }
}

/// Ordered mapping from working-root-relative path to classification.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusReport {
    entries: BTreeMap<String, FileState>,
}

impl StatusReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the classification for a path.
    pub fn insert(&mut self, path: impl Into<String>, state: FileState) {
        self.entries.insert(path.into(), state);
    }

    /// Look up the classification for a path.
    pub fn get(&self, path: &str) -> Option<FileState> {
        self.entries.get(path).copied()
    }

    /// Iterate over entries in ascending path order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, FileState> {
        self.entries.iter()
    }

    /// Number of classified files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no files were classified.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if every classified file is unchanged.
    pub fn is_clean(&self) -> bool {
        self.entries.values().all(|s| *s == FileState::Unchanged)
    }
}

impl<'a> IntoIterator for &'a StatusReport {
    type Item = (&'a String, &'a FileState);
    type IntoIter = btree_map::Iter<'a, String, FileState>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgit_types::ContentHasher;

    fn meta(content: &[u8]) -> FileMeta {
        FileMeta::new("a.txt", ContentHasher::BLOB.hash(content))
    }

    fn hash(content: &[u8]) -> ObjectId {
        ContentHasher::BLOB.hash(content)
    }

    // -----------------------------------------------------------------------
    // Classification table, row by row
    // -----------------------------------------------------------------------

    #[test]
    fn committed_but_not_staged_is_integrity_error() {
        let committed = meta(b"v1");
        let err = classify("a.txt", hash(b"v1"), None, Some(&committed)).unwrap_err();
        assert!(matches!(err, IndexError::Integrity(p) if p == "a.txt"));
    }

    #[test]
    fn all_three_equal_is_unchanged() {
        let staged = meta(b"v1");
        let committed = meta(b"v1");
        let state = classify("a.txt", hash(b"v1"), Some(&staged), Some(&committed)).unwrap();
        assert_eq!(state, FileState::Unchanged);
    }

    #[test]
    fn staged_differs_from_committed_is_staged() {
        let staged = meta(b"v2");
        let committed = meta(b"v1");
        let state = classify("a.txt", hash(b"v2"), Some(&staged), Some(&committed)).unwrap();
        assert_eq!(state, FileState::Staged);
    }

    #[test]
    fn working_differs_from_staged_is_modified() {
        let staged = meta(b"v1");
        let committed = meta(b"v1");
        let state = classify("a.txt", hash(b"v2"), Some(&staged), Some(&committed)).unwrap();
        assert_eq!(state, FileState::Modified);
    }

    #[test]
    fn staged_hash_takes_precedence_over_head_match() {
        // Working content equals the committed version, but staging holds
        // something newer: the file is modified relative to staging.
        let staged = meta(b"v2");
        let committed = meta(b"v1");
        let state = classify("a.txt", hash(b"v1"), Some(&staged), Some(&committed)).unwrap();
        assert_eq!(state, FileState::Modified);
    }

    #[test]
    fn staged_only_matching_is_staged() {
        let staged = meta(b"v1");
        let state = classify("a.txt", hash(b"v1"), Some(&staged), None).unwrap();
        assert_eq!(state, FileState::Staged);
    }

    #[test]
    fn staged_only_differing_is_modified() {
        let staged = meta(b"v1");
        let state = classify("a.txt", hash(b"v2"), Some(&staged), None).unwrap();
        assert_eq!(state, FileState::Modified);
    }

    #[test]
    fn untracked_is_new() {
        let state = classify("b.txt", hash(b"anything"), None, None).unwrap();
        assert_eq!(state, FileState::New);
    }

    // -----------------------------------------------------------------------
    // Report
    // -----------------------------------------------------------------------

    #[test]
    fn empty_report_is_clean() {
        let report = StatusReport::new();
        assert!(report.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn report_orders_by_path() {
        let mut report = StatusReport::new();
        report.insert("z.txt", FileState::New);
        report.insert("a.txt", FileState::Staged);
        report.insert("m.txt", FileState::Modified);

        let paths: Vec<&str> = report.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["a.txt", "m.txt", "z.txt"]);
    }

    #[test]
    fn report_with_only_unchanged_is_clean() {
        let mut report = StatusReport::new();
        report.insert("a.txt", FileState::Unchanged);
        assert!(report.is_clean());

        report.insert("b.txt", FileState::Modified);
        assert!(!report.is_clean());
    }
}
