//! On-disk control layout and repository discovery.

use std::path::{Path, PathBuf};

/// Name of the control directory that marks an initialized repository.
pub const CONTROL_DIR: &str = ".sgit";
/// Head pointer file, relative to the control directory.
const HEAD_FILE: &str = "HEAD";
/// Staging slot, relative to the control directory.
const STAG_FILE: &str = "STAG";
/// Object store root, relative to the control directory.
const OBJECTS_DIR: &str = "objects";
/// Well-known name of the bootstrap copy of the root snapshot.
pub const ROOT_NODE: &str = "root_node";

/// All control paths of one repository, derived from its working root.
///
/// A `RepoLayout` is a plain value constructed once per command invocation;
/// operations receive it explicitly instead of consulting any process-wide
/// state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoLayout {
    working_root: PathBuf,
}

impl RepoLayout {
    /// Layout for the repository rooted at `working_root`.
    pub fn new(working_root: impl Into<PathBuf>) -> Self {
        Self {
            working_root: working_root.into(),
        }
    }

    /// Search `start` and its ancestors for the control marker.
    ///
    /// Returns the layout of the innermost enclosing repository, or `None`
    /// when the filesystem root is reached without finding one.
    pub fn discover(start: &Path) -> Option<Self> {
        start
            .ancestors()
            .find(|dir| dir.join(CONTROL_DIR).is_dir())
            .map(Self::new)
    }

    /// The repository's working root.
    pub fn working_root(&self) -> &Path {
        &self.working_root
    }

    /// The control directory (`<root>/.sgit`).
    pub fn control_dir(&self) -> PathBuf {
        self.working_root.join(CONTROL_DIR)
    }

    /// The head pointer file.
    pub fn head_file(&self) -> PathBuf {
        self.control_dir().join(HEAD_FILE)
    }

    /// The staging slot.
    pub fn staging_slot(&self) -> PathBuf {
        self.control_dir().join(STAG_FILE)
    }

    /// The object store root.
    pub fn objects_dir(&self) -> PathBuf {
        self.control_dir().join(OBJECTS_DIR)
    }

    /// The bootstrap copy of the root snapshot.
    pub fn root_node_file(&self) -> PathBuf {
        self.objects_dir()
            .join(sgit_store::fs::TREE_DIR)
            .join(ROOT_NODE)
    }

    /// Whether the control marker exists.
    pub fn is_initialized(&self) -> bool {
        self.control_dir().is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_derive_from_working_root() {
        let layout = RepoLayout::new("/work");
        assert_eq!(layout.control_dir(), Path::new("/work/.sgit"));
        assert_eq!(layout.head_file(), Path::new("/work/.sgit/HEAD"));
        assert_eq!(layout.staging_slot(), Path::new("/work/.sgit/STAG"));
        assert_eq!(layout.objects_dir(), Path::new("/work/.sgit/objects"));
        assert_eq!(
            layout.root_node_file(),
            Path::new("/work/.sgit/objects/tree/root_node")
        );
    }

    #[test]
    fn discover_finds_marker_in_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(CONTROL_DIR)).unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        let layout = RepoLayout::discover(&nested).unwrap();
        assert_eq!(layout.working_root(), dir.path());
    }

    #[test]
    fn discover_prefers_innermost_repository() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(CONTROL_DIR)).unwrap();
        let inner = dir.path().join("inner");
        std::fs::create_dir_all(inner.join(CONTROL_DIR)).unwrap();
        let nested = inner.join("sub");
        std::fs::create_dir_all(&nested).unwrap();

        let layout = RepoLayout::discover(&nested).unwrap();
        assert_eq!(layout.working_root(), inner);
    }

    #[test]
    fn discover_fails_without_marker() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RepoLayout::discover(dir.path()).is_none());
    }

    #[test]
    fn is_initialized_tracks_marker() {
        let dir = tempfile::tempdir().unwrap();
        let layout = RepoLayout::new(dir.path());
        assert!(!layout.is_initialized());
        std::fs::create_dir_all(layout.control_dir()).unwrap();
        assert!(layout.is_initialized());
    }
}
