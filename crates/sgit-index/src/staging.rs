//! The staging area: the single mutable snapshot of a repository.

use std::path::{Path, PathBuf};

use tracing::debug;

use sgit_store::{write_durable, ObjectStore, Snapshot};
use sgit_types::ObjectId;

use crate::error::{IndexError, IndexResult};
use crate::walk::workdir_files;

/// The staging area: a snapshot that accumulates pending changes, plus the
/// persistence slot (`STAG`) it is stored in.
///
/// The staging snapshot is not content-addressed until committed. Its parent
/// always equals the current head at rest, and every path tracked by the head
/// is also tracked here (staging is a superset of head). Mutation follows
/// load-compute-persist: the slot is replaced atomically, so a reader never
/// observes a half-updated record.
#[derive(Debug)]
pub struct StagingArea {
    snapshot: Snapshot,
    slot: PathBuf,
}

impl StagingArea {
    /// Create a fresh, empty staging area descending from `parent` and
    /// persist it into `slot`. Used once, at repository initialization.
    pub fn create(slot: impl Into<PathBuf>, parent: ObjectId) -> IndexResult<Self> {
        let staging = Self {
            snapshot: Snapshot::with_parent(parent),
            slot: slot.into(),
        };
        staging.persist()?;
        Ok(staging)
    }

    /// Load the staging area from its slot, validating the stored record.
    pub fn load(slot: impl Into<PathBuf>) -> IndexResult<Self> {
        let slot = slot.into();
        let bytes = std::fs::read(&slot)?;
        let snapshot = Snapshot::deserialize(&bytes)?;
        Ok(Self { snapshot, slot })
    }

    /// The staged snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// The snapshot id staging descends from (the head at rest).
    pub fn parent(&self) -> Option<ObjectId> {
        self.snapshot.parent()
    }

    /// Stage the given input paths.
    ///
    /// Each input must be an absolute path inside `working_root`. Directories
    /// are expanded recursively with the `exclude` control subtree filtered
    /// out; every resulting file is read, hashed, and tracked (new content is
    /// written to `store`, unchanged content is a no-op). The updated staging
    /// record is persisted afterwards in one atomic replacement.
    ///
    /// Returns the working-root-relative paths that were examined.
    pub fn stage(
        &mut self,
        inputs: &[PathBuf],
        working_root: &Path,
        exclude: &str,
        store: &dyn ObjectStore,
    ) -> IndexResult<Vec<String>> {
        let mut examined = Vec::new();
        for input in inputs {
            if input.is_dir() {
                for entry in workdir_files(input, exclude) {
                    let file = entry.map_err(std::io::Error::from)?;
                    examined.push(self.track_file(&file, working_root, store)?);
                }
            } else if input.is_file() {
                examined.push(self.track_file(input, working_root, store)?);
            } else {
                return Err(IndexError::InvalidPath(input.display().to_string()));
            }
        }
        self.persist()?;
        debug!(files = examined.len(), "staged inputs");
        Ok(examined)
    }

    /// Re-point staging's parent to a newly committed snapshot and persist.
    /// Used only by commit, after the snapshot object is durably written.
    pub fn rebase(&mut self, new_parent: ObjectId) -> IndexResult<()> {
        self.snapshot.set_parent(new_parent);
        self.persist()
    }

    /// Persist the staging record by atomic slot replacement.
    pub fn persist(&self) -> IndexResult<()> {
        let bytes = self.snapshot.serialize()?;
        write_durable(&self.slot, &bytes)?;
        Ok(())
    }

    fn track_file(
        &mut self,
        file: &Path,
        working_root: &Path,
        store: &dyn ObjectStore,
    ) -> IndexResult<String> {
        let rel = relative_path(file, working_root)?;
        let content = std::fs::read(file)?;
        self.snapshot.track(&rel, &content, store)?;
        Ok(rel)
    }
}

/// Convert an absolute file path into the working-root-relative,
/// `/`-separated form used as the tracking key.
pub fn relative_path(path: &Path, root: &Path) -> IndexResult<String> {
    let rel = path
        .strip_prefix(root)
        .map_err(|_| IndexError::InvalidPath(path.display().to_string()))?;

    let mut parts = Vec::new();
    for component in rel.components() {
        match component.as_os_str().to_str() {
            Some(part) => parts.push(part),
            None => return Err(IndexError::InvalidPath(path.display().to_string())),
        }
    }
    if parts.is_empty() {
        return Err(IndexError::InvalidPath(path.display().to_string()));
    }
    Ok(parts.join("/"))
}
