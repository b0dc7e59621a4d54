//! The repository controller: init, add, commit, status.

use std::path::{Path, PathBuf};

use tracing::debug;

use sgit_index::{classify, relative_path, workdir_files, StagingArea, StatusReport};
use sgit_store::{write_durable, FsObjectStore, ObjectStore, Snapshot};
use sgit_types::{ContentHasher, ObjectId};

use crate::error::{RepoError, RepoResult};
use crate::layout::{RepoLayout, CONTROL_DIR};

/// Result of a commit attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Staging was identical to its parent snapshot: nothing was written and
    /// head is unchanged. Repeating the commit yields the same outcome.
    Unchanged(ObjectId),
    /// A new snapshot was persisted and head now points at it.
    Committed(ObjectId),
}

impl CommitOutcome {
    /// The head id after the operation.
    pub fn head(&self) -> ObjectId {
        match self {
            Self::Unchanged(id) | Self::Committed(id) => *id,
        }
    }
}

/// An opened repository: the control layout plus its object store.
///
/// One `Repository` serves one command invocation. Commands run to completion
/// synchronously; the design assumes a single active caller per repository
/// and provides no locking.
#[derive(Debug)]
pub struct Repository {
    layout: RepoLayout,
    store: FsObjectStore,
    invocation_dir: PathBuf,
}

impl Repository {
    /// Initialize a new repository at `root`.
    ///
    /// Creates the control skeleton, writes the empty root snapshot (and its
    /// bootstrap copy under `tree/root_node`), creates the staging area
    /// descending from the root, and points head at the root id.
    pub fn init(root: &Path) -> RepoResult<Self> {
        let root = root.canonicalize()?;
        let layout = RepoLayout::new(&root);
        if layout.is_initialized() {
            return Err(RepoError::AlreadyInitialized(root));
        }

        std::fs::create_dir_all(layout.control_dir())?;
        let store = FsObjectStore::init(layout.objects_dir())?;

        let root_snapshot = Snapshot::empty();
        let stored = root_snapshot.to_stored_object()?;
        let root_id = store.write(&stored)?;
        write_durable(&layout.root_node_file(), &stored.data)?;

        StagingArea::create(layout.staging_slot(), root_id)?;
        write_head(&layout, root_id)?;
        debug!(root = %root_id.short_hex(), path = %root.display(), "initialized repository");

        Ok(Self {
            layout,
            store,
            invocation_dir: root,
        })
    }

    /// Open the repository enclosing `start`.
    ///
    /// Searches `start` and its ancestors for the control marker and fails
    /// with `RepoNotFound` when the search is exhausted.
    pub fn open(start: &Path) -> RepoResult<Self> {
        let start = start.canonicalize()?;
        let layout = RepoLayout::discover(&start)
            .ok_or_else(|| RepoError::RepoNotFound(start.clone()))?;
        let store = FsObjectStore::new(layout.objects_dir());
        Ok(Self {
            layout,
            store,
            invocation_dir: start,
        })
    }

    /// The repository's control layout.
    pub fn layout(&self) -> &RepoLayout {
        &self.layout
    }

    /// The repository's object store.
    pub fn store(&self) -> &FsObjectStore {
        &self.store
    }

    /// The current head snapshot id.
    pub fn head(&self) -> RepoResult<ObjectId> {
        let text = std::fs::read_to_string(self.layout.head_file())?;
        ObjectId::from_hex(text.trim()).map_err(|e| RepoError::MalformedHead(e.to_string()))
    }

    /// Stage the given paths, resolved against the invocation directory.
    ///
    /// Returns the working-root-relative paths that were examined.
    pub fn add(&self, paths: &[PathBuf]) -> RepoResult<Vec<String>> {
        let mut staging = StagingArea::load(self.layout.staging_slot())?;

        let mut resolved = Vec::with_capacity(paths.len());
        for path in paths {
            let absolute = if path.is_absolute() {
                path.clone()
            } else {
                self.invocation_dir.join(path)
            };
            let absolute = absolute
                .canonicalize()
                .map_err(|_| RepoError::PathOutsideRepository(path.clone()))?;
            if !absolute.starts_with(self.layout.working_root()) {
                return Err(RepoError::PathOutsideRepository(absolute));
            }
            resolved.push(absolute);
        }

        let examined = staging.stage(
            &resolved,
            self.layout.working_root(),
            CONTROL_DIR,
            &self.store,
        )?;
        Ok(examined)
    }

    /// Commit the staging area.
    ///
    /// When staging's tracked files equal its parent snapshot's, the commit
    /// is a no-op: no object is written and head does not move. Otherwise the
    /// serialized staging record is persisted as a new snapshot object, and
    /// only after that write succeeds is staging rebased onto the new id and
    /// head advanced. A crash between those steps leaves head at the old
    /// value; re-running commit reproduces the same snapshot id.
    pub fn commit(&self) -> RepoResult<CommitOutcome> {
        let mut staging = StagingArea::load(self.layout.staging_slot())?;
        let parent_id = staging
            .parent()
            .ok_or_else(|| RepoError::CorruptStaging("staging has no parent".into()))?;

        let parent = self.load_snapshot(&parent_id)?;
        if parent.files_meta() == staging.snapshot().files_meta() {
            debug!(head = %parent_id.short_hex(), "staging matches parent; nothing to commit");
            return Ok(CommitOutcome::Unchanged(parent_id));
        }

        let stored = staging.snapshot().to_stored_object()?;
        let new_id = self.store.write(&stored)?;
        staging.rebase(new_id)?;
        write_head(&self.layout, new_id)?;
        debug!(head = %new_id.short_hex(), "committed snapshot");
        Ok(CommitOutcome::Committed(new_id))
    }

    /// Classify every working-tree file against staging and head.
    pub fn status(&self) -> RepoResult<StatusReport> {
        let head = self.load_snapshot(&self.head()?)?;
        let staging = StagingArea::load(self.layout.staging_slot())?;

        let mut report = StatusReport::new();
        for entry in workdir_files(self.layout.working_root(), CONTROL_DIR) {
            let file = entry.map_err(std::io::Error::from)?;
            let rel = relative_path(&file, self.layout.working_root())?;
            let content = std::fs::read(&file)?;
            let file_hash = ContentHasher::BLOB.hash(&content);

            let state = classify(
                &rel,
                file_hash,
                staging.snapshot().get(&rel),
                head.get(&rel),
            )?;
            report.insert(rel, state);
        }
        Ok(report)
    }

    fn load_snapshot(&self, id: &ObjectId) -> RepoResult<Snapshot> {
        let stored = self.store.read_required(id)?;
        Ok(Snapshot::from_stored_object(&stored)?)
    }
}

fn write_head(layout: &RepoLayout, id: ObjectId) -> RepoResult<()> {
    let mut text = id.to_hex();
    text.push('\n');
    write_durable(&layout.head_file(), text.as_bytes())?;
    Ok(())
}
