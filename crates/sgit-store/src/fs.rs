use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use sgit_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::{ObjectKind, StoredObject};
use crate::traits::ObjectStore;

/// Directory under the store root holding compressed blob objects.
pub const FILES_DIR: &str = "files";
/// Directory under the store root holding snapshot objects.
pub const TREE_DIR: &str = "tree";

/// zstd compression level for blob payloads.
const ZSTD_LEVEL: i32 = 3;

/// On-disk object store rooted at a repository's `objects/` directory.
///
/// Layout:
///
/// ```text
/// <root>/files/<hex-id>   compressed blob, keyed by content hash
/// <root>/tree/<hex-id>    snapshot record, keyed by hash of its serialized form
/// ```
///
/// Blobs are zstd-compressed on disk but identified by the hash of their
/// uncompressed bytes; snapshot records are stored as written. Reads recompute
/// the content hash and fail on mismatch, so a corrupted object can never be
/// returned as valid. Writes land in a temporary file that is flushed, synced,
/// and renamed into place, so a crash mid-write never leaves a truncated
/// object visible under its id.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Open a store rooted at `root`. The directory skeleton must already
    /// exist (see [`FsObjectStore::init`]).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the store directory skeleton at `root` and open it.
    pub fn init(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(root.join(FILES_DIR))?;
        std::fs::create_dir_all(root.join(TREE_DIR))?;
        Ok(Self { root })
    }

    /// The store root (the `objects/` directory).
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, kind: ObjectKind, id: &ObjectId) -> PathBuf {
        let dir = match kind {
            ObjectKind::Blob => FILES_DIR,
            ObjectKind::Snapshot => TREE_DIR,
        };
        self.root.join(dir).join(id.to_hex())
    }

    fn read_at(&self, kind: ObjectKind, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        let Some(payload) = read_if_present(&self.object_path(kind, id))? else {
            return Ok(None);
        };
        let data = match kind {
            ObjectKind::Blob => zstd::decode_all(payload.as_slice())?,
            ObjectKind::Snapshot => payload,
        };
        let object = StoredObject::new(kind, data);
        let computed = object.compute_id();
        if computed != *id {
            return Err(StoreError::HashMismatch { id: *id, computed });
        }
        Ok(Some(object))
    }
}

impl ObjectStore for FsObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        if let Some(object) = self.read_at(ObjectKind::Blob, id)? {
            return Ok(Some(object));
        }
        self.read_at(ObjectKind::Snapshot, id)
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        let path = self.object_path(object.kind, &id);
        if path.exists() {
            // Write-once: identical content is already durable under this id.
            return Ok(id);
        }

        let payload = match object.kind {
            ObjectKind::Blob => zstd::encode_all(object.data.as_slice(), ZSTD_LEVEL)?,
            ObjectKind::Snapshot => object.data.clone(),
        };
        write_durable(&path, &payload)?;
        debug!(kind = %object.kind, id = %id.short_hex(), bytes = payload.len(), "stored object");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(ObjectKind::Blob, id).exists()
            || self.object_path(ObjectKind::Snapshot, id).exists())
    }
}

impl std::fmt::Debug for FsObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsObjectStore")
            .field("root", &self.root)
            .finish()
    }
}

fn read_if_present(path: &Path) -> StoreResult<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write `payload` to `path` through a temp file in the same directory:
/// write, flush, sync, then rename into place. A reader never observes a
/// truncated file under `path`. Also used for the staging and head slots,
/// which are replaced in place rather than content-addressed.
pub fn write_durable(path: &Path, payload: &[u8]) -> StoreResult<()> {
    let dir = path.parent().ok_or_else(|| StoreError::CorruptObject {
        reason: format!("object path has no parent directory: {}", path.display()),
    })?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(payload)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}
