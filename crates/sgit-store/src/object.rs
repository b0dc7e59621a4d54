use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sgit_types::{ContentHasher, ObjectId};

use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// The kind of object stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Raw file content.
    Blob,
    /// A serialized tree node: parent link plus tracked-file metadata.
    Snapshot,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blob => write!(f, "blob"),
            Self::Snapshot => write!(f, "snapshot"),
        }
    }
}

/// A stored object: kind tag + serialized data.
///
/// `StoredObject` is the unit of storage. The store never interprets the
/// contents of the data — it is a pure key-value store keyed by content hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The type of this object.
    pub kind: ObjectKind,
    /// The serialized bytes of the object.
    pub data: Vec<u8>,
}

impl StoredObject {
    /// Create a new stored object from kind and data.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        Self { kind, data }
    }

    /// Compute the content-addressed id for this object.
    ///
    /// Uses the appropriate domain-separated hasher for each object kind.
    pub fn compute_id(&self) -> ObjectId {
        let hasher = match self.kind {
            ObjectKind::Blob => &ContentHasher::BLOB,
            ObjectKind::Snapshot => &ContentHasher::SNAPSHOT,
        };
        hasher.hash(&self.data)
    }
}

// ---------------------------------------------------------------------------
// Blob
// ---------------------------------------------------------------------------

/// Raw content object: one file's content at one point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    /// Create a new blob from raw bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Blob, self.data.clone())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        if obj.kind != ObjectKind::Blob {
            return Err(StoreError::CorruptObject {
                reason: format!("expected blob, got {}", obj.kind),
            });
        }
        Ok(Self {
            data: obj.data.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// FileMeta
// ---------------------------------------------------------------------------

/// Metadata for one tracked path in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileMeta {
    /// Path relative to the working root, `/`-separated.
    pub path: String,
    /// Content hash of the file's bytes.
    pub hash: ObjectId,
    /// Store-relative location of the backing blob (`files/<hex>`).
    pub blob_ref: String,
}

impl FileMeta {
    /// Create metadata for `path` backed by the blob with id `hash`.
    pub fn new(path: impl Into<String>, hash: ObjectId) -> Self {
        Self {
            path: path.into(),
            hash,
            blob_ref: format!("files/{}", hash.to_hex()),
        }
    }

    /// Validate a record loaded from persistent storage.
    ///
    /// Rejects empty or absolute paths and a `blob_ref` that does not point at
    /// the blob named by `hash`. Runs at load time so stale-schema records
    /// fail immediately instead of on first use.
    pub fn validate(&self) -> StoreResult<()> {
        if self.path.is_empty() {
            return Err(StoreError::CorruptObject {
                reason: "file record with empty path".into(),
            });
        }
        if self.path.starts_with('/') {
            return Err(StoreError::CorruptObject {
                reason: format!("file record with absolute path: {}", self.path),
            });
        }
        let expected = format!("files/{}", self.hash.to_hex());
        if self.blob_ref != expected {
            return Err(StoreError::CorruptObject {
                reason: format!(
                    "blob_ref {} does not match content hash for {}",
                    self.blob_ref, self.path
                ),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A tree node: an immutable-once-committed record of the tracked files at one
/// point in history, linked to its parent snapshot.
///
/// Snapshots form a hash-linked chain: a committed snapshot's identity is the
/// content hash of its serialized form, and that form embeds the parent's id.
/// The serialized record keeps `files_meta` in ascending path order, so two
/// logically identical snapshots serialize byte-identically and hash
/// identically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    parent: Option<ObjectId>,
    files_meta: BTreeMap<String, FileMeta>,
}

/// Canonical on-disk form of a snapshot.
#[derive(Serialize)]
struct SnapshotRecordRef<'a> {
    parent: &'a Option<ObjectId>,
    files_meta: Vec<&'a FileMeta>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotRecord {
    parent: Option<ObjectId>,
    files_meta: Vec<FileMeta>,
}

impl Snapshot {
    /// Create an empty root snapshot (no parent, no tracked files).
    pub fn empty() -> Self {
        Self {
            parent: None,
            files_meta: BTreeMap::new(),
        }
    }

    /// Create an empty snapshot descending from `parent`.
    pub fn with_parent(parent: ObjectId) -> Self {
        Self {
            parent: Some(parent),
            files_meta: BTreeMap::new(),
        }
    }

    /// The parent snapshot id (`None` only for the root snapshot).
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Re-point the parent link. Used when staging is rebased onto a newly
    /// committed snapshot.
    pub fn set_parent(&mut self, parent: ObjectId) {
        self.parent = Some(parent);
    }

    /// All tracked files, keyed by path in ascending order.
    pub fn files_meta(&self) -> &BTreeMap<String, FileMeta> {
        &self.files_meta
    }

    /// Look up the metadata for a tracked path.
    pub fn get(&self, path: &str) -> Option<&FileMeta> {
        self.files_meta.get(path)
    }

    /// Number of tracked files.
    pub fn len(&self) -> usize {
        self.files_meta.len()
    }

    /// Returns `true` if no files are tracked.
    pub fn is_empty(&self) -> bool {
        self.files_meta.is_empty()
    }

    /// Track the current content of `path`.
    ///
    /// Hashes `content`; if `path` is untracked or its stored hash differs,
    /// writes the blob to `store` and replaces the file's metadata, returning
    /// the new record. Returns `Ok(None)` when the content is already tracked
    /// unchanged. This is the sole mutation entry point for `files_meta`.
    pub fn track(
        &mut self,
        path: &str,
        content: &[u8],
        store: &dyn ObjectStore,
    ) -> StoreResult<Option<&FileMeta>> {
        let hash = ContentHasher::BLOB.hash(content);
        if let Some(existing) = self.files_meta.get(path) {
            if existing.hash == hash {
                return Ok(None);
            }
        }

        let blob = Blob::new(content.to_vec());
        let id = store.write(&blob.to_stored_object())?;

        let meta = FileMeta::new(path, id);
        meta.validate()?;
        self.files_meta.insert(path.to_string(), meta);
        Ok(self.files_meta.get(path))
    }

    /// Serialize into the canonical record form.
    ///
    /// Entries are emitted in ascending path order (the map's iteration
    /// order), which makes the encoding deterministic.
    pub fn serialize(&self) -> StoreResult<Vec<u8>> {
        let record = SnapshotRecordRef {
            parent: &self.parent,
            files_meta: self.files_meta.values().collect(),
        };
        serde_json::to_vec(&record).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Decode and validate a canonical record.
    ///
    /// Every file record is validated and duplicate paths are rejected, so a
    /// malformed or stale-schema record fails here rather than later.
    pub fn deserialize(bytes: &[u8]) -> StoreResult<Self> {
        let record: SnapshotRecord =
            serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut files_meta = BTreeMap::new();
        for meta in record.files_meta {
            meta.validate()?;
            let path = meta.path.clone();
            if files_meta.insert(path.clone(), meta).is_some() {
                return Err(StoreError::CorruptObject {
                    reason: format!("duplicate path in snapshot record: {path}"),
                });
            }
        }

        Ok(Self {
            parent: record.parent,
            files_meta,
        })
    }

    /// The content-addressed id of this snapshot's serialized form.
    pub fn compute_id(&self) -> StoreResult<ObjectId> {
        Ok(ContentHasher::SNAPSHOT.hash(&self.serialize()?))
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        Ok(StoredObject::new(ObjectKind::Snapshot, self.serialize()?))
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        if obj.kind != ObjectKind::Snapshot {
            return Err(StoreError::CorruptObject {
                reason: format!("expected snapshot, got {}", obj.kind),
            });
        }
        Self::deserialize(&obj.data)
    }
}
