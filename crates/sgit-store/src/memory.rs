use std::collections::HashMap;
use std::sync::RwLock;

use sgit_types::ObjectId;

use crate::error::StoreResult;
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding. All objects are held in memory behind a
/// `RwLock` for safe concurrent access. Objects are cloned on read/write.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ObjectId, StoredObject>>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.get(id).cloned())
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        let mut map = self.objects.write().expect("lock poisoned");
        // Idempotent: if already present, skip (content-addressing guarantees
        // the same id always maps to the same content).
        map.entry(id).or_insert_with(|| object.clone());
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::object::{Blob, ObjectKind};

    fn make_blob(content: &[u8]) -> StoredObject {
        Blob::new(content.to_vec()).to_stored_object()
    }

    #[test]
    fn write_and_read_blob() {
        let store = InMemoryObjectStore::new();
        let obj = make_blob(b"hello world");
        let id = store.write(&obj).unwrap();

        let read_back = store.read(&id).unwrap().expect("should exist");
        assert_eq!(read_back, obj);
        assert_eq!(read_back.kind, ObjectKind::Blob);
    }

    #[test]
    fn same_content_produces_same_id() {
        let store = InMemoryObjectStore::new();
        let id1 = store.write(&make_blob(b"identical content")).unwrap();
        let id2 = store.write(&make_blob(b"identical content")).unwrap();
        assert_eq!(id1, id2);
        // Only one object stored (dedup)
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn different_content_produces_different_ids() {
        let store = InMemoryObjectStore::new();
        let id1 = store.write(&make_blob(b"aaa")).unwrap();
        let id2 = store.write(&make_blob(b"bbb")).unwrap();
        assert_ne!(id1, id2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn write_is_idempotent() {
        let store = InMemoryObjectStore::new();
        let obj = make_blob(b"idempotent");
        for _ in 0..5 {
            let id = store.write(&obj).unwrap();
            assert_eq!(id, obj.compute_id());
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn read_missing_object_returns_none() {
        let store = InMemoryObjectStore::new();
        let id = ObjectId::from_bytes(b"missing");
        assert!(store.read(&id).unwrap().is_none());
    }

    #[test]
    fn read_required_missing_is_not_found() {
        let store = InMemoryObjectStore::new();
        let id = ObjectId::from_bytes(b"missing");
        let err = store.read_required(&id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn exists_reflects_contents() {
        let store = InMemoryObjectStore::new();
        let id = store.write(&make_blob(b"present")).unwrap();
        assert!(store.exists(&id).unwrap());
        assert!(!store.exists(&ObjectId::from_bytes(b"absent")).unwrap());
    }

    #[test]
    fn len_and_is_empty() {
        let store = InMemoryObjectStore::new();
        assert!(store.is_empty());
        store.write(&make_blob(b"a")).unwrap();
        assert!(!store.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn debug_format() {
        let store = InMemoryObjectStore::new();
        store.write(&make_blob(b"x")).unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryObjectStore"));
        assert!(debug.contains("object_count"));
    }
}
