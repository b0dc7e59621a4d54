use sgit_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. Content-addressing guarantees this:
///   the same data always produces the same id.
/// - Writes are idempotent: repeated writes of identical content are no-ops
///   after the first and return the same id (write-once deduplication).
/// - The store never interprets object contents — it is a pure key-value store.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Read an object by its content-addressed id.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` on I/O failure or data corruption.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>>;

    /// Write an object and return its content-addressed id.
    ///
    /// If the object already exists, this is a no-op (idempotent).
    /// The returned id is computed from the object's kind and data.
    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Read an object that must exist; a missing object is `NotFound`.
    fn read_required(&self, id: &ObjectId) -> StoreResult<StoredObject> {
        self.read(id)?.ok_or(StoreError::NotFound(*id))
    }
}
