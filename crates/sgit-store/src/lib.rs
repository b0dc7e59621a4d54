//! Content-addressed object storage for sgit.
//!
//! This crate implements a hash-keyed object store analogous to git's
//! `.git/objects/` directory. Every piece of data in sgit -- file contents and
//! snapshots -- is stored as an immutable object identified by its BLAKE3 hash
//! (domain-separated by object kind).
//!
//! # Object Types
//!
//! - [`Blob`] -- raw file content, stored compressed
//! - [`Snapshot`] -- a tree node: parent link plus tracked-file metadata
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsObjectStore`] -- on-disk store under a repository's `objects/` tree
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Write-then-link: write object, verify hash, then update references.
//! 3. Writes of already-present content are no-ops (write-once deduplication).
//! 4. The store never interprets object contents -- it is a pure key-value store.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use fs::{write_durable, FsObjectStore};
pub use memory::InMemoryObjectStore;
pub use object::{Blob, FileMeta, ObjectKind, Snapshot, StoredObject};
pub use traits::ObjectStore;
