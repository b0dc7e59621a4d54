//! The staging area and status engine for sgit.
//!
//! The staging area is the single mutable [`Snapshot`](sgit_store::Snapshot)
//! in a repository: it always descends from the current head and accumulates
//! pending changes until they are committed. This crate owns its persistence
//! slot (`STAG`) and the working-tree expansion performed by `add`.
//!
//! The status engine classifies every working-tree file by comparing its
//! current content hash against the staged and committed hashes.

pub mod error;
pub mod staging;
pub mod status;
pub mod walk;

pub use error::{IndexError, IndexResult};
pub use staging::{relative_path, StagingArea};
pub use status::{classify, FileState, StatusReport};
pub use walk::workdir_files;
