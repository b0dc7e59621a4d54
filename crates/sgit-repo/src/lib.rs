//! The sgit repository controller.
//!
//! This crate owns the on-disk control layout and orchestrates the four
//! repository operations:
//!
//! - `init` — create the control skeleton, the empty root snapshot, the
//!   staging area, and the head pointer
//! - `add` — stage working files into the staging area
//! - `commit` — persist staging as a new immutable snapshot and advance head
//! - `status` — classify every working-tree file against staging and head
//!
//! A [`RepoLayout`] is constructed once per command invocation and passed to
//! every operation; there is no ambient global state. Exactly one active
//! caller per repository is assumed — there is no locking, and concurrent
//! invocations may corrupt staging or head.

pub mod error;
pub mod layout;
pub mod repository;

pub use error::{RepoError, RepoResult};
pub use layout::{RepoLayout, CONTROL_DIR};
pub use repository::{CommitOutcome, Repository};
