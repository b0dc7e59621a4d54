//! Foundation types for sgit.
//!
//! This crate provides the content-addressing primitives used throughout the
//! sgit system. Every other sgit crate depends on `sgit-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Content-addressed identifier (BLAKE3 hash)
//! - [`ContentHasher`] — Domain-separated hasher for blobs and snapshots

pub mod error;
pub mod hasher;
pub mod object;

pub use error::TypeError;
pub use hasher::ContentHasher;
pub use object::ObjectId;
