/// Errors that can occur during staging and status operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// A path tracked by the head snapshot is missing from staging.
    ///
    /// Staging must be a superset of head; this signals corruption or a logic
    /// defect and is never auto-repaired.
    #[error("integrity violation: committed path missing from staging: {0}")]
    Integrity(String),

    /// An input path cannot be staged (outside the working tree, not a file
    /// or directory, or not valid UTF-8).
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] sgit_store::StoreError),

    /// Filesystem error while reading the working tree or the staging slot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
