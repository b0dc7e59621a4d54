use std::path::PathBuf;

/// Errors surfaced by repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// `init` was invoked where a repository already exists.
    #[error("repository already initialized at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    /// No control marker was found in the invocation directory or any of its
    /// ancestors.
    #[error("no repository found in {} or any parent directory", .0.display())]
    RepoNotFound(PathBuf),

    /// An input path lies outside the repository working tree.
    #[error("path is outside the repository: {}", .0.display())]
    PathOutsideRepository(PathBuf),

    /// The head pointer file does not contain a valid snapshot id.
    #[error("malformed head pointer: {0}")]
    MalformedHead(String),

    /// The staging record is structurally invalid for this repository.
    #[error("corrupt staging record: {0}")]
    CorruptStaging(String),

    /// Staging or status operation failed.
    #[error("index error: {0}")]
    Index(#[from] sgit_index::IndexError),

    /// Object store operation failed.
    #[error("store error: {0}")]
    Store(#[from] sgit_store::StoreError),

    /// Filesystem error outside the object store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;
