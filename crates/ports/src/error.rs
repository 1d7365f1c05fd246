//! Collaborator error types

use thiserror::Error;

/// Errors reported by the participant persistence collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The store rejected the write; the in-memory mutation is lost and the
    /// caller must treat the operation as never having happened
    #[error("participant storage rejected the write")]
    StorageFailure,

    /// The record changed under the caller; refetch and retry
    #[error("participant record version conflict")]
    VersionConflict,
}

/// Errors reported by the external ledger collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("ledger account creation failed: {0}")]
    AccountCreationFailed(String),

    #[error("ledger account not found: {0}")]
    AccountNotFound(String),

    #[error("ledger journal posting failed: {0}")]
    JournalPostingFailed(String),
}
