//! Governance errors
//!
//! One taxonomy for every aggregate operation: not-found, validation,
//! authorization (audited as failed before propagating), upstream/ledger
//! failures (wrapped, never retried here) and integrity failures. Retry
//! policy belongs entirely to the HTTP/messaging layers above.

use hubadmin_approval::ApprovalError;
use hubadmin_core::Privilege;
use hubadmin_ports::RepositoryError;
use hubadmin_risk::NdcComputeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    // not-found
    #[error("participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("endpoint not found: {0}")]
    EndpointNotFound(String),

    #[error("funds movement not found: {0}")]
    FundsMovementNotFound(String),

    // validation
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("participant name already exists: {0}")]
    DuplicateName(String),

    #[error("participant id already exists: {0}")]
    DuplicateId(String),

    #[error("participant already approved: {0}")]
    ParticipantAlreadyApproved(String),

    #[error("funds movement already approved: {0}")]
    FundsMovementAlreadyApproved(String),

    #[error("invalid net debit cap change request: {0}")]
    InvalidNdcChangeRequest(#[from] NdcComputeError),

    // authorization
    #[error("caller lacks privilege {0}")]
    Forbidden(Privilege),

    #[error("maker-checker violation: {0} cannot approve their own action")]
    MakerCheckerViolation(String),

    // maker-checker workflow (carries its own not-found / already-approved /
    // self-approval / duplicate variants)
    #[error(transparent)]
    Approval(#[from] ApprovalError),

    // upstream / ledger
    #[error("unable to create account upstream: {0}")]
    UnableToCreateAccountUpstream(String),

    #[error("withdrawal of {amount} exceeds settlement balance of {balance}")]
    WithdrawalExceedsBalance { amount: String, balance: String },

    #[error("ledger operation failed: {0}")]
    LedgerFailure(String),

    // integrity
    #[error("could not store participant")]
    CouldNotStoreParticipant,

    #[error("participant record changed concurrently, retry the operation")]
    ConcurrencyConflict,

    #[error("hub participant record is corrupted: {0}")]
    HubRecordCorrupted(String),

    #[error("invalid settlement event: {0}")]
    InvalidSettlementEvent(String),
}

impl From<RepositoryError> for GovernanceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::StorageFailure => GovernanceError::CouldNotStoreParticipant,
            RepositoryError::VersionConflict => GovernanceError::ConcurrencyConflict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_failure_means_nothing_happened() {
        assert_eq!(
            GovernanceError::from(RepositoryError::StorageFailure),
            GovernanceError::CouldNotStoreParticipant
        );
    }

    #[test]
    fn test_version_conflict_surfaces_as_retryable() {
        assert_eq!(
            GovernanceError::from(RepositoryError::VersionConflict),
            GovernanceError::ConcurrencyConflict
        );
    }
}
