//! Approval workflow errors

use strum_macros::Display;
use thiserror::Error;

/// The mutation category a change request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeCategory {
    Account,
    SourceIp,
    ContactInfo,
    NetDebitCap,
}

/// Errors from the maker-checker workflow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApprovalError {
    #[error("{category} change request not found: {request_id}")]
    NotFound {
        category: ChangeCategory,
        request_id: String,
    },

    #[error("{category} change request already approved: {request_id}")]
    AlreadyApproved {
        category: ChangeCategory,
        request_id: String,
    },

    #[error("{category} change request id already exists: {request_id}")]
    DuplicateRequestId {
        category: ChangeCategory,
        request_id: String,
    },

    #[error("maker-checker violation: {username} cannot approve their own request")]
    MakerCheckerViolation { username: String },

    #[error("{category} change request is invalid: {detail}")]
    Invalid {
        category: ChangeCategory,
        detail: String,
    },

    #[error("{category} change conflicts with a live record: {detail}")]
    DuplicateChange {
        category: ChangeCategory,
        detail: String,
    },

    #[error("{category} change target not found: {target_id}")]
    TargetNotFound {
        category: ChangeCategory,
        target_id: String,
    },
}
