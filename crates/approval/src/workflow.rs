//! Generic maker-checker workflow
//!
//! The same submit/pending/approve shape serves every change-request
//! category; the category supplies its payload rules through a
//! [`ChangePolicy`] implementation.

use chrono::{DateTime, Utc};
use hubadmin_participant::{ChangeRequest, Participant, ParticipantChangeAction};

use crate::error::{ApprovalError, ChangeCategory};

/// The result of materializing an approved change into the live collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedChange {
    /// Id of the live record that was created or amended
    pub id: String,
    /// Change-log / audit action describing the materialization
    pub action: ParticipantChangeAction,
}

/// Per-category capability set plugged into the generic workflow.
///
/// `Input` carries externally-obtained materialization data: the upstream
/// ledger account id for account ADDs, the computed cap value for NDCs,
/// `()` where materialization is self-contained.
pub trait ChangePolicy {
    type Request: ChangeRequest + Clone + Send + Sync;
    type Input: Send;

    fn category() -> ChangeCategory;

    fn requests(participant: &Participant) -> &[Self::Request];
    fn requests_mut(participant: &mut Participant) -> &mut Vec<Self::Request>;

    /// Payload validation applied at submission time
    fn validate(participant: &Participant, request: &Self::Request) -> Result<(), ApprovalError>;

    /// Duplicate detection against the live collection. ADD requests compare
    /// against all existing records; CHANGE requests compare the full new
    /// value tuple against all existing tuples, not just the target record.
    fn find_conflict(participant: &Participant, request: &Self::Request) -> Option<String>;

    /// Apply the change to the live collection. Assigns a new id for ADD,
    /// mutates the target in place for CHANGE.
    fn materialize(
        participant: &mut Participant,
        request: &Self::Request,
        input: Self::Input,
    ) -> Result<MaterializedChange, ApprovalError>;

    /// Change-log / audit action recorded when a request is submitted
    fn created_action() -> ParticipantChangeAction;

    /// Change-log / audit action recorded for the approval itself
    fn approved_action() -> ParticipantChangeAction;
}

/// Submit a new pending request after validating its payload.
///
/// Appends the request with `approved = false` and records one change-log
/// entry under the maker's identity. Returns the request id.
pub fn submit<P: ChangePolicy>(
    participant: &mut Participant,
    request: P::Request,
) -> Result<String, ApprovalError> {
    P::validate(participant, &request)?;

    let request_id = request.id().to_string();
    if P::requests(participant)
        .iter()
        .any(|existing| existing.id() == request_id)
    {
        return Err(ApprovalError::DuplicateRequestId {
            category: P::category(),
            request_id,
        });
    }

    let created_by = request.state().created_by.clone();
    P::requests_mut(participant).push(request);
    participant.record_change(P::created_action(), created_by, None);

    Ok(request_id)
}

/// Locate a request and run the pre-approval checks in their fixed order:
/// not-found, already-approved, then maker-checker. The privilege check
/// belongs to the caller and comes after the self-approval check.
pub fn pending<'a, P: ChangePolicy>(
    participant: &'a Participant,
    request_id: &str,
    checker: &str,
) -> Result<&'a P::Request, ApprovalError> {
    let request = P::requests(participant)
        .iter()
        .find(|request| request.id() == request_id)
        .ok_or_else(|| ApprovalError::NotFound {
            category: P::category(),
            request_id: request_id.to_string(),
        })?;

    if request.is_approved() {
        return Err(ApprovalError::AlreadyApproved {
            category: P::category(),
            request_id: request_id.to_string(),
        });
    }

    if request.state().created_by == checker {
        return Err(ApprovalError::MakerCheckerViolation {
            username: checker.to_string(),
        });
    }

    Ok(request)
}

/// Run the category's duplicate detection against the live collection.
pub fn check_conflict<P: ChangePolicy>(
    participant: &Participant,
    request: &P::Request,
) -> Result<(), ApprovalError> {
    if let Some(detail) = P::find_conflict(participant, request) {
        return Err(ApprovalError::DuplicateChange {
            category: P::category(),
            detail,
        });
    }
    Ok(())
}

/// Approve a pending request and materialize it into the live collection.
///
/// Re-runs the full ordered check chain, materializes, marks the request
/// approved (terminal), and records the approval-then-materialized pair of
/// change-log entries at `now` and `now + 1ms`.
pub fn approve<P: ChangePolicy>(
    participant: &mut Participant,
    request_id: &str,
    checker: &str,
    input: P::Input,
    now: DateTime<Utc>,
) -> Result<MaterializedChange, ApprovalError> {
    let request = pending::<P>(participant, request_id, checker)?.clone();
    check_conflict::<P>(participant, &request)?;

    let materialized = P::materialize(participant, &request, input)?;

    let state = P::requests_mut(participant)
        .iter_mut()
        .find(|request| request.id() == request_id)
        .ok_or_else(|| ApprovalError::NotFound {
            category: P::category(),
            request_id: request_id.to_string(),
        })?
        .state_mut();
    state.mark_approved(checker, now);

    participant.record_approval_pair(P::approved_action(), materialized.action, checker, now);

    Ok(materialized)
}
