//! Shared maker-checker change-request state
//!
//! Every change-request category (and funds movements, which share the same
//! shape) embeds this state. Invariants enforced by the approval workflow:
//! the approver is never the creator, a request is approved at most once,
//! and approval is terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle fields common to all change requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequestState {
    /// Request id (caller-supplied or generated)
    pub id: String,

    /// Maker identity
    pub created_by: String,

    pub created_date: DateTime<Utc>,

    /// CREATED -> APPROVED is the only transition; there is no rejected
    /// or expired state in this model
    pub approved: bool,

    /// Checker identity, set on approval
    pub approved_by: Option<String>,

    pub approved_date: Option<DateTime<Utc>>,
}

impl ChangeRequestState {
    /// New pending request. Generates a v4 uuid when no id is supplied.
    pub fn new(id: Option<String>, created_by: impl Into<String>) -> Self {
        Self {
            id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            created_by: created_by.into(),
            created_date: Utc::now(),
            approved: false,
            approved_by: None,
            approved_date: None,
        }
    }

    /// Terminal transition to APPROVED.
    pub fn mark_approved(&mut self, approved_by: impl Into<String>, at: DateTime<Utc>) {
        self.approved = true;
        self.approved_by = Some(approved_by.into());
        self.approved_date = Some(at);
    }
}

/// Access to the shared state, implemented by every request type
pub trait ChangeRequest {
    fn state(&self) -> &ChangeRequestState;
    fn state_mut(&mut self) -> &mut ChangeRequestState;

    fn id(&self) -> &str {
        &self.state().id
    }

    fn is_approved(&self) -> bool {
        self.state().approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_is_pending() {
        let state = ChangeRequestState::new(None, "alice");
        assert!(!state.approved);
        assert!(state.approved_by.is_none());
        assert_eq!(state.created_by, "alice");
        assert!(!state.id.is_empty());
    }

    #[test]
    fn test_supplied_id_is_kept() {
        let state = ChangeRequestState::new(Some("req-1".to_string()), "alice");
        assert_eq!(state.id, "req-1");
    }

    #[test]
    fn test_mark_approved() {
        let mut state = ChangeRequestState::new(None, "alice");
        let now = Utc::now();
        state.mark_approved("bob", now);
        assert!(state.approved);
        assert_eq!(state.approved_by.as_deref(), Some("bob"));
        assert_eq!(state.approved_date, Some(now));
    }
}
