//! Caller identity and privilege names
//!
//! Token verification and role resolution happen in the HTTP layer; by the
//! time a call reaches the governance aggregate it carries a resolved
//! `SecurityContext`. Privileges are checked by OR-ing over the caller's
//! platform role ids.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Identity of the caller of a governance operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityContext {
    /// Resolved username (the maker/checker identity)
    pub username: String,

    /// Calling application id
    pub client_id: String,

    /// Platform role ids the caller holds
    pub platform_role_ids: Vec<String>,

    /// Bearer token, forwarded to collaborators that act under the
    /// caller's identity (see `LedgerService::set_token`)
    pub access_token: String,
}

impl SecurityContext {
    /// Context for operations the service performs on its own behalf
    /// (bootstrap, event-driven reconciliation).
    pub fn system() -> Self {
        Self {
            username: "(system)".to_string(),
            client_id: "participants-svc".to_string(),
            platform_role_ids: Vec::new(),
            access_token: String::new(),
        }
    }
}

/// Privileges guarding governance operations.
///
/// Wire/audit names are the SCREAMING_SNAKE_CASE forms.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Privilege {
    CreateParticipant,
    ApproveParticipant,
    EnableParticipant,
    DisableParticipant,
    ViewParticipant,
    ManageEndpoints,
    CreateAccountChangeRequest,
    ApproveAccountChangeRequest,
    CreateSourceIpChangeRequest,
    ApproveSourceIpChangeRequest,
    CreateContactInfoChangeRequest,
    ApproveContactInfoChangeRequest,
    CreateNdcChangeRequest,
    ApproveNdcChangeRequest,
    CreateFundsDeposit,
    ApproveFundsDeposit,
    CreateFundsWithdrawal,
    ApproveFundsWithdrawal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_privilege_wire_names() {
        assert_eq!(Privilege::CreateParticipant.to_string(), "CREATE_PARTICIPANT");
        assert_eq!(
            Privilege::ApproveNdcChangeRequest.to_string(),
            "APPROVE_NDC_CHANGE_REQUEST"
        );
        assert_eq!(
            Privilege::from_str("CREATE_FUNDS_DEPOSIT").unwrap(),
            Privilege::CreateFundsDeposit
        );
    }

    #[test]
    fn test_system_context() {
        let ctx = SecurityContext::system();
        assert_eq!(ctx.username, "(system)");
        assert!(ctx.platform_role_ids.is_empty());
    }
}
