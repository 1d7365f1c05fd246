//! Participant accounts and account change requests
//!
//! Account records mirror accounts owned by the external ledger service;
//! the balances carried here are denormalized snapshots, refreshed from the
//! ledger and never computed locally.

use hubadmin_core::{Amount, Currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::request::{ChangeRequest, ChangeRequestState};

/// Ledger account types a participant can hold.
///
/// The two HUB_* types are system-reserved: only the hub participant holds
/// them, and they are created exclusively by bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Position,
    Settlement,
    HubMultilateralSettlement,
    HubReconciliation,
}

impl AccountType {
    /// True for account types only the hub participant may hold
    pub fn is_hub_reserved(&self) -> bool {
        matches!(
            self,
            AccountType::HubMultilateralSettlement | AccountType::HubReconciliation
        )
    }
}

/// A ledger account owned by a participant.
///
/// The id is assigned by the ledger service when the account is created
/// upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantAccount {
    pub id: String,
    pub account_type: AccountType,
    pub currency: Currency,

    /// Snapshot of ledger posted debits (display only)
    pub debit_balance: Option<Amount>,
    /// Snapshot of ledger posted credits (display only)
    pub credit_balance: Option<Amount>,
    /// Snapshot of the ledger net balance (display only)
    pub balance: Option<Decimal>,

    /// External bank routing metadata; SETTLEMENT accounts only
    pub external_bank_account_id: Option<String>,
    pub external_bank_account_name: Option<String>,
}

impl ParticipantAccount {
    pub fn new(
        id: impl Into<String>,
        account_type: AccountType,
        currency: Currency,
    ) -> Self {
        Self {
            id: id.into(),
            account_type,
            currency,
            debit_balance: None,
            credit_balance: None,
            balance: None,
            external_bank_account_id: None,
            external_bank_account_name: None,
        }
    }
}

/// Whether an account change request adds a new account or amends one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountChangeKind {
    AddAccount,
    ChangeAccount,
}

/// Pending account mutation awaiting a checker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountChangeRequest {
    #[serde(flatten)]
    pub state: ChangeRequestState,

    /// Target account id; required for CHANGE_ACCOUNT
    pub account_id: Option<String>,
    pub account_type: AccountType,
    pub currency: Currency,
    pub external_bank_account_id: Option<String>,
    pub external_bank_account_name: Option<String>,
    pub kind: AccountChangeKind,
}

impl ChangeRequest for AccountChangeRequest {
    fn state(&self) -> &ChangeRequestState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ChangeRequestState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_reserved_types() {
        assert!(AccountType::HubMultilateralSettlement.is_hub_reserved());
        assert!(AccountType::HubReconciliation.is_hub_reserved());
        assert!(!AccountType::Position.is_hub_reserved());
        assert!(!AccountType::Settlement.is_hub_reserved());
    }

    #[test]
    fn test_account_type_wire_names() {
        assert_eq!(AccountType::Position.to_string(), "POSITION");
        assert_eq!(
            AccountType::HubMultilateralSettlement.to_string(),
            "HUB_MULTILATERAL_SETTLEMENT"
        );
    }

    #[test]
    fn test_change_request_serde_flattens_state() {
        let request = AccountChangeRequest {
            state: ChangeRequestState::new(Some("req-1".to_string()), "alice"),
            account_id: None,
            account_type: AccountType::Settlement,
            currency: Currency::Usd,
            external_bank_account_id: None,
            external_bank_account_name: None,
            kind: AccountChangeKind::AddAccount,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["id"], "req-1");
        assert_eq!(json["kind"], "ADD_ACCOUNT");
        assert_eq!(json["account_type"], "SETTLEMENT");
    }
}
