//! Operator-initiated funds movements
//!
//! Funds movements share the maker-checker request shape. The ledger
//! transfer id is recorded only after the journal posting succeeds on
//! approval.

use hubadmin_core::{Amount, Currency};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::request::{ChangeRequest, ChangeRequestState};

/// Direction of a funds movement between the hub and a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundsDirection {
    Deposit,
    Withdrawal,
}

/// A pending or executed operator funds movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundsMovement {
    #[serde(flatten)]
    pub state: ChangeRequestState,

    pub direction: FundsDirection,
    pub currency: Currency,
    pub amount: Amount,

    /// Ledger journal entry id; set only once the posting succeeded
    pub transfer_id: Option<String>,

    pub ext_reference: Option<String>,
    pub note: Option<String>,
}

impl ChangeRequest for FundsMovement {
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
    use rust_decimal_macros::dec;

    #[test]
    fn test_direction_wire_names() {
        assert_eq!(FundsDirection::Deposit.to_string(), "DEPOSIT");
        assert_eq!(FundsDirection::Withdrawal.to_string(), "WITHDRAWAL");
    }

    #[test]
    fn test_new_movement_has_no_transfer_id() {
        let movement = FundsMovement {
            state: ChangeRequestState::new(None, "alice"),
            direction: FundsDirection::Deposit,
            currency: Currency::Usd,
            amount: Amount::new(dec!(1000)).unwrap(),
            transfer_id: None,
            ext_reference: None,
            note: None,
        };

        assert!(!movement.is_approved());
        assert!(movement.transfer_id.is_none());
    }
}
