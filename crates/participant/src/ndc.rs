//! Net debit caps and their change requests
//!
//! A participant holds at most one NDC per currency. `current_value` is
//! derived from the live settlement balance by the risk calculator; it is
//! written only by the approval and reconciliation paths, never edited
//! directly.

use hubadmin_core::{Amount, Currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::request::{ChangeRequest, ChangeRequestState};

/// How the cap is defined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NdcType {
    /// Fixed amount, still clamped to the settlement balance
    Absolute,
    /// Percentage of the settlement balance
    Percentage,
}

/// The effective debit ceiling for one currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetDebitCap {
    pub currency: Currency,
    pub ndc_type: NdcType,
    /// Defined for PERCENTAGE caps
    pub percentage: Option<Decimal>,
    /// Derived usable ceiling, always within [0, settlement balance]
    pub current_value: Amount,
}

/// Pending NDC definition awaiting a checker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NdcChangeRequest {
    #[serde(flatten)]
    pub state: ChangeRequestState,

    pub currency: Currency,
    pub ndc_type: NdcType,
    /// Required for PERCENTAGE requests; must lie in [0, 100]
    pub percentage: Option<Decimal>,
    /// Required for ABSOLUTE requests
    pub fixed_value: Option<Decimal>,
    pub ext_reference: Option<String>,
    pub note: Option<String>,
}

impl ChangeRequest for NdcChangeRequest {
    fn state(&self) -> &ChangeRequestState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ChangeRequestState {
        &mut self.state
    }
}
