//! HubAdmin governance - the participant governance aggregate
//!
//! [`ParticipantService`] orchestrates every participant mutation: privilege
//! checks, maker-checker invariants, persistence, audit emission and
//! domain-change events, plus hub bootstrap and settlement-driven ledger
//! reconciliation.
//!
//! # Operations
//! - lifecycle: create, approve, activate/deactivate, queries
//! - endpoints: direct add/change/remove under one manage privilege
//! - change requests: accounts, source IPs, contact info, net debit caps
//!   through the generic maker-checker workflow
//! - funds movements: operator deposits/withdrawals posted to the ledger
//! - settlement: matrix-settled reconciliation and NDC recalculation

pub mod commands;
pub mod endpoints;
pub mod error;
pub mod funds;
pub mod lifecycle;
pub mod requests;
pub mod service;
pub mod settlement;

pub use commands::{
    AccountChangeCommand, ContactInfoChangeCommand, CreateParticipantCommand, EndpointCommand,
    FundsMovementCommand, NdcChangeCommand, SourceIpChangeCommand,
};
pub use error::GovernanceError;
pub use service::ParticipantService;
