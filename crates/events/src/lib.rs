//! HubAdmin events - wire-level event types
//!
//! Outbound: one [`ParticipantChangedEvent`] per successful mutating action,
//! consumed by unspecified downstream subscribers.
//! Inbound: the [`SettlementMatrixSettledEvent`] notification distributed by
//! the settlement engine after a matrix settles.
//!
//! Field names are camelCase on the wire; settled balances travel as
//! string-encoded decimals.

pub mod changed;
pub mod settlement;

pub use changed::ParticipantChangedEvent;
pub use settlement::{SettlementMatrixSettledEvent, SettlementParticipantEntry};
