//! HubAdmin participant model
//!
//! This is the HEART of the governance service: the `Participant` aggregate
//! record and every sub-entity it exclusively owns (accounts, endpoints,
//! allowed source IPs, contacts, funds movements, net debit caps, and the
//! change requests that gate mutations to them).
//!
//! # Key Types
//! - `Participant`: the aggregate record, with a newest-first change log
//! - `ChangeRequestState`: the shared maker-checker request shape
//! - `ParticipantAccount` / `AccountType`: ledger-backed accounts
//! - `NetDebitCap`: derived per-currency debit ceiling

pub mod account;
pub mod changelog;
pub mod contact;
pub mod endpoint;
pub mod funds;
pub mod ndc;
pub mod participant;
pub mod request;
pub mod source_ip;

pub use account::{AccountChangeKind, AccountChangeRequest, AccountType, ParticipantAccount};
pub use changelog::{ChangeLogEntry, ParticipantChangeAction};
pub use contact::{ContactChangeKind, ContactInfo, ContactInfoChangeRequest};
pub use endpoint::{EndpointProtocol, EndpointType, ParticipantEndpoint};
pub use funds::{FundsDirection, FundsMovement};
pub use ndc::{NdcChangeRequest, NdcType, NetDebitCap};
pub use participant::{
    Participant, ParticipantType, HUB_PARTICIPANT_ID, MAX_PARTICIPANT_ID_LENGTH,
};
pub use request::{ChangeRequest, ChangeRequestState};
pub use source_ip::{
    AllowedSourceIp, PortMode, PortRange, SourceIpChangeKind, SourceIpChangeRequest,
};
