//! HubAdmin approval - generic maker-checker change-request workflow
//!
//! Four mutation categories (accounts, source IPs, contact info, net debit
//! caps) share one maker-checker shape: a maker submits a pending request,
//! a different checker approves it, and the approval materializes the change
//! into the participant's live collection.
//!
//! Rather than four hand-copied state machines, one generic workflow is
//! parameterized by a small [`ChangePolicy`] capability set per category:
//! `validate` (payload rules at submission), `find_conflict` (duplicate
//! detection against the live collection) and `materialize` (applying the
//! change). The workflow itself enforces the invariants every category
//! shares: the request must exist, must not already be approved, and the
//! checker must not be the maker - in that order, so a maker who also holds
//! the approver privilege is still blocked.

pub mod account;
pub mod contact;
pub mod error;
pub mod ndc;
pub mod source_ip;
pub mod workflow;

pub use account::AccountChangePolicy;
pub use contact::ContactInfoChangePolicy;
pub use error::{ApprovalError, ChangeCategory};
pub use ndc::NdcChangePolicy;
pub use source_ip::SourceIpChangePolicy;
pub use workflow::{approve, check_conflict, pending, submit, ChangePolicy, MaterializedChange};
