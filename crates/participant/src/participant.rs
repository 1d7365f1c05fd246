//! The Participant aggregate record
//!
//! A participant exclusively owns all of its nested collections; nothing
//! outside the aggregate holds references into them. Ledger accounts are
//! referenced by id and owned by the external ledger service.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use uuid::Uuid;

use crate::account::{AccountChangeRequest, AccountType, ParticipantAccount};
use crate::changelog::{ChangeLogEntry, ParticipantChangeAction};
use crate::contact::{ContactInfo, ContactInfoChangeRequest};
use crate::endpoint::ParticipantEndpoint;
use crate::funds::FundsMovement;
use crate::ndc::{NdcChangeRequest, NetDebitCap};
use crate::source_ip::{AllowedSourceIp, SourceIpChangeRequest};
use hubadmin_core::Currency;

/// Reserved id of the single hub participant, created at bootstrap
pub const HUB_PARTICIPANT_ID: &str = "hub";

/// Maximum length of a participant id
pub const MAX_PARTICIPANT_ID_LENGTH: usize = 32;

/// Participant kind. HUB is system-reserved; exactly one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantType {
    Regular,
    Hub,
}

/// A financial institution connected to the settlement hub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identifier, immutable after creation (<= 32 chars)
    pub id: String,
    /// Unique display name
    pub name: String,
    pub participant_type: ParticipantType,

    pub is_active: bool,
    pub approved: bool,
    pub approved_by: Option<String>,
    pub approved_date: Option<DateTime<Utc>>,

    pub created_by: String,
    pub created_date: DateTime<Utc>,

    /// Optimistic-concurrency token; bumped by the repository on store
    pub version: u64,

    /// Newest-first audit trail of actions applied to this record
    pub change_log: Vec<ChangeLogEntry>,

    pub accounts: Vec<ParticipantAccount>,
    pub account_change_requests: Vec<AccountChangeRequest>,
    pub endpoints: Vec<ParticipantEndpoint>,
    pub allowed_source_ips: Vec<AllowedSourceIp>,
    pub source_ip_change_requests: Vec<SourceIpChangeRequest>,
    pub contacts: Vec<ContactInfo>,
    pub contact_info_change_requests: Vec<ContactInfoChangeRequest>,
    pub funds_movements: Vec<FundsMovement>,
    pub net_debit_caps: Vec<NetDebitCap>,
    pub ndc_change_requests: Vec<NdcChangeRequest>,
}

impl Participant {
    /// New unapproved, inactive participant with a single CREATED log entry.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        let created_by = created_by.into();
        let mut participant = Self {
            id: id.into(),
            name: name.into(),
            participant_type: ParticipantType::Regular,
            is_active: false,
            approved: false,
            approved_by: None,
            approved_date: None,
            created_by: created_by.clone(),
            created_date: Utc::now(),
            version: 0,
            change_log: Vec::new(),
            accounts: Vec::new(),
            account_change_requests: Vec::new(),
            endpoints: Vec::new(),
            allowed_source_ips: Vec::new(),
            source_ip_change_requests: Vec::new(),
            contacts: Vec::new(),
            contact_info_change_requests: Vec::new(),
            funds_movements: Vec::new(),
            net_debit_caps: Vec::new(),
            ndc_change_requests: Vec::new(),
        };
        participant.record_change(
            ParticipantChangeAction::ParticipantCreated,
            created_by,
            None,
        );
        participant
    }

    /// The reserved hub participant, pre-approved and active.
    ///
    /// Only bootstrap calls this; the normal creation path rejects HUB.
    pub fn hub(created_by: impl Into<String>) -> Self {
        let mut hub = Self::new(HUB_PARTICIPANT_ID, "HUB", created_by);
        hub.participant_type = ParticipantType::Hub;
        hub.is_active = true;
        hub.approved = true;
        hub.approved_by = Some(hub.created_by.clone());
        hub.approved_date = Some(hub.created_date);
        hub
    }

    /// Generate a 32-char participant id (v4 uuid, separators stripped)
    pub fn generate_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    pub fn is_hub(&self) -> bool {
        self.participant_type == ParticipantType::Hub
    }

    /// Append a change-log entry stamped now. Entries are kept newest-first.
    pub fn record_change(
        &mut self,
        action: ParticipantChangeAction,
        user: impl Into<String>,
        notes: Option<String>,
    ) {
        self.record_change_at(action, user, notes, Utc::now());
    }

    /// Append a change-log entry with an explicit timestamp.
    pub fn record_change_at(
        &mut self,
        action: ParticipantChangeAction,
        user: impl Into<String>,
        notes: Option<String>,
        timestamp: DateTime<Utc>,
    ) {
        self.change_log
            .insert(0, ChangeLogEntry::new(action, user, timestamp, notes));
    }

    /// Append the approval entry and the materialized-action entry for one
    /// approved change request. The second entry is stamped `now + 1ms` so
    /// relative order is deterministic even within one millisecond.
    pub fn record_approval_pair(
        &mut self,
        approval: ParticipantChangeAction,
        materialized: ParticipantChangeAction,
        user: &str,
        now: DateTime<Utc>,
    ) {
        self.record_change_at(approval, user, None, now);
        self.record_change_at(materialized, user, None, now + Duration::milliseconds(1));
    }

    pub fn account_by_id(&self, id: &str) -> Option<&ParticipantAccount> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// The participant's account of the given type and currency, if any
    pub fn account_of_type(
        &self,
        account_type: AccountType,
        currency: &Currency,
    ) -> Option<&ParticipantAccount> {
        self.accounts
            .iter()
            .find(|a| a.account_type == account_type && &a.currency == currency)
    }

    pub fn endpoint_by_id(&self, id: &str) -> Option<&ParticipantEndpoint> {
        self.endpoints.iter().find(|e| e.id == id)
    }

    pub fn funds_movement_by_id(&self, id: &str) -> Option<&FundsMovement> {
        self.funds_movements.iter().find(|f| f.state.id == id)
    }

    /// The single NDC record for a currency, if defined
    pub fn net_debit_cap_for(&self, currency: &Currency) -> Option<&NetDebitCap> {
        self.net_debit_caps.iter().find(|n| &n.currency == currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_participant_is_unapproved_and_inactive() {
        let participant = Participant::new("p1", "Alpha Bank", "alice");
        assert!(!participant.approved);
        assert!(!participant.is_active);
        assert_eq!(participant.participant_type, ParticipantType::Regular);
        assert_eq!(participant.change_log.len(), 1);
        assert_eq!(
            participant.change_log[0].action,
            ParticipantChangeAction::ParticipantCreated
        );
    }

    #[test]
    fn test_hub_is_approved_and_active() {
        let hub = Participant::hub("(system)");
        assert_eq!(hub.id, HUB_PARTICIPANT_ID);
        assert!(hub.is_hub());
        assert!(hub.approved);
        assert!(hub.is_active);
    }

    #[test]
    fn test_generated_id_is_32_chars_without_separators() {
        let id = Participant::generate_id();
        assert_eq!(id.len(), 32);
        assert!(!id.contains('-'));
    }

    #[test]
    fn test_change_log_is_newest_first() {
        let mut participant = Participant::new("p1", "Alpha Bank", "alice");
        participant.record_change(
            ParticipantChangeAction::ParticipantApproved,
            "bob",
            None,
        );

        assert_eq!(
            participant.change_log[0].action,
            ParticipantChangeAction::ParticipantApproved
        );
        assert_eq!(
            participant.change_log[1].action,
            ParticipantChangeAction::ParticipantCreated
        );
    }

    #[test]
    fn test_approval_pair_orders_deterministically() {
        let mut participant = Participant::new("p1", "Alpha Bank", "alice");
        let now = Utc::now();
        participant.record_approval_pair(
            ParticipantChangeAction::ParticipantAccountChangeRequestApproved,
            ParticipantChangeAction::ParticipantAccountAdded,
            "bob",
            now,
        );

        assert_eq!(
            participant.change_log[0].action,
            ParticipantChangeAction::ParticipantAccountAdded
        );
        assert_eq!(
            participant.change_log[1].action,
            ParticipantChangeAction::ParticipantAccountChangeRequestApproved
        );
        assert!(participant.change_log[0].timestamp > participant.change_log[1].timestamp);
    }

    #[test]
    fn test_account_of_type_lookup() {
        let mut participant = Participant::new("p1", "Alpha Bank", "alice");
        participant.accounts.push(ParticipantAccount::new(
            "acc-1",
            AccountType::Settlement,
            Currency::Usd,
        ));

        assert!(participant
            .account_of_type(AccountType::Settlement, &Currency::Usd)
            .is_some());
        assert!(participant
            .account_of_type(AccountType::Position, &Currency::Usd)
            .is_none());
        assert!(participant
            .account_of_type(AccountType::Settlement, &Currency::Eur)
            .is_none());
    }
}
