//! Append-only change log carried on every participant record
//!
//! Entries are kept newest-first. A single governance operation may append
//! two entries (request approval followed by the materialized action); the
//! second one is stamped one millisecond later so relative order survives
//! same-millisecond writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Actions recorded in the participant change log.
///
/// The SCREAMING_SNAKE_CASE forms double as audit action names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantChangeAction {
    ParticipantCreated,
    ParticipantApproved,
    ParticipantEnabled,
    ParticipantDisabled,

    ParticipantEndpointAdded,
    ParticipantEndpointChanged,
    ParticipantEndpointRemoved,

    ParticipantAccountChangeRequestCreated,
    ParticipantAccountChangeRequestApproved,
    ParticipantAccountAdded,
    ParticipantAccountChanged,

    ParticipantSourceIpChangeRequestCreated,
    ParticipantSourceIpChangeRequestApproved,
    ParticipantSourceIpAdded,
    ParticipantSourceIpChanged,

    ParticipantContactInfoChangeRequestCreated,
    ParticipantContactInfoChangeRequestApproved,
    ParticipantContactInfoAdded,
    ParticipantContactInfoChanged,

    ParticipantNdcChangeRequestCreated,
    ParticipantNdcChangeRequestApproved,
    ParticipantNdcAdded,
    ParticipantNdcChanged,
    ParticipantNdcRecalculated,

    FundsDepositCreated,
    FundsDepositApproved,
    FundsWithdrawalCreated,
    FundsWithdrawalApproved,
}

/// One timestamped entry in a participant's change log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub action: ParticipantChangeAction,
    pub user: String,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
}

impl ChangeLogEntry {
    pub fn new(
        action: ParticipantChangeAction,
        user: impl Into<String>,
        timestamp: DateTime<Utc>,
        notes: Option<String>,
    ) -> Self {
        Self {
            action,
            user: user.into(),
            timestamp,
            notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_names() {
        assert_eq!(
            ParticipantChangeAction::ParticipantCreated.to_string(),
            "PARTICIPANT_CREATED"
        );
        assert_eq!(
            ParticipantChangeAction::FundsWithdrawalApproved.to_string(),
            "FUNDS_WITHDRAWAL_APPROVED"
        );
        assert_eq!(
            ParticipantChangeAction::ParticipantNdcRecalculated.to_string(),
            "PARTICIPANT_NDC_RECALCULATED"
        );
    }

    #[test]
    fn test_serde_wire_names() {
        let json =
            serde_json::to_string(&ParticipantChangeAction::ParticipantAccountAdded).unwrap();
        assert_eq!(json, "\"PARTICIPANT_ACCOUNT_ADDED\"");
    }
}
