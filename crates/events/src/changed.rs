//! Outbound participant-changed event

use chrono::{DateTime, Utc};
use hubadmin_participant::ParticipantChangeAction;
use serde::{Deserialize, Serialize};

/// Published once per successful mutating governance action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantChangedEvent {
    pub participant_id: String,
    /// SCREAMING_SNAKE_CASE action name, matching the change log
    pub action_name: String,
    pub timestamp: DateTime<Utc>,
}

impl ParticipantChangedEvent {
    pub fn new(participant_id: impl Into<String>, action: ParticipantChangeAction) -> Self {
        Self {
            participant_id: participant_id.into(),
            action_name: action.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let event =
            ParticipantChangedEvent::new("p1", ParticipantChangeAction::ParticipantApproved);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["participantId"], "p1");
        assert_eq!(json["actionName"], "PARTICIPANT_APPROVED");
        assert!(json["timestamp"].is_string());
    }
}
