//! Inbound settlement-matrix-settled notification
//!
//! Distributed by the settlement engine after a multilateral netting matrix
//! settles. Delivery is at-least-once; the governance service deduplicates
//! on `settlementMatrixId`.

use chrono::{DateTime, Utc};
use hubadmin_core::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One participant's settled position in the matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementParticipantEntry {
    pub participant_id: String,
    /// Absent when the matrix carries a non-monetary entry for the
    /// participant; such entries are skipped
    #[serde(default)]
    pub currency_code: Option<Currency>,
    #[serde(with = "rust_decimal::serde::str")]
    pub settled_credit_balance: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub settled_debit_balance: Decimal,
}

/// The settlement engine's matrix-settled notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementMatrixSettledEvent {
    pub settlement_matrix_id: String,
    pub settled_timestamp: DateTime<Utc>,
    pub participant_list: Vec<SettlementParticipantEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_wire_event() {
        let json = r#"{
            "settlementMatrixId": "sm-001",
            "settledTimestamp": "2024-03-01T12:00:00Z",
            "participantList": [
                {
                    "participantId": "P1",
                    "currencyCode": "USD",
                    "settledCreditBalance": "100",
                    "settledDebitBalance": "0"
                }
            ]
        }"#;

        let event: SettlementMatrixSettledEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.settlement_matrix_id, "sm-001");
        assert_eq!(event.participant_list.len(), 1);

        let entry = &event.participant_list[0];
        assert_eq!(entry.participant_id, "P1");
        assert_eq!(entry.currency_code, Some(Currency::Usd));
        assert_eq!(entry.settled_credit_balance, dec!(100));
        assert_eq!(entry.settled_debit_balance, Decimal::ZERO);
    }

    #[test]
    fn test_balances_serialize_as_strings() {
        let event = SettlementMatrixSettledEvent {
            settlement_matrix_id: "sm-002".to_string(),
            settled_timestamp: Utc::now(),
            participant_list: vec![SettlementParticipantEntry {
                participant_id: "P1".to_string(),
                currency_code: Some(Currency::Eur),
                settled_credit_balance: dec!(12.50),
                settled_debit_balance: Decimal::ZERO,
            }],
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["participantList"][0]["settledCreditBalance"], "12.50");
        assert_eq!(json["participantList"][0]["currencyCode"], "EUR");
    }
}
