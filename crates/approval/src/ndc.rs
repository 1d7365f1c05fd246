//! Net-debit-cap change-request policy
//!
//! A participant holds a single NDC per currency, so approval upserts:
//! create when no record exists for the currency, overwrite otherwise. The
//! effective `current_value` is computed by the caller against the live
//! settlement balance and passed in as materialization input.

use hubadmin_core::Amount;
use hubadmin_participant::{
    NdcChangeRequest, NdcType, NetDebitCap, Participant, ParticipantChangeAction,
};
use rust_decimal::Decimal;

use crate::error::{ApprovalError, ChangeCategory};
use crate::workflow::{ChangePolicy, MaterializedChange};

pub struct NdcChangePolicy;

impl NdcChangePolicy {
    fn invalid(detail: impl Into<String>) -> ApprovalError {
        ApprovalError::Invalid {
            category: ChangeCategory::NetDebitCap,
            detail: detail.into(),
        }
    }
}

impl ChangePolicy for NdcChangePolicy {
    type Request = NdcChangeRequest;
    /// Cap value computed against the live settlement balance
    type Input = Amount;

    fn category() -> ChangeCategory {
        ChangeCategory::NetDebitCap
    }

    fn requests(participant: &Participant) -> &[Self::Request] {
        &participant.ndc_change_requests
    }

    fn requests_mut(participant: &mut Participant) -> &mut Vec<Self::Request> {
        &mut participant.ndc_change_requests
    }

    fn validate(_participant: &Participant, request: &Self::Request) -> Result<(), ApprovalError> {
        match request.ndc_type {
            NdcType::Absolute => {
                if request.fixed_value.is_none() {
                    return Err(Self::invalid("ABSOLUTE requests require a fixed value"));
                }
            }
            NdcType::Percentage => {
                let percentage = request
                    .percentage
                    .ok_or_else(|| Self::invalid("PERCENTAGE requests require a percentage"))?;
                if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
                    return Err(Self::invalid(format!(
                        "percentage must lie within [0, 100]: {percentage}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn find_conflict(_participant: &Participant, _request: &Self::Request) -> Option<String> {
        // Upsert semantics: an existing cap for the currency is overwritten,
        // never a conflict.
        None
    }

    fn materialize(
        participant: &mut Participant,
        request: &Self::Request,
        input: Self::Input,
    ) -> Result<MaterializedChange, ApprovalError> {
        let currency_code = request.currency.code().to_string();

        if let Some(existing) = participant
            .net_debit_caps
            .iter_mut()
            .find(|ndc| ndc.currency == request.currency)
        {
            existing.ndc_type = request.ndc_type;
            existing.percentage = request.percentage;
            existing.current_value = input;

            Ok(MaterializedChange {
                id: currency_code,
                action: ParticipantChangeAction::ParticipantNdcChanged,
            })
        } else {
            participant.net_debit_caps.push(NetDebitCap {
                currency: request.currency.clone(),
                ndc_type: request.ndc_type,
                percentage: request.percentage,
                current_value: input,
            });

            Ok(MaterializedChange {
                id: currency_code,
                action: ParticipantChangeAction::ParticipantNdcAdded,
            })
        }
    }

    fn created_action() -> ParticipantChangeAction {
        ParticipantChangeAction::ParticipantNdcChangeRequestCreated
    }

    fn approved_action() -> ParticipantChangeAction {
        ParticipantChangeAction::ParticipantNdcChangeRequestApproved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{approve, submit};
    use chrono::Utc;
    use hubadmin_core::Currency;
    use hubadmin_participant::ChangeRequestState;
    use rust_decimal_macros::dec;

    fn participant() -> Participant {
        Participant::new("p1", "Alpha Bank", "admin")
    }

    fn absolute_request(id: &str, fixed_value: Option<Decimal>) -> NdcChangeRequest {
        NdcChangeRequest {
            state: ChangeRequestState::new(Some(id.to_string()), "alice"),
            currency: Currency::Usd,
            ndc_type: NdcType::Absolute,
            percentage: None,
            fixed_value,
            ext_reference: None,
            note: None,
        }
    }

    #[test]
    fn test_absolute_requires_fixed_value() {
        let mut p = participant();
        let result = submit::<NdcChangePolicy>(&mut p, absolute_request("req-1", None));
        assert!(matches!(result, Err(ApprovalError::Invalid { .. })));
    }

    #[test]
    fn test_percentage_out_of_range_rejected() {
        let mut p = participant();
        let request = NdcChangeRequest {
            state: ChangeRequestState::new(Some("req-1".to_string()), "alice"),
            currency: Currency::Usd,
            ndc_type: NdcType::Percentage,
            percentage: Some(dec!(101)),
            fixed_value: None,
            ext_reference: None,
            note: None,
        };
        let result = submit::<NdcChangePolicy>(&mut p, request);
        assert!(matches!(result, Err(ApprovalError::Invalid { .. })));
    }

    #[test]
    fn test_approval_creates_single_record_per_currency() {
        let mut p = participant();
        submit::<NdcChangePolicy>(&mut p, absolute_request("req-1", Some(dec!(1000)))).unwrap();

        let value = Amount::new(dec!(1000)).unwrap();
        let outcome = approve::<NdcChangePolicy>(&mut p, "req-1", "bob", value, Utc::now()).unwrap();

        assert_eq!(outcome.id, "USD");
        assert_eq!(
            outcome.action,
            ParticipantChangeAction::ParticipantNdcAdded
        );
        assert_eq!(p.net_debit_caps.len(), 1);
        assert_eq!(p.net_debit_caps[0].current_value, value);
    }

    #[test]
    fn test_second_approval_overwrites_existing_record() {
        let mut p = participant();
        submit::<NdcChangePolicy>(&mut p, absolute_request("req-1", Some(dec!(1000)))).unwrap();
        approve::<NdcChangePolicy>(
            &mut p,
            "req-1",
            "bob",
            Amount::new(dec!(1000)).unwrap(),
            Utc::now(),
        )
        .unwrap();

        let percentage_request = NdcChangeRequest {
            state: ChangeRequestState::new(Some("req-2".to_string()), "alice"),
            currency: Currency::Usd,
            ndc_type: NdcType::Percentage,
            percentage: Some(dec!(40)),
            fixed_value: None,
            ext_reference: None,
            note: None,
        };
        submit::<NdcChangePolicy>(&mut p, percentage_request).unwrap();

        let value = Amount::new(dec!(400)).unwrap();
        let outcome = approve::<NdcChangePolicy>(&mut p, "req-2", "bob", value, Utc::now()).unwrap();

        assert_eq!(
            outcome.action,
            ParticipantChangeAction::ParticipantNdcChanged
        );
        assert_eq!(p.net_debit_caps.len(), 1);
        assert_eq!(p.net_debit_caps[0].ndc_type, NdcType::Percentage);
        assert_eq!(p.net_debit_caps[0].current_value, value);
    }
}
