//! Account change-request policy
//!
//! ADD materializes a new account whose id was assigned by the external
//! ledger service (the caller creates the upstream account first and passes
//! the id in). CHANGE amends the external bank metadata of the named
//! account; type and currency stay bound to the upstream ledger account.

use hubadmin_participant::{
    AccountChangeKind, AccountChangeRequest, AccountType, Participant, ParticipantAccount,
    ParticipantChangeAction,
};

use crate::error::{ApprovalError, ChangeCategory};
use crate::workflow::{ChangePolicy, MaterializedChange};

pub struct AccountChangePolicy;

impl AccountChangePolicy {
    fn invalid(detail: impl Into<String>) -> ApprovalError {
        ApprovalError::Invalid {
            category: ChangeCategory::Account,
            detail: detail.into(),
        }
    }
}

impl ChangePolicy for AccountChangePolicy {
    type Request = AccountChangeRequest;
    /// Ledger-assigned account id; required for ADD, ignored for CHANGE
    type Input = Option<String>;

    fn category() -> ChangeCategory {
        ChangeCategory::Account
    }

    fn requests(participant: &Participant) -> &[Self::Request] {
        &participant.account_change_requests
    }

    fn requests_mut(participant: &mut Participant) -> &mut Vec<Self::Request> {
        &mut participant.account_change_requests
    }

    fn validate(participant: &Participant, request: &Self::Request) -> Result<(), ApprovalError> {
        if request.account_type.is_hub_reserved() {
            return Err(Self::invalid(format!(
                "{} accounts are system-reserved and only created at bootstrap",
                request.account_type
            )));
        }

        let has_bank_metadata = request.external_bank_account_id.is_some()
            || request.external_bank_account_name.is_some();
        if has_bank_metadata && request.account_type != AccountType::Settlement {
            return Err(Self::invalid(
                "external bank account metadata is only allowed on SETTLEMENT accounts",
            ));
        }

        if request.kind == AccountChangeKind::ChangeAccount {
            let target_id = request
                .account_id
                .as_deref()
                .ok_or_else(|| Self::invalid("CHANGE_ACCOUNT must name the target account"))?;
            if participant.account_by_id(target_id).is_none() {
                return Err(ApprovalError::TargetNotFound {
                    category: ChangeCategory::Account,
                    target_id: target_id.to_string(),
                });
            }
        }

        Ok(())
    }

    fn find_conflict(participant: &Participant, request: &Self::Request) -> Option<String> {
        match request.kind {
            // ADD: at most one account per (type, currency)
            AccountChangeKind::AddAccount => participant
                .accounts
                .iter()
                .find(|account| {
                    account.account_type == request.account_type
                        && account.currency == request.currency
                })
                .map(|account| {
                    format!(
                        "account {} already has type {} in {}",
                        account.id, account.account_type, account.currency
                    )
                }),
            // CHANGE: the full new value tuple must not match any existing
            // account's tuple, the target's own included
            AccountChangeKind::ChangeAccount => participant
                .accounts
                .iter()
                .find(|account| {
                    account.account_type == request.account_type
                        && account.currency == request.currency
                        && account.external_bank_account_id == request.external_bank_account_id
                        && account.external_bank_account_name == request.external_bank_account_name
                })
                .map(|account| {
                    format!(
                        "account {} already carries the requested values",
                        account.id
                    )
                }),
        }
    }

    fn materialize(
        participant: &mut Participant,
        request: &Self::Request,
        input: Self::Input,
    ) -> Result<MaterializedChange, ApprovalError> {
        match request.kind {
            AccountChangeKind::AddAccount => {
                let account_id = input
                    .ok_or_else(|| Self::invalid("upstream ledger account id is missing"))?;
                let mut account = ParticipantAccount::new(
                    account_id.clone(),
                    request.account_type,
                    request.currency.clone(),
                );
                account.external_bank_account_id = request.external_bank_account_id.clone();
                account.external_bank_account_name = request.external_bank_account_name.clone();
                participant.accounts.push(account);

                Ok(MaterializedChange {
                    id: account_id,
                    action: ParticipantChangeAction::ParticipantAccountAdded,
                })
            }
            AccountChangeKind::ChangeAccount => {
                let target_id = request
                    .account_id
                    .clone()
                    .ok_or_else(|| Self::invalid("CHANGE_ACCOUNT must name the target account"))?;
                let account = participant
                    .accounts
                    .iter_mut()
                    .find(|account| account.id == target_id)
                    .ok_or_else(|| ApprovalError::TargetNotFound {
                        category: ChangeCategory::Account,
                        target_id: target_id.clone(),
                    })?;
                account.external_bank_account_id = request.external_bank_account_id.clone();
                account.external_bank_account_name = request.external_bank_account_name.clone();

                Ok(MaterializedChange {
                    id: target_id,
                    action: ParticipantChangeAction::ParticipantAccountChanged,
                })
            }
        }
    }

    fn created_action() -> ParticipantChangeAction {
        ParticipantChangeAction::ParticipantAccountChangeRequestCreated
    }

    fn approved_action() -> ParticipantChangeAction {
        ParticipantChangeAction::ParticipantAccountChangeRequestApproved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{approve, submit};
    use chrono::Utc;
    use hubadmin_core::Currency;
    use hubadmin_participant::ChangeRequestState;

    fn participant() -> Participant {
        Participant::new("p1", "Alpha Bank", "admin")
    }

    fn add_request(id: &str, created_by: &str, account_type: AccountType) -> AccountChangeRequest {
        AccountChangeRequest {
            state: ChangeRequestState::new(Some(id.to_string()), created_by),
            account_id: None,
            account_type,
            currency: Currency::Usd,
            external_bank_account_id: None,
            external_bank_account_name: None,
            kind: AccountChangeKind::AddAccount,
        }
    }

    #[test]
    fn test_hub_reserved_types_rejected() {
        let mut p = participant();
        let request = add_request("req-1", "alice", AccountType::HubReconciliation);
        let result = submit::<AccountChangePolicy>(&mut p, request);
        assert!(matches!(result, Err(ApprovalError::Invalid { .. })));
    }

    #[test]
    fn test_bank_metadata_requires_settlement_type() {
        let mut p = participant();
        let mut request = add_request("req-1", "alice", AccountType::Position);
        request.external_bank_account_id = Some("0011223344".to_string());
        let result = submit::<AccountChangePolicy>(&mut p, request);
        assert!(matches!(result, Err(ApprovalError::Invalid { .. })));
    }

    #[test]
    fn test_add_approval_binds_ledger_id() {
        let mut p = participant();
        submit::<AccountChangePolicy>(
            &mut p,
            add_request("req-1", "alice", AccountType::Settlement),
        )
        .unwrap();

        let outcome = approve::<AccountChangePolicy>(
            &mut p,
            "req-1",
            "bob",
            Some("ledger-acc-7".to_string()),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(outcome.id, "ledger-acc-7");
        assert_eq!(
            outcome.action,
            ParticipantChangeAction::ParticipantAccountAdded
        );
        assert_eq!(p.accounts.len(), 1);
        assert_eq!(p.accounts[0].id, "ledger-acc-7");
        assert_eq!(p.accounts[0].account_type, AccountType::Settlement);
    }

    #[test]
    fn test_add_duplicate_type_and_currency_rejected() {
        let mut p = participant();
        p.accounts.push(ParticipantAccount::new(
            "acc-1",
            AccountType::Settlement,
            Currency::Usd,
        ));
        submit::<AccountChangePolicy>(
            &mut p,
            add_request("req-1", "alice", AccountType::Settlement),
        )
        .unwrap();

        let result = approve::<AccountChangePolicy>(
            &mut p,
            "req-1",
            "bob",
            Some("acc-2".to_string()),
            Utc::now(),
        );
        assert!(matches!(result, Err(ApprovalError::DuplicateChange { .. })));
        assert_eq!(p.accounts.len(), 1);
    }

    #[test]
    fn test_change_updates_bank_metadata_only() {
        let mut p = participant();
        p.accounts.push(ParticipantAccount::new(
            "acc-1",
            AccountType::Settlement,
            Currency::Usd,
        ));

        let request = AccountChangeRequest {
            state: ChangeRequestState::new(Some("req-1".to_string()), "alice"),
            account_id: Some("acc-1".to_string()),
            account_type: AccountType::Settlement,
            currency: Currency::Usd,
            external_bank_account_id: Some("0011223344".to_string()),
            external_bank_account_name: Some("Alpha Bank Nostro".to_string()),
            kind: AccountChangeKind::ChangeAccount,
        };
        submit::<AccountChangePolicy>(&mut p, request).unwrap();

        let outcome =
            approve::<AccountChangePolicy>(&mut p, "req-1", "bob", None, Utc::now()).unwrap();

        assert_eq!(outcome.id, "acc-1");
        assert_eq!(
            outcome.action,
            ParticipantChangeAction::ParticipantAccountChanged
        );
        assert_eq!(
            p.accounts[0].external_bank_account_id.as_deref(),
            Some("0011223344")
        );
    }

    #[test]
    fn test_change_to_identical_values_rejected_as_duplicate() {
        // The CHANGE comparison spans every live account, the target's own
        // tuple included: a no-op change is rejected.
        let mut p = participant();
        p.accounts.push(ParticipantAccount::new(
            "acc-1",
            AccountType::Settlement,
            Currency::Usd,
        ));

        let request = AccountChangeRequest {
            state: ChangeRequestState::new(Some("req-1".to_string()), "alice"),
            account_id: Some("acc-1".to_string()),
            account_type: AccountType::Settlement,
            currency: Currency::Usd,
            external_bank_account_id: None,
            external_bank_account_name: None,
            kind: AccountChangeKind::ChangeAccount,
        };
        submit::<AccountChangePolicy>(&mut p, request).unwrap();

        let result = approve::<AccountChangePolicy>(&mut p, "req-1", "bob", None, Utc::now());
        assert!(matches!(result, Err(ApprovalError::DuplicateChange { .. })));
    }

    #[test]
    fn test_change_must_name_existing_target() {
        let mut p = participant();
        let request = AccountChangeRequest {
            state: ChangeRequestState::new(Some("req-1".to_string()), "alice"),
            account_id: Some("missing".to_string()),
            account_type: AccountType::Settlement,
            currency: Currency::Usd,
            external_bank_account_id: None,
            external_bank_account_name: None,
            kind: AccountChangeKind::ChangeAccount,
        };
        let result = submit::<AccountChangePolicy>(&mut p, request);
        assert!(matches!(result, Err(ApprovalError::TargetNotFound { .. })));
    }
}
