//! Operator funds movements
//!
//! Deposits and withdrawals move money between the participant's settlement
//! account and the hub's reconciliation account for the currency. Approval
//! posts a single journal entry with the legs swapped by direction; a
//! withdrawal is first checked against the live settlement balance.

use chrono::Utc;
use hubadmin_core::{Privilege, SecurityContext};
use hubadmin_participant::{
    AccountType, ChangeRequest, ChangeRequestState, FundsDirection, FundsMovement, Participant,
    ParticipantChangeAction, HUB_PARTICIPANT_ID,
};
use hubadmin_ports::JournalEntryRequest;

use crate::commands::FundsMovementCommand;
use crate::error::GovernanceError;
use crate::service::ParticipantService;

impl ParticipantService {
    /// Record a pending funds movement. Returns the movement id.
    pub async fn create_funds_movement(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
        command: FundsMovementCommand,
    ) -> Result<String, GovernanceError> {
        let (privilege, action) = match command.direction {
            FundsDirection::Deposit => (
                Privilege::CreateFundsDeposit,
                ParticipantChangeAction::FundsDepositCreated,
            ),
            FundsDirection::Withdrawal => (
                Privilege::CreateFundsWithdrawal,
                ParticipantChangeAction::FundsWithdrawalCreated,
            ),
        };
        self.enforce(ctx, privilege, &action.to_string()).await?;

        let mut participant = self.load(participant_id).await?;
        if participant.is_hub() {
            return Err(GovernanceError::Validation(
                "funds movements target regular participants".to_string(),
            ));
        }
        if command.amount.is_zero() {
            return Err(GovernanceError::Validation(
                "funds movement amount must be positive".to_string(),
            ));
        }
        self.funds_accounts(&participant, &command.currency).await?;

        let movement = FundsMovement {
            state: ChangeRequestState::new(command.request_id, &ctx.username),
            direction: command.direction,
            currency: command.currency,
            amount: command.amount,
            transfer_id: None,
            ext_reference: command.ext_reference,
            note: command.note,
        };
        let movement_id = movement.state.id.clone();
        if participant.funds_movement_by_id(&movement_id).is_some() {
            return Err(GovernanceError::Validation(format!(
                "funds movement id already exists: {movement_id}"
            )));
        }

        participant.funds_movements.push(movement);
        participant.record_change(action, &ctx.username, None);
        self.persist(&participant).await?;

        self.record_audit(
            ctx,
            &action.to_string(),
            true,
            Self::labels(&[("participantId", participant_id), ("fundsMovementId", &movement_id)]),
        )
        .await;
        self.emit(participant_id, action).await;

        Ok(movement_id)
    }

    /// Approve a pending funds movement and post it to the ledger. Returns
    /// the ledger transfer id.
    pub async fn approve_funds_movement(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
        movement_id: &str,
    ) -> Result<String, GovernanceError> {
        let mut participant = self.load(participant_id).await?;

        let movement = participant
            .funds_movement_by_id(movement_id)
            .cloned()
            .ok_or_else(|| GovernanceError::FundsMovementNotFound(movement_id.to_string()))?;

        let (privilege, action) = match movement.direction {
            FundsDirection::Deposit => (
                Privilege::ApproveFundsDeposit,
                ParticipantChangeAction::FundsDepositApproved,
            ),
            FundsDirection::Withdrawal => (
                Privilege::ApproveFundsWithdrawal,
                ParticipantChangeAction::FundsWithdrawalApproved,
            ),
        };

        if movement.is_approved() {
            return Err(GovernanceError::FundsMovementAlreadyApproved(
                movement_id.to_string(),
            ));
        }
        if movement.state.created_by == ctx.username {
            self.record_audit(
                ctx,
                &action.to_string(),
                false,
                Self::labels(&[
                    ("participantId", participant_id),
                    ("fundsMovementId", movement_id),
                ]),
            )
            .await;
            return Err(GovernanceError::MakerCheckerViolation(ctx.username.clone()));
        }
        self.enforce(ctx, privilege, &action.to_string()).await?;

        let (settlement_id, reconciliation_id) =
            self.funds_accounts(&participant, &movement.currency).await?;

        self.ledger.set_token(&ctx.access_token).await;

        if movement.direction == FundsDirection::Withdrawal {
            let live = self
                .ledger
                .get_account(&settlement_id)
                .await
                .map_err(|err| GovernanceError::LedgerFailure(err.to_string()))?;
            if movement.amount.value() > live.balance() {
                return Err(GovernanceError::WithdrawalExceedsBalance {
                    amount: movement.amount.to_string(),
                    balance: live.balance().to_string(),
                });
            }
        }

        // Deposit credits the participant and debits the hub; a withdrawal
        // is the mirror image.
        let (debited_account_id, credited_account_id) = match movement.direction {
            FundsDirection::Deposit => (reconciliation_id, settlement_id),
            FundsDirection::Withdrawal => (settlement_id, reconciliation_id),
        };
        let entry = JournalEntryRequest {
            requested_id: None,
            owner_id: participant_id.to_string(),
            currency: movement.currency.clone(),
            amount: movement.amount,
            pending: false,
            debited_account_id,
            credited_account_id,
        };
        let transfer_id = self
            .ledger
            .create_journal_entry(&entry)
            .await
            .map_err(|err| GovernanceError::LedgerFailure(err.to_string()))?;

        let now = Utc::now();
        let stored = participant
            .funds_movements
            .iter_mut()
            .find(|movement| movement.state.id == movement_id)
            .ok_or_else(|| GovernanceError::FundsMovementNotFound(movement_id.to_string()))?;
        stored.state.mark_approved(&ctx.username, now);
        stored.transfer_id = Some(transfer_id.clone());
        participant.record_change_at(action, &ctx.username, None, now);
        self.persist(&participant).await?;

        tracing::info!(
            participant_id,
            movement_id,
            transfer_id = %transfer_id,
            direction = %movement.direction,
            "funds movement approved and posted"
        );
        self.record_audit(
            ctx,
            &action.to_string(),
            true,
            Self::labels(&[
                ("participantId", participant_id),
                ("fundsMovementId", movement_id),
                ("transferId", &transfer_id),
            ]),
        )
        .await;
        self.emit(participant_id, action).await;

        Ok(transfer_id)
    }

    /// Both legs of a funds movement must exist up front: the participant's
    /// settlement account and the hub's reconciliation account for the
    /// currency.
    async fn funds_accounts(
        &self,
        participant: &Participant,
        currency: &hubadmin_core::Currency,
    ) -> Result<(String, String), GovernanceError> {
        let settlement = participant
            .account_of_type(AccountType::Settlement, currency)
            .ok_or_else(|| {
                GovernanceError::AccountNotFound(format!(
                    "participant {} has no SETTLEMENT account in {currency}",
                    participant.id
                ))
            })?;

        let hub = self
            .repository
            .fetch_where_id(HUB_PARTICIPANT_ID)
            .await
            .ok_or_else(|| {
                GovernanceError::AccountNotFound("hub participant is missing".to_string())
            })?;
        let reconciliation = hub
            .account_of_type(AccountType::HubReconciliation, currency)
            .ok_or_else(|| {
                GovernanceError::AccountNotFound(format!(
                    "hub has no HUB_RECONCILIATION account in {currency}"
                ))
            })?;

        Ok((settlement.id.clone(), reconciliation.id.clone()))
    }
}
