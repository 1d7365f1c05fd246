//! Settlement reconciliation
//!
//! A settled matrix distributes per-participant credit/debit outcomes. The
//! reconciler posts one ledger entry per non-zero amount as a single atomic
//! batch, then recomputes every affected participant's net debit caps from
//! the live settlement balances. The whole batch either posts or fails;
//! there is no partial-success tolerance.

use rust_decimal::Decimal;
use std::collections::HashMap;

use hubadmin_core::{Amount, SecurityContext};
use hubadmin_events::SettlementMatrixSettledEvent;
use hubadmin_participant::{
    AccountType, NdcType, Participant, ParticipantChangeAction,
};
use hubadmin_ports::JournalEntryRequest;
use hubadmin_risk::compute_net_debit_cap;

use crate::error::GovernanceError;
use crate::service::ParticipantService;

/// Audit action recorded when a settlement matrix is fully reconciled
const SETTLEMENT_MATRIX_PROCESSED: &str = "SETTLEMENT_MATRIX_PROCESSED";

impl ParticipantService {
    /// Apply a settlement-matrix-settled notification.
    ///
    /// Delivery is at-least-once: an already-processed matrix id is skipped
    /// with a warning rather than double-posted.
    pub async fn handle_settlement_matrix_settled(
        &self,
        ctx: &SecurityContext,
        event: &SettlementMatrixSettledEvent,
    ) -> Result<(), GovernanceError> {
        let matrix_id = &event.settlement_matrix_id;

        if self.idempotency.is_processed(matrix_id).await {
            tracing::warn!(matrix_id, "settlement matrix already processed, skipping redelivery");
            return Ok(());
        }
        if event.participant_list.is_empty() {
            return Err(GovernanceError::InvalidSettlementEvent(
                "participant list is empty".to_string(),
            ));
        }

        let mut participant_ids: Vec<String> = event
            .participant_list
            .iter()
            .map(|entry| entry.participant_id.clone())
            .collect();
        participant_ids.sort();
        participant_ids.dedup();

        let participants = self.repository.fetch_where_ids(&participant_ids).await;
        if participants.len() != participant_ids.len() {
            return Err(GovernanceError::InvalidSettlementEvent(format!(
                "matrix {matrix_id} names {} participants but only {} were found",
                participant_ids.len(),
                participants.len()
            )));
        }
        let by_id: HashMap<&str, &Participant> = participants
            .iter()
            .map(|participant| (participant.id.as_str(), participant))
            .collect();

        let mut batch = Vec::new();
        for entry in &event.participant_list {
            let Some(currency) = &entry.currency_code else {
                continue;
            };
            let participant = by_id.get(entry.participant_id.as_str()).ok_or_else(|| {
                GovernanceError::InvalidSettlementEvent(format!(
                    "participant {} was not returned by the bulk fetch",
                    entry.participant_id
                ))
            })?;

            let settlement = participant
                .account_of_type(AccountType::Settlement, currency)
                .ok_or_else(|| {
                    GovernanceError::AccountNotFound(format!(
                        "participant {} has no SETTLEMENT account in {currency}",
                        participant.id
                    ))
                })?;
            let position = participant
                .account_of_type(AccountType::Position, currency)
                .ok_or_else(|| {
                    GovernanceError::AccountNotFound(format!(
                        "participant {} has no POSITION account in {currency}",
                        participant.id
                    ))
                })?;

            if entry.settled_credit_balance < Decimal::ZERO
                || entry.settled_debit_balance < Decimal::ZERO
            {
                return Err(GovernanceError::InvalidSettlementEvent(format!(
                    "negative settled balance for participant {}",
                    participant.id
                )));
            }

            // A settled credit funds the settlement account out of the
            // position account; a settled debit is the mirror. An entry can
            // yield zero, one or two postings.
            if entry.settled_credit_balance > Decimal::ZERO {
                batch.push(JournalEntryRequest {
                    requested_id: None,
                    owner_id: participant.id.clone(),
                    currency: currency.clone(),
                    amount: Amount::new_unchecked(entry.settled_credit_balance),
                    pending: false,
                    debited_account_id: position.id.clone(),
                    credited_account_id: settlement.id.clone(),
                });
            }
            if entry.settled_debit_balance > Decimal::ZERO {
                batch.push(JournalEntryRequest {
                    requested_id: None,
                    owner_id: participant.id.clone(),
                    currency: currency.clone(),
                    amount: Amount::new_unchecked(entry.settled_debit_balance),
                    pending: false,
                    debited_account_id: settlement.id.clone(),
                    credited_account_id: position.id.clone(),
                });
            }
        }

        if batch.is_empty() {
            return Err(GovernanceError::InvalidSettlementEvent(format!(
                "matrix {matrix_id} settles nothing"
            )));
        }

        let entry_ids = self
            .ledger
            .create_journal_entries(&batch)
            .await
            .map_err(|err| GovernanceError::LedgerFailure(err.to_string()))?;
        if entry_ids.len() != batch.len() {
            return Err(GovernanceError::LedgerFailure(format!(
                "ledger returned {} ids for {} settlement postings",
                entry_ids.len(),
                batch.len()
            )));
        }

        self.idempotency.mark_processed(matrix_id).await;

        tracing::info!(
            matrix_id,
            postings = batch.len(),
            participants = participants.len(),
            "settlement matrix reconciled"
        );
        self.record_audit(
            ctx,
            SETTLEMENT_MATRIX_PROCESSED,
            true,
            Self::labels(&[("settlementMatrixId", matrix_id)]),
        )
        .await;

        for participant in participants {
            self.recalculate_net_debit_caps(participant).await?;
        }

        Ok(())
    }

    /// Recompute every NDC the participant holds from its live settlement
    /// balances. Participants without NDC definitions are skipped; a domain
    /// event is raised only when a value actually moved.
    async fn recalculate_net_debit_caps(
        &self,
        mut participant: Participant,
    ) -> Result<(), GovernanceError> {
        if participant.net_debit_caps.is_empty() {
            return Ok(());
        }

        let mut changed = false;
        for index in 0..participant.net_debit_caps.len() {
            let ndc = participant.net_debit_caps[index].clone();
            let Some(settlement) =
                participant.account_of_type(AccountType::Settlement, &ndc.currency)
            else {
                tracing::warn!(
                    participant_id = %participant.id,
                    currency = %ndc.currency,
                    "net debit cap without a settlement account, skipping recalculation"
                );
                continue;
            };
            let settlement_id = settlement.id.clone();

            let live = self
                .ledger
                .get_account(&settlement_id)
                .await
                .map_err(|err| GovernanceError::LedgerFailure(err.to_string()))?;

            // ABSOLUTE definitions reuse the current value as the fixed
            // input; the clamp against the fresh balance does the rest.
            let fixed_value = match ndc.ndc_type {
                NdcType::Absolute => Some(ndc.current_value.value()),
                NdcType::Percentage => None,
            };
            let value =
                compute_net_debit_cap(fixed_value, ndc.percentage, live.balance(), ndc.ndc_type)?;

            if value != ndc.current_value {
                participant.net_debit_caps[index].current_value = value;
                changed = true;
            }
        }

        if changed {
            self.persist(&participant).await?;
            self.emit(
                &participant.id,
                ParticipantChangeAction::ParticipantNdcRecalculated,
            )
            .await;
            tracing::debug!(participant_id = %participant.id, "net debit caps recalculated");
        }

        Ok(())
    }
}
