//! Change-request submission and approval for the four maker-checker
//! categories
//!
//! The generic workflow lives in `hubadmin-approval`; this module supplies
//! each category's privilege pair and the externally-obtained
//! materialization input (upstream ledger account ids, computed cap
//! values), and wires in persistence, auditing and event emission.

use chrono::Utc;
use hubadmin_approval::{
    self as approval, AccountChangePolicy, ApprovalError, ChangePolicy,
    ContactInfoChangePolicy, MaterializedChange, NdcChangePolicy, SourceIpChangePolicy,
};
use hubadmin_core::{Privilege, SecurityContext};
use hubadmin_participant::{
    AccountChangeKind, AccountChangeRequest, AccountType, ChangeRequestState,
    ContactInfoChangeRequest, NdcChangeRequest, Participant, SourceIpChangeRequest,
};
use hubadmin_risk::compute_net_debit_cap;

use crate::commands::{
    AccountChangeCommand, ContactInfoChangeCommand, NdcChangeCommand, SourceIpChangeCommand,
};
use crate::error::GovernanceError;
use crate::service::ParticipantService;

impl ParticipantService {
    // --- submission ------------------------------------------------------

    pub async fn create_account_change_request(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
        command: AccountChangeCommand,
    ) -> Result<String, GovernanceError> {
        let request = AccountChangeRequest {
            state: ChangeRequestState::new(command.request_id, &ctx.username),
            account_id: command.account_id,
            account_type: command.account_type,
            currency: command.currency,
            external_bank_account_id: command.external_bank_account_id,
            external_bank_account_name: command.external_bank_account_name,
            kind: command.kind,
        };
        self.submit_change_request::<AccountChangePolicy>(
            ctx,
            participant_id,
            request,
            Privilege::CreateAccountChangeRequest,
        )
        .await
    }

    pub async fn create_source_ip_change_request(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
        command: SourceIpChangeCommand,
    ) -> Result<String, GovernanceError> {
        let request = SourceIpChangeRequest {
            state: ChangeRequestState::new(command.request_id, &ctx.username),
            source_ip_id: command.source_ip_id,
            cidr: command.cidr,
            port_mode: command.port_mode,
            ports: command.ports,
            port_range: command.port_range,
            kind: command.kind,
        };
        self.submit_change_request::<SourceIpChangePolicy>(
            ctx,
            participant_id,
            request,
            Privilege::CreateSourceIpChangeRequest,
        )
        .await
    }

    pub async fn create_contact_info_change_request(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
        command: ContactInfoChangeCommand,
    ) -> Result<String, GovernanceError> {
        let request = ContactInfoChangeRequest {
            state: ChangeRequestState::new(command.request_id, &ctx.username),
            contact_info_id: command.contact_info_id,
            name: command.name,
            email: command.email,
            phone_number: command.phone_number,
            role: command.role,
            kind: command.kind,
        };
        self.submit_change_request::<ContactInfoChangePolicy>(
            ctx,
            participant_id,
            request,
            Privilege::CreateContactInfoChangeRequest,
        )
        .await
    }

    pub async fn create_ndc_change_request(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
        command: NdcChangeCommand,
    ) -> Result<String, GovernanceError> {
        let request = NdcChangeRequest {
            state: ChangeRequestState::new(command.request_id, &ctx.username),
            currency: command.currency,
            ndc_type: command.ndc_type,
            percentage: command.percentage,
            fixed_value: command.fixed_value,
            ext_reference: command.ext_reference,
            note: command.note,
        };
        self.submit_change_request::<NdcChangePolicy>(
            ctx,
            participant_id,
            request,
            Privilege::CreateNdcChangeRequest,
        )
        .await
    }

    async fn submit_change_request<P: ChangePolicy>(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
        request: P::Request,
        privilege: Privilege,
    ) -> Result<String, GovernanceError> {
        let created_action = P::created_action();
        self.enforce(ctx, privilege, &created_action.to_string()).await?;

        let mut participant = self.load(participant_id).await?;
        let request_id = approval::submit::<P>(&mut participant, request)?;
        self.persist(&participant).await?;

        tracing::debug!(
            participant_id,
            request_id = %request_id,
            category = %P::category(),
            "change request submitted"
        );
        self.record_audit(
            ctx,
            &created_action.to_string(),
            true,
            Self::labels(&[("participantId", participant_id), ("requestId", &request_id)]),
        )
        .await;
        self.emit(participant_id, created_action).await;

        Ok(request_id)
    }

    // --- approval --------------------------------------------------------

    /// Approve an account change request. ADDs create the account upstream
    /// first; the ledger-assigned id binds the live record. Returns the
    /// account id.
    pub async fn approve_account_change_request(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
        request_id: &str,
    ) -> Result<String, GovernanceError> {
        let mut participant = self.load(participant_id).await?;
        let request = self
            .begin_approval::<AccountChangePolicy>(
                ctx,
                &participant,
                request_id,
                Privilege::ApproveAccountChangeRequest,
            )
            .await?;

        let input = match request.kind {
            AccountChangeKind::AddAccount => {
                self.ledger.set_token(&ctx.access_token).await;
                let account_id = self
                    .ledger
                    .create_account(
                        request.account_id.as_deref(),
                        participant_id,
                        request.account_type,
                        &request.currency,
                    )
                    .await
                    .map_err(|err| {
                        GovernanceError::UnableToCreateAccountUpstream(err.to_string())
                    })?;
                Some(account_id)
            }
            AccountChangeKind::ChangeAccount => None,
        };

        let outcome = self
            .finish_approval::<AccountChangePolicy>(ctx, &mut participant, request_id, input)
            .await?;
        Ok(outcome.id)
    }

    pub async fn approve_source_ip_change_request(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
        request_id: &str,
    ) -> Result<String, GovernanceError> {
        let mut participant = self.load(participant_id).await?;
        self.begin_approval::<SourceIpChangePolicy>(
            ctx,
            &participant,
            request_id,
            Privilege::ApproveSourceIpChangeRequest,
        )
        .await?;

        let outcome = self
            .finish_approval::<SourceIpChangePolicy>(ctx, &mut participant, request_id, ())
            .await?;
        Ok(outcome.id)
    }

    pub async fn approve_contact_info_change_request(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
        request_id: &str,
    ) -> Result<String, GovernanceError> {
        let mut participant = self.load(participant_id).await?;
        self.begin_approval::<ContactInfoChangePolicy>(
            ctx,
            &participant,
            request_id,
            Privilege::ApproveContactInfoChangeRequest,
        )
        .await?;

        let outcome = self
            .finish_approval::<ContactInfoChangePolicy>(ctx, &mut participant, request_id, ())
            .await?;
        Ok(outcome.id)
    }

    /// Approve a net-debit-cap change request. The effective cap is derived
    /// from the live settlement balance at approval time and upserted as the
    /// single NDC record for the currency.
    pub async fn approve_ndc_change_request(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
        request_id: &str,
    ) -> Result<String, GovernanceError> {
        let mut participant = self.load(participant_id).await?;
        let request = self
            .begin_approval::<NdcChangePolicy>(
                ctx,
                &participant,
                request_id,
                Privilege::ApproveNdcChangeRequest,
            )
            .await?;

        let settlement = participant
            .account_of_type(AccountType::Settlement, &request.currency)
            .ok_or_else(|| {
                GovernanceError::AccountNotFound(format!(
                    "participant {} has no SETTLEMENT account in {}",
                    participant_id, request.currency
                ))
            })?;

        self.ledger.set_token(&ctx.access_token).await;
        let live = self
            .ledger
            .get_account(&settlement.id)
            .await
            .map_err(|err| GovernanceError::LedgerFailure(err.to_string()))?;
        let value = compute_net_debit_cap(
            request.fixed_value,
            request.percentage,
            live.balance(),
            request.ndc_type,
        )?;

        let outcome = self
            .finish_approval::<NdcChangePolicy>(ctx, &mut participant, request_id, value)
            .await?;
        Ok(outcome.id)
    }

    /// Pre-privilege stage of an approval in its fixed order: not-found,
    /// already-approved, maker-checker (audited as failed), privilege
    /// (audited as failed), duplicate detection. Returns the pending
    /// request so the caller can gather materialization input.
    async fn begin_approval<P: ChangePolicy>(
        &self,
        ctx: &SecurityContext,
        participant: &Participant,
        request_id: &str,
        privilege: Privilege,
    ) -> Result<P::Request, GovernanceError> {
        let approved_action = P::approved_action().to_string();

        let request = match approval::pending::<P>(participant, request_id, &ctx.username) {
            Ok(request) => request.clone(),
            Err(err) => {
                if matches!(err, ApprovalError::MakerCheckerViolation { .. }) {
                    self.record_audit(
                        ctx,
                        &approved_action,
                        false,
                        Self::labels(&[
                            ("participantId", &participant.id),
                            ("requestId", request_id),
                        ]),
                    )
                    .await;
                }
                return Err(err.into());
            }
        };

        self.enforce(ctx, privilege, &approved_action).await?;
        approval::check_conflict::<P>(participant, &request)?;

        Ok(request)
    }

    /// Materialize, mark approved, persist, then audit the approval and the
    /// materialized action and publish one domain event.
    async fn finish_approval<P: ChangePolicy>(
        &self,
        ctx: &SecurityContext,
        participant: &mut Participant,
        request_id: &str,
        input: P::Input,
    ) -> Result<MaterializedChange, GovernanceError> {
        let outcome =
            approval::approve::<P>(participant, request_id, &ctx.username, input, Utc::now())?;
        self.persist(participant).await?;

        let labels = Self::labels(&[
            ("participantId", &participant.id),
            ("requestId", request_id),
        ]);
        self.record_audit(ctx, &P::approved_action().to_string(), true, labels.clone())
            .await;
        self.record_audit(ctx, &outcome.action.to_string(), true, labels)
            .await;
        self.emit(&participant.id, outcome.action).await;

        tracing::info!(
            participant_id = %participant.id,
            request_id,
            category = %P::category(),
            materialized_id = %outcome.id,
            "change request approved"
        );
        Ok(outcome)
    }
}
