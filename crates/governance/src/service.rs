//! The participant governance aggregate
//!
//! Every inbound command (from the HTTP layer) and inbound settlement event
//! (from the messaging layer) enters through a method on
//! [`ParticipantService`]. The service reads and writes participant records
//! through the repository port, ledger state through the ledger port, and
//! emits audit records and domain-change events through their ports. Each
//! operation is one sequential fetch-mutate-store cycle; the optimistic
//! `version` token on the record turns a lost race into a retryable
//! conflict instead of a silent overwrite.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use hubadmin_core::{Currency, Privilege, SecurityContext};
use hubadmin_events::ParticipantChangedEvent;
use hubadmin_participant::{
    AccountType, Participant, ParticipantAccount, ParticipantChangeAction, HUB_PARTICIPANT_ID,
};
use hubadmin_ports::{
    AuditEntry, AuditLabel, AuditLog, AuthorizationService, ConfigurationProvider, EventPublisher,
    LedgerService, ParticipantRepository, SettlementIdempotencyStore,
};

use crate::error::GovernanceError;

pub struct ParticipantService {
    pub(crate) repository: Arc<dyn ParticipantRepository>,
    pub(crate) ledger: Arc<dyn LedgerService>,
    pub(crate) authorization: Arc<dyn AuthorizationService>,
    pub(crate) audit: Arc<dyn AuditLog>,
    pub(crate) publisher: Arc<dyn EventPublisher>,
    pub(crate) configuration: Arc<dyn ConfigurationProvider>,
    pub(crate) idempotency: Arc<dyn SettlementIdempotencyStore>,

    /// Currencies the hub clears, cached from the configuration provider
    /// and refreshed through `reload_configuration`
    pub(crate) currencies: RwLock<Vec<Currency>>,
}

impl ParticipantService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        ledger: Arc<dyn LedgerService>,
        authorization: Arc<dyn AuthorizationService>,
        audit: Arc<dyn AuditLog>,
        publisher: Arc<dyn EventPublisher>,
        configuration: Arc<dyn ConfigurationProvider>,
        idempotency: Arc<dyn SettlementIdempotencyStore>,
    ) -> Self {
        Self {
            repository,
            ledger,
            authorization,
            audit,
            publisher,
            configuration,
            idempotency,
            currencies: RwLock::new(Vec::new()),
        }
    }

    /// Load configuration and make sure the hub participant exists.
    ///
    /// A present record that is not of type HUB means the store holds
    /// someone else's data under the reserved id; that is fatal. An absent
    /// record triggers bootstrap.
    pub async fn init(&self) -> Result<(), GovernanceError> {
        self.reload_configuration().await;

        match self.repository.fetch_where_id(HUB_PARTICIPANT_ID).await {
            Some(hub) if !hub.is_hub() => Err(GovernanceError::HubRecordCorrupted(format!(
                "participant '{}' holds the reserved hub id but has type {}",
                hub.name, hub.participant_type
            ))),
            Some(_) => {
                tracing::info!("hub participant already present");
                Ok(())
            }
            None => self.bootstrap_hub().await,
        }
    }

    /// Refresh the cached currency list. The configuration bootstrap client
    /// calls this from its configuration-change subscription.
    pub async fn reload_configuration(&self) {
        let currencies = self.configuration.currency_list().await;
        tracing::info!(count = currencies.len(), "refreshed configured currency list");
        *self.currencies.write().await = currencies;
    }

    /// Create the hub participant and its per-currency multilateral
    /// settlement and reconciliation ledger accounts.
    async fn bootstrap_hub(&self) -> Result<(), GovernanceError> {
        let ctx = SecurityContext::system();
        let currencies = self.currencies.read().await.clone();
        tracing::info!(
            currencies = currencies.len(),
            "hub participant absent, bootstrapping"
        );

        let mut hub = Participant::hub(&ctx.username);
        let mut account_labels = Vec::new();

        for currency in &currencies {
            for account_type in [
                AccountType::HubMultilateralSettlement,
                AccountType::HubReconciliation,
            ] {
                let account_id = self
                    .ledger
                    .create_account(None, HUB_PARTICIPANT_ID, account_type, currency)
                    .await
                    .map_err(|err| {
                        GovernanceError::UnableToCreateAccountUpstream(err.to_string())
                    })?;

                hub.accounts.push(ParticipantAccount::new(
                    account_id.clone(),
                    account_type,
                    currency.clone(),
                ));
                hub.record_change(
                    ParticipantChangeAction::ParticipantAccountAdded,
                    &ctx.username,
                    Some(format!("{account_type} {currency}")),
                );
                account_labels.push(Self::labels(&[
                    ("participantId", HUB_PARTICIPANT_ID),
                    ("accountId", &account_id),
                ]));
            }
        }

        self.repository.create(&hub).await?;

        self.record_audit(
            &ctx,
            &ParticipantChangeAction::ParticipantCreated.to_string(),
            true,
            Self::participant_labels(HUB_PARTICIPANT_ID),
        )
        .await;
        for labels in account_labels {
            self.record_audit(
                &ctx,
                &ParticipantChangeAction::ParticipantAccountAdded.to_string(),
                true,
                labels,
            )
            .await;
        }

        tracing::info!(accounts = hub.accounts.len(), "hub participant bootstrapped");
        Ok(())
    }

    // --- shared plumbing -------------------------------------------------

    pub(crate) async fn has_privilege(&self, ctx: &SecurityContext, privilege: Privilege) -> bool {
        for role_id in &ctx.platform_role_ids {
            if self
                .authorization
                .role_has_privilege(role_id, privilege)
                .await
            {
                return true;
            }
        }
        false
    }

    /// Privilege gate for mutating operations: a denied attempt is audited
    /// as failed before the error propagates.
    pub(crate) async fn enforce(
        &self,
        ctx: &SecurityContext,
        privilege: Privilege,
        action: &str,
    ) -> Result<(), GovernanceError> {
        if self.has_privilege(ctx, privilege).await {
            return Ok(());
        }
        tracing::warn!(
            username = %ctx.username,
            privilege = %privilege,
            action,
            "privilege denied"
        );
        self.record_audit(ctx, action, false, Vec::new()).await;
        Err(GovernanceError::Forbidden(privilege))
    }

    pub(crate) async fn load(&self, participant_id: &str) -> Result<Participant, GovernanceError> {
        self.repository
            .fetch_where_id(participant_id)
            .await
            .ok_or_else(|| GovernanceError::ParticipantNotFound(participant_id.to_string()))
    }

    pub(crate) async fn persist(&self, participant: &Participant) -> Result<(), GovernanceError> {
        self.repository.store(participant).await?;
        Ok(())
    }

    pub(crate) async fn record_audit(
        &self,
        ctx: &SecurityContext,
        action: &str,
        success: bool,
        labels: Vec<AuditLabel>,
    ) {
        self.audit
            .record(AuditEntry {
                action: action.to_string(),
                success,
                user_id: ctx.username.clone(),
                role: ctx.platform_role_ids.join(","),
                app_id: ctx.client_id.clone(),
                labels,
                timestamp: Utc::now(),
            })
            .await;
    }

    pub(crate) async fn emit(&self, participant_id: &str, action: ParticipantChangeAction) {
        tracing::debug!(participant_id, action = %action, "publishing domain event");
        self.publisher
            .publish(ParticipantChangedEvent::new(participant_id, action))
            .await;
    }

    pub(crate) fn participant_labels(participant_id: &str) -> Vec<AuditLabel> {
        vec![AuditLabel::new("participantId", participant_id)]
    }

    pub(crate) fn labels(pairs: &[(&str, &str)]) -> Vec<AuditLabel> {
        pairs
            .iter()
            .map(|(key, value)| AuditLabel::new(*key, *value))
            .collect()
    }
}
