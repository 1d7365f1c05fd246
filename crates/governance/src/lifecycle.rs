//! Participant lifecycle: create, approve, activate/deactivate, queries
//!
//! A participant is created unapproved and inactive, approved by a
//! different user, then explicitly activated. Re-applying the current
//! active state is a silent no-op.

use chrono::Utc;
use hubadmin_core::{Privilege, SecurityContext};
use hubadmin_participant::{
    Participant, ParticipantChangeAction, ParticipantType, HUB_PARTICIPANT_ID,
    MAX_PARTICIPANT_ID_LENGTH,
};

use crate::commands::CreateParticipantCommand;
use crate::error::GovernanceError;
use crate::service::ParticipantService;

impl ParticipantService {
    /// Create a new unapproved, inactive participant. Returns its id.
    pub async fn create_participant(
        &self,
        ctx: &SecurityContext,
        command: CreateParticipantCommand,
    ) -> Result<String, GovernanceError> {
        let action = ParticipantChangeAction::ParticipantCreated.to_string();
        self.enforce(ctx, Privilege::CreateParticipant, &action).await?;

        let name = command.name.trim();
        if name.is_empty() {
            return Err(GovernanceError::Validation(
                "participant name cannot be empty".to_string(),
            ));
        }
        if command.participant_type == ParticipantType::Hub {
            return Err(GovernanceError::Validation(
                "HUB participants are system-reserved and only created at bootstrap".to_string(),
            ));
        }
        if self.repository.fetch_where_name(name).await.is_some() {
            return Err(GovernanceError::DuplicateName(name.to_string()));
        }

        let id = match command.id {
            Some(id) => {
                let id = id.trim().to_string();
                if id.is_empty() || id.len() > MAX_PARTICIPANT_ID_LENGTH {
                    return Err(GovernanceError::Validation(format!(
                        "participant id must be 1..={MAX_PARTICIPANT_ID_LENGTH} characters"
                    )));
                }
                if id == HUB_PARTICIPANT_ID {
                    return Err(GovernanceError::Validation(format!(
                        "participant id '{HUB_PARTICIPANT_ID}' is reserved"
                    )));
                }
                if self.repository.fetch_where_id(&id).await.is_some() {
                    return Err(GovernanceError::DuplicateId(id));
                }
                id
            }
            None => Participant::generate_id(),
        };

        let participant = Participant::new(&id, name, &ctx.username);
        self.repository.create(&participant).await?;

        tracing::info!(participant_id = %id, name, "participant created");
        self.record_audit(ctx, &action, true, Self::participant_labels(&id))
            .await;
        self.emit(&id, ParticipantChangeAction::ParticipantCreated)
            .await;

        Ok(id)
    }

    /// Approve a pending participant. The approver must differ from the
    /// creator; a self-approval attempt is audited as failed.
    pub async fn approve_participant(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
    ) -> Result<(), GovernanceError> {
        let action = ParticipantChangeAction::ParticipantApproved.to_string();

        let mut participant = self.load(participant_id).await?;
        if participant.approved {
            return Err(GovernanceError::ParticipantAlreadyApproved(
                participant_id.to_string(),
            ));
        }
        if participant.created_by == ctx.username {
            self.record_audit(ctx, &action, false, Self::participant_labels(participant_id))
                .await;
            return Err(GovernanceError::MakerCheckerViolation(ctx.username.clone()));
        }
        self.enforce(ctx, Privilege::ApproveParticipant, &action).await?;

        let now = Utc::now();
        participant.approved = true;
        participant.approved_by = Some(ctx.username.clone());
        participant.approved_date = Some(now);
        participant.record_change_at(
            ParticipantChangeAction::ParticipantApproved,
            &ctx.username,
            None,
            now,
        );
        self.persist(&participant).await?;

        tracing::info!(participant_id, approved_by = %ctx.username, "participant approved");
        self.record_audit(ctx, &action, true, Self::participant_labels(participant_id))
            .await;
        self.emit(participant_id, ParticipantChangeAction::ParticipantApproved)
            .await;

        Ok(())
    }

    pub async fn activate_participant(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
    ) -> Result<(), GovernanceError> {
        self.set_participant_active(ctx, participant_id, true).await
    }

    pub async fn deactivate_participant(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
    ) -> Result<(), GovernanceError> {
        self.set_participant_active(ctx, participant_id, false).await
    }

    async fn set_participant_active(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
        active: bool,
    ) -> Result<(), GovernanceError> {
        let (privilege, action) = if active {
            (
                Privilege::EnableParticipant,
                ParticipantChangeAction::ParticipantEnabled,
            )
        } else {
            (
                Privilege::DisableParticipant,
                ParticipantChangeAction::ParticipantDisabled,
            )
        };
        self.enforce(ctx, privilege, &action.to_string()).await?;

        let mut participant = self.load(participant_id).await?;
        if participant.is_hub() {
            return Err(GovernanceError::Validation(
                "the hub participant cannot be enabled or disabled".to_string(),
            ));
        }
        if active && !participant.approved {
            return Err(GovernanceError::Validation(
                "participant must be approved before activation".to_string(),
            ));
        }
        if participant.is_active == active {
            tracing::debug!(participant_id, active, "participant already in requested state");
            return Ok(());
        }

        participant.is_active = active;
        participant.record_change(action, &ctx.username, None);
        self.persist(&participant).await?;

        tracing::info!(participant_id, active, "participant state changed");
        self.record_audit(
            ctx,
            &action.to_string(),
            true,
            Self::participant_labels(participant_id),
        )
        .await;
        self.emit(participant_id, action).await;

        Ok(())
    }

    // --- queries (not audited) -------------------------------------------

    pub async fn get_participant_by_id(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
    ) -> Result<Participant, GovernanceError> {
        self.require_view(ctx).await?;
        self.load(participant_id).await
    }

    pub async fn get_participants_by_ids(
        &self,
        ctx: &SecurityContext,
        participant_ids: &[String],
    ) -> Result<Vec<Participant>, GovernanceError> {
        self.require_view(ctx).await?;
        Ok(self.repository.fetch_where_ids(participant_ids).await)
    }

    pub async fn get_all_participants(
        &self,
        ctx: &SecurityContext,
    ) -> Result<Vec<Participant>, GovernanceError> {
        self.require_view(ctx).await?;
        Ok(self.repository.fetch_all().await)
    }

    pub async fn search_participants(
        &self,
        ctx: &SecurityContext,
        id: Option<&str>,
        name: Option<&str>,
        active: Option<bool>,
    ) -> Result<Vec<Participant>, GovernanceError> {
        self.require_view(ctx).await?;
        Ok(self.repository.search(id, name, active).await)
    }

    async fn require_view(&self, ctx: &SecurityContext) -> Result<(), GovernanceError> {
        if self.has_privilege(ctx, Privilege::ViewParticipant).await {
            Ok(())
        } else {
            Err(GovernanceError::Forbidden(Privilege::ViewParticipant))
        }
    }
}
