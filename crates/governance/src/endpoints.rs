//! Endpoint administration
//!
//! Endpoints mutate directly under `MANAGE_ENDPOINTS`, without the
//! change-request indirection every other category uses.

use hubadmin_core::{Privilege, SecurityContext};
use hubadmin_participant::{ParticipantChangeAction, ParticipantEndpoint};
use uuid::Uuid;

use crate::commands::EndpointCommand;
use crate::error::GovernanceError;
use crate::service::ParticipantService;

impl ParticipantService {
    /// Add a delivery endpoint. Returns the endpoint id.
    pub async fn add_endpoint(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
        command: EndpointCommand,
    ) -> Result<String, GovernanceError> {
        let action = ParticipantChangeAction::ParticipantEndpointAdded;
        self.enforce(ctx, Privilege::ManageEndpoints, &action.to_string())
            .await?;

        let mut participant = self.endpoint_target(participant_id).await?;

        if command.value.trim().is_empty() {
            return Err(GovernanceError::Validation(
                "endpoint value cannot be empty".to_string(),
            ));
        }
        let id = command
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        if participant.endpoint_by_id(&id).is_some() {
            return Err(GovernanceError::Validation(format!(
                "endpoint id already exists: {id}"
            )));
        }

        participant.endpoints.push(ParticipantEndpoint {
            id: id.clone(),
            endpoint_type: command.endpoint_type,
            protocol: command.protocol,
            value: command.value,
        });
        participant.record_change(action, &ctx.username, None);
        self.persist(&participant).await?;

        self.record_audit(
            ctx,
            &action.to_string(),
            true,
            Self::labels(&[("participantId", participant_id), ("endpointId", &id)]),
        )
        .await;
        self.emit(participant_id, action).await;

        Ok(id)
    }

    /// Replace an existing endpoint's type, protocol and value.
    pub async fn change_endpoint(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
        endpoint_id: &str,
        command: EndpointCommand,
    ) -> Result<(), GovernanceError> {
        let action = ParticipantChangeAction::ParticipantEndpointChanged;
        self.enforce(ctx, Privilege::ManageEndpoints, &action.to_string())
            .await?;

        let mut participant = self.endpoint_target(participant_id).await?;

        if command.value.trim().is_empty() {
            return Err(GovernanceError::Validation(
                "endpoint value cannot be empty".to_string(),
            ));
        }
        let endpoint = participant
            .endpoints
            .iter_mut()
            .find(|endpoint| endpoint.id == endpoint_id)
            .ok_or_else(|| GovernanceError::EndpointNotFound(endpoint_id.to_string()))?;

        endpoint.endpoint_type = command.endpoint_type;
        endpoint.protocol = command.protocol;
        endpoint.value = command.value;

        participant.record_change(action, &ctx.username, None);
        self.persist(&participant).await?;

        self.record_audit(
            ctx,
            &action.to_string(),
            true,
            Self::labels(&[("participantId", participant_id), ("endpointId", endpoint_id)]),
        )
        .await;
        self.emit(participant_id, action).await;

        Ok(())
    }

    pub async fn remove_endpoint(
        &self,
        ctx: &SecurityContext,
        participant_id: &str,
        endpoint_id: &str,
    ) -> Result<(), GovernanceError> {
        let action = ParticipantChangeAction::ParticipantEndpointRemoved;
        self.enforce(ctx, Privilege::ManageEndpoints, &action.to_string())
            .await?;

        let mut participant = self.endpoint_target(participant_id).await?;

        let index = participant
            .endpoints
            .iter()
            .position(|endpoint| endpoint.id == endpoint_id)
            .ok_or_else(|| GovernanceError::EndpointNotFound(endpoint_id.to_string()))?;
        participant.endpoints.remove(index);

        participant.record_change(action, &ctx.username, None);
        self.persist(&participant).await?;

        self.record_audit(
            ctx,
            &action.to_string(),
            true,
            Self::labels(&[("participantId", participant_id), ("endpointId", endpoint_id)]),
        )
        .await;
        self.emit(participant_id, action).await;

        Ok(())
    }

    async fn endpoint_target(
        &self,
        participant_id: &str,
    ) -> Result<hubadmin_participant::Participant, GovernanceError> {
        let participant = self.load(participant_id).await?;
        if participant.is_hub() {
            return Err(GovernanceError::Validation(
                "the hub participant has no delivery endpoints".to_string(),
            ));
        }
        Ok(participant)
    }
}
