//! Contact-info change-request policy
//!
//! Contacts must be distinguishable on every reachable channel: an ADD
//! conflicts when any live contact already carries the same name, email or
//! phone number. A CHANGE compares the full new value tuple against every
//! live contact, the target's own included.

use hubadmin_participant::{
    ContactChangeKind, ContactInfo, ContactInfoChangeRequest, Participant,
    ParticipantChangeAction,
};
use uuid::Uuid;

use crate::error::{ApprovalError, ChangeCategory};
use crate::workflow::{ChangePolicy, MaterializedChange};

pub struct ContactInfoChangePolicy;

impl ContactInfoChangePolicy {
    fn invalid(detail: impl Into<String>) -> ApprovalError {
        ApprovalError::Invalid {
            category: ChangeCategory::ContactInfo,
            detail: detail.into(),
        }
    }
}

impl ChangePolicy for ContactInfoChangePolicy {
    type Request = ContactInfoChangeRequest;
    type Input = ();

    fn category() -> ChangeCategory {
        ChangeCategory::ContactInfo
    }

    fn requests(participant: &Participant) -> &[Self::Request] {
        &participant.contact_info_change_requests
    }

    fn requests_mut(participant: &mut Participant) -> &mut Vec<Self::Request> {
        &mut participant.contact_info_change_requests
    }

    fn validate(participant: &Participant, request: &Self::Request) -> Result<(), ApprovalError> {
        if request.name.trim().is_empty() {
            return Err(Self::invalid("contact name cannot be empty"));
        }
        if request.email.trim().is_empty() {
            return Err(Self::invalid("contact email cannot be empty"));
        }
        if request.phone_number.trim().is_empty() {
            return Err(Self::invalid("contact phone number cannot be empty"));
        }

        if request.kind == ContactChangeKind::ChangeContactInfo {
            let target_id = request
                .contact_info_id
                .as_deref()
                .ok_or_else(|| Self::invalid("CHANGE_CONTACT_INFO must name the target contact"))?;
            if !participant
                .contacts
                .iter()
                .any(|contact| contact.id == target_id)
            {
                return Err(ApprovalError::TargetNotFound {
                    category: ChangeCategory::ContactInfo,
                    target_id: target_id.to_string(),
                });
            }
        }

        Ok(())
    }

    fn find_conflict(participant: &Participant, request: &Self::Request) -> Option<String> {
        match request.kind {
            ContactChangeKind::AddContactInfo => participant
                .contacts
                .iter()
                .find(|contact| {
                    contact.name == request.name
                        || contact.email == request.email
                        || contact.phone_number == request.phone_number
                })
                .map(|contact| {
                    format!(
                        "contact {} already uses the requested name, email or phone",
                        contact.id
                    )
                }),
            ContactChangeKind::ChangeContactInfo => participant
                .contacts
                .iter()
                .find(|contact| {
                    contact.name == request.name
                        && contact.email == request.email
                        && contact.phone_number == request.phone_number
                })
                .map(|contact| {
                    format!("contact {} already carries the requested values", contact.id)
                }),
        }
    }

    fn materialize(
        participant: &mut Participant,
        request: &Self::Request,
        _input: Self::Input,
    ) -> Result<MaterializedChange, ApprovalError> {
        match request.kind {
            ContactChangeKind::AddContactInfo => {
                let id = Uuid::new_v4().to_string();
                participant.contacts.push(ContactInfo {
                    id: id.clone(),
                    name: request.name.clone(),
                    email: request.email.clone(),
                    phone_number: request.phone_number.clone(),
                    role: request.role.clone(),
                });

                Ok(MaterializedChange {
                    id,
                    action: ParticipantChangeAction::ParticipantContactInfoAdded,
                })
            }
            ContactChangeKind::ChangeContactInfo => {
                let target_id = request.contact_info_id.clone().ok_or_else(|| {
                    Self::invalid("CHANGE_CONTACT_INFO must name the target contact")
                })?;
                let contact = participant
                    .contacts
                    .iter_mut()
                    .find(|contact| contact.id == target_id)
                    .ok_or_else(|| ApprovalError::TargetNotFound {
                        category: ChangeCategory::ContactInfo,
                        target_id: target_id.clone(),
                    })?;
                contact.name = request.name.clone();
                contact.email = request.email.clone();
                contact.phone_number = request.phone_number.clone();
                contact.role = request.role.clone();

                Ok(MaterializedChange {
                    id: target_id,
                    action: ParticipantChangeAction::ParticipantContactInfoChanged,
                })
            }
        }
    }

    fn created_action() -> ParticipantChangeAction {
        ParticipantChangeAction::ParticipantContactInfoChangeRequestCreated
    }

    fn approved_action() -> ParticipantChangeAction {
        ParticipantChangeAction::ParticipantContactInfoChangeRequestApproved
    }
}
