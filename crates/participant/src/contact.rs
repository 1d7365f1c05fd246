//! Participant contact information and its change requests

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::request::{ChangeRequest, ChangeRequestState};

/// An operational contact at the participant institution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    /// Free-form role description ("settlement ops", "on-call", ...)
    pub role: String,
}

/// Whether a request adds a contact or amends one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactChangeKind {
    AddContactInfo,
    ChangeContactInfo,
}

/// Pending contact mutation awaiting a checker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfoChangeRequest {
    #[serde(flatten)]
    pub state: ChangeRequestState,

    /// Target contact id; required for CHANGE_CONTACT_INFO
    pub contact_info_id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub role: String,
    pub kind: ContactChangeKind,
}

impl ChangeRequest for ContactInfoChangeRequest {
    fn state(&self) -> &ChangeRequestState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ChangeRequestState {
        &mut self.state
    }
}
