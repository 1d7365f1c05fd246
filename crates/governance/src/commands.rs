//! Operation payloads
//!
//! The deserialized request bodies the HTTP layer hands to the aggregate.
//! Caller-supplied ids are optional everywhere; the aggregate generates one
//! when absent.

use hubadmin_core::{Amount, Currency};
use hubadmin_participant::{
    AccountChangeKind, AccountType, ContactChangeKind, EndpointProtocol, EndpointType,
    FundsDirection, NdcType, ParticipantType, PortMode, PortRange, SourceIpChangeKind,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateParticipantCommand {
    pub id: Option<String>,
    pub name: String,
    pub participant_type: ParticipantType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointCommand {
    pub id: Option<String>,
    pub endpoint_type: EndpointType,
    pub protocol: EndpointProtocol,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountChangeCommand {
    pub request_id: Option<String>,
    pub kind: AccountChangeKind,
    /// Target account; required for CHANGE_ACCOUNT
    pub account_id: Option<String>,
    pub account_type: AccountType,
    pub currency: Currency,
    pub external_bank_account_id: Option<String>,
    pub external_bank_account_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceIpChangeCommand {
    pub request_id: Option<String>,
    pub kind: SourceIpChangeKind,
    /// Target whitelist entry; required for CHANGE_SOURCE_IP
    pub source_ip_id: Option<String>,
    pub cidr: String,
    pub port_mode: PortMode,
    pub ports: Vec<u16>,
    pub port_range: Option<PortRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInfoChangeCommand {
    pub request_id: Option<String>,
    pub kind: ContactChangeKind,
    /// Target contact; required for CHANGE_CONTACT_INFO
    pub contact_info_id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NdcChangeCommand {
    pub request_id: Option<String>,
    pub currency: Currency,
    pub ndc_type: NdcType,
    pub percentage: Option<Decimal>,
    pub fixed_value: Option<Decimal>,
    pub ext_reference: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundsMovementCommand {
    pub request_id: Option<String>,
    pub direction: FundsDirection,
    pub currency: Currency,
    pub amount: Amount,
    pub ext_reference: Option<String>,
    pub note: Option<String>,
}
