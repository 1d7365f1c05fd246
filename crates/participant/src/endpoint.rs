//! Participant connectivity endpoints
//!
//! Endpoints mutate directly under a single manage privilege, without the
//! change-request indirection used by every other category. The asymmetry
//! is intentional and preserved.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Message scheme the endpoint speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndpointType {
    Fspiop,
    Iso20022,
}

/// Transport protocol of the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointProtocol {
    #[serde(rename = "HTTPs/REST")]
    HttpsRest,
}

/// A delivery endpoint for hub-to-participant traffic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantEndpoint {
    pub id: String,
    pub endpoint_type: EndpointType,
    pub protocol: EndpointProtocol,
    /// Base URL participants receive traffic on
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_serde() {
        let endpoint = ParticipantEndpoint {
            id: "ep-1".to_string(),
            endpoint_type: EndpointType::Fspiop,
            protocol: EndpointProtocol::HttpsRest,
            value: "https://dfsp.example.com/api".to_string(),
        };

        let json = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(json["endpoint_type"], "FSPIOP");
        assert_eq!(json["protocol"], "HTTPs/REST");
    }
}
