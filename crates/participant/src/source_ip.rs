//! Allowed source IPs and their change requests
//!
//! Participants are only reachable from whitelisted CIDR blocks, optionally
//! narrowed to specific ports or a port range.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use strum_macros::Display;

use crate::request::{ChangeRequest, ChangeRequestState};

/// How the port dimension of a whitelist entry is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortMode {
    Any,
    Specific,
    Range,
}

/// Inclusive port range, used with `PortMode::Range`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub first: u16,
    pub last: u16,
}

/// One whitelisted CIDR block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedSourceIp {
    pub id: String,
    pub cidr: String,
    pub port_mode: PortMode,
    /// Populated when `port_mode` is SPECIFIC
    pub ports: Vec<u16>,
    /// Populated when `port_mode` is RANGE
    pub port_range: Option<PortRange>,
}

impl AllowedSourceIp {
    /// True when the other entry whitelists exactly the same traffic
    /// (same CIDR and the same port configuration).
    pub fn same_config(
        &self,
        cidr: &str,
        port_mode: PortMode,
        ports: &[u16],
        port_range: Option<PortRange>,
    ) -> bool {
        self.cidr == cidr
            && self.port_mode == port_mode
            && self.ports == ports
            && self.port_range == port_range
    }
}

/// Whether a request adds a new whitelist entry or amends one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceIpChangeKind {
    AddSourceIp,
    ChangeSourceIp,
}

/// Pending source-IP mutation awaiting a checker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceIpChangeRequest {
    #[serde(flatten)]
    pub state: ChangeRequestState,

    /// Target entry id; required for CHANGE_SOURCE_IP
    pub source_ip_id: Option<String>,
    pub cidr: String,
    pub port_mode: PortMode,
    pub ports: Vec<u16>,
    pub port_range: Option<PortRange>,
    pub kind: SourceIpChangeKind,
}

impl ChangeRequest for SourceIpChangeRequest {
    fn state(&self) -> &ChangeRequestState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ChangeRequestState {
        &mut self.state
    }
}

/// Validate an IPv4 CIDR block of the form `a.b.c.d/nn`.
pub fn is_valid_cidr(cidr: &str) -> bool {
    let Some((addr, prefix)) = cidr.split_once('/') else {
        return false;
    };
    if addr.parse::<Ipv4Addr>().is_err() {
        return false;
    }
    match prefix.parse::<u8>() {
        Ok(bits) => bits <= 32,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cidrs() {
        assert!(is_valid_cidr("10.0.0.0/8"));
        assert!(is_valid_cidr("192.168.1.0/24"));
        assert!(is_valid_cidr("203.0.113.7/32"));
        assert!(is_valid_cidr("0.0.0.0/0"));
    }

    #[test]
    fn test_invalid_cidrs() {
        assert!(!is_valid_cidr("10.0.0.0"));
        assert!(!is_valid_cidr("10.0.0.0/33"));
        assert!(!is_valid_cidr("10.0.0.256/8"));
        assert!(!is_valid_cidr("not-a-cidr/8"));
        assert!(!is_valid_cidr("10.0.0.0/-1"));
        assert!(!is_valid_cidr(""));
    }

    #[test]
    fn test_same_config() {
        let entry = AllowedSourceIp {
            id: "ip-1".to_string(),
            cidr: "10.0.0.0/8".to_string(),
            port_mode: PortMode::Specific,
            ports: vec![443, 8443],
            port_range: None,
        };

        assert!(entry.same_config("10.0.0.0/8", PortMode::Specific, &[443, 8443], None));
        assert!(!entry.same_config("10.0.0.0/8", PortMode::Specific, &[443], None));
        assert!(!entry.same_config("10.0.0.0/8", PortMode::Any, &[443, 8443], None));
        assert!(!entry.same_config("10.1.0.0/16", PortMode::Specific, &[443, 8443], None));
    }
}
