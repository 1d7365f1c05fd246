//! Source-IP change-request policy
//!
//! Whitelist entries are (CIDR, port configuration) tuples. Two entries
//! whitelisting exactly the same traffic are duplicates, whether the second
//! one arrives as an ADD or a CHANGE.

use hubadmin_participant::{
    source_ip::is_valid_cidr, AllowedSourceIp, Participant, ParticipantChangeAction, PortMode,
    SourceIpChangeKind, SourceIpChangeRequest,
};
use uuid::Uuid;

use crate::error::{ApprovalError, ChangeCategory};
use crate::workflow::{ChangePolicy, MaterializedChange};

pub struct SourceIpChangePolicy;

impl SourceIpChangePolicy {
    fn invalid(detail: impl Into<String>) -> ApprovalError {
        ApprovalError::Invalid {
            category: ChangeCategory::SourceIp,
            detail: detail.into(),
        }
    }
}

impl ChangePolicy for SourceIpChangePolicy {
    type Request = SourceIpChangeRequest;
    type Input = ();

    fn category() -> ChangeCategory {
        ChangeCategory::SourceIp
    }

    fn requests(participant: &Participant) -> &[Self::Request] {
        &participant.source_ip_change_requests
    }

    fn requests_mut(participant: &mut Participant) -> &mut Vec<Self::Request> {
        &mut participant.source_ip_change_requests
    }

    fn validate(participant: &Participant, request: &Self::Request) -> Result<(), ApprovalError> {
        if !is_valid_cidr(&request.cidr) {
            return Err(Self::invalid(format!("malformed CIDR: {}", request.cidr)));
        }

        match request.port_mode {
            PortMode::Any => {
                if !request.ports.is_empty() || request.port_range.is_some() {
                    return Err(Self::invalid("port mode ANY does not take ports"));
                }
            }
            PortMode::Specific => {
                if request.ports.is_empty() {
                    return Err(Self::invalid("port mode SPECIFIC requires at least one port"));
                }
                if request.port_range.is_some() {
                    return Err(Self::invalid("port mode SPECIFIC does not take a range"));
                }
            }
            PortMode::Range => {
                let range = request
                    .port_range
                    .ok_or_else(|| Self::invalid("port mode RANGE requires a port range"))?;
                if range.first > range.last {
                    return Err(Self::invalid(format!(
                        "port range is inverted: {}-{}",
                        range.first, range.last
                    )));
                }
                if !request.ports.is_empty() {
                    return Err(Self::invalid("port mode RANGE does not take a port list"));
                }
            }
        }

        if request.kind == SourceIpChangeKind::ChangeSourceIp {
            let target_id = request
                .source_ip_id
                .as_deref()
                .ok_or_else(|| Self::invalid("CHANGE_SOURCE_IP must name the target entry"))?;
            if !participant
                .allowed_source_ips
                .iter()
                .any(|entry| entry.id == target_id)
            {
                return Err(ApprovalError::TargetNotFound {
                    category: ChangeCategory::SourceIp,
                    target_id: target_id.to_string(),
                });
            }
        }

        Ok(())
    }

    fn find_conflict(participant: &Participant, request: &Self::Request) -> Option<String> {
        // ADD and CHANGE both compare the full traffic tuple against every
        // live entry; for CHANGE this includes the target itself.
        participant
            .allowed_source_ips
            .iter()
            .find(|entry| {
                entry.same_config(
                    &request.cidr,
                    request.port_mode,
                    &request.ports,
                    request.port_range,
                )
            })
            .map(|entry| {
                format!(
                    "entry {} already whitelists {} with the same port configuration",
                    entry.id, entry.cidr
                )
            })
    }

    fn materialize(
        participant: &mut Participant,
        request: &Self::Request,
        _input: Self::Input,
    ) -> Result<MaterializedChange, ApprovalError> {
        match request.kind {
            SourceIpChangeKind::AddSourceIp => {
                let id = Uuid::new_v4().to_string();
                participant.allowed_source_ips.push(AllowedSourceIp {
                    id: id.clone(),
                    cidr: request.cidr.clone(),
                    port_mode: request.port_mode,
                    ports: request.ports.clone(),
                    port_range: request.port_range,
                });

                Ok(MaterializedChange {
                    id,
                    action: ParticipantChangeAction::ParticipantSourceIpAdded,
                })
            }
            SourceIpChangeKind::ChangeSourceIp => {
                let target_id = request.source_ip_id.clone().ok_or_else(|| {
                    Self::invalid("CHANGE_SOURCE_IP must name the target entry")
                })?;
                let entry = participant
                    .allowed_source_ips
                    .iter_mut()
                    .find(|entry| entry.id == target_id)
                    .ok_or_else(|| ApprovalError::TargetNotFound {
                        category: ChangeCategory::SourceIp,
                        target_id: target_id.clone(),
                    })?;
                entry.cidr = request.cidr.clone();
                entry.port_mode = request.port_mode;
                entry.ports = request.ports.clone();
                entry.port_range = request.port_range;

                Ok(MaterializedChange {
                    id: target_id,
                    action: ParticipantChangeAction::ParticipantSourceIpChanged,
                })
            }
        }
    }

    fn created_action() -> ParticipantChangeAction {
        ParticipantChangeAction::ParticipantSourceIpChangeRequestCreated
    }

    fn approved_action() -> ParticipantChangeAction {
        ParticipantChangeAction::ParticipantSourceIpChangeRequestApproved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{approve, submit};
    use chrono::Utc;
    use hubadmin_participant::{ChangeRequestState, PortRange};

    fn participant() -> Participant {
        Participant::new("p1", "Alpha Bank", "admin")
    }

    fn add_request(id: &str, created_by: &str, cidr: &str) -> SourceIpChangeRequest {
        SourceIpChangeRequest {
            state: ChangeRequestState::new(Some(id.to_string()), created_by),
            source_ip_id: None,
            cidr: cidr.to_string(),
            port_mode: PortMode::Any,
            ports: Vec::new(),
            port_range: None,
            kind: SourceIpChangeKind::AddSourceIp,
        }
    }

    #[test]
    fn test_malformed_cidr_rejected() {
        let mut p = participant();
        let result = submit::<SourceIpChangePolicy>(&mut p, add_request("req-1", "alice", "oops"));
        assert!(matches!(result, Err(ApprovalError::Invalid { .. })));
    }

    #[test]
    fn test_port_mode_rules() {
        let mut p = participant();

        let mut specific_without_ports = add_request("req-1", "alice", "10.0.0.0/8");
        specific_without_ports.port_mode = PortMode::Specific;
        assert!(matches!(
            submit::<SourceIpChangePolicy>(&mut p, specific_without_ports),
            Err(ApprovalError::Invalid { .. })
        ));

        let mut inverted_range = add_request("req-2", "alice", "10.0.0.0/8");
        inverted_range.port_mode = PortMode::Range;
        inverted_range.port_range = Some(PortRange { first: 9000, last: 8000 });
        assert!(matches!(
            submit::<SourceIpChangePolicy>(&mut p, inverted_range),
            Err(ApprovalError::Invalid { .. })
        ));

        let mut any_with_ports = add_request("req-3", "alice", "10.0.0.0/8");
        any_with_ports.ports = vec![443];
        assert!(matches!(
            submit::<SourceIpChangePolicy>(&mut p, any_with_ports),
            Err(ApprovalError::Invalid { .. })
        ));
    }

    #[test]
    fn test_add_approval_assigns_new_id() {
        let mut p = participant();
        submit::<SourceIpChangePolicy>(&mut p, add_request("req-1", "alice", "10.0.0.0/8"))
            .unwrap();

        let outcome =
            approve::<SourceIpChangePolicy>(&mut p, "req-1", "bob", (), Utc::now()).unwrap();

        assert_eq!(
            outcome.action,
            ParticipantChangeAction::ParticipantSourceIpAdded
        );
        assert_eq!(p.allowed_source_ips.len(), 1);
        assert_eq!(p.allowed_source_ips[0].id, outcome.id);
        assert!(!outcome.id.is_empty());
    }

    #[test]
    fn test_same_traffic_tuple_rejected() {
        let mut p = participant();
        submit::<SourceIpChangePolicy>(&mut p, add_request("req-1", "alice", "10.0.0.0/8"))
            .unwrap();
        approve::<SourceIpChangePolicy>(&mut p, "req-1", "bob", (), Utc::now()).unwrap();

        submit::<SourceIpChangePolicy>(&mut p, add_request("req-2", "alice", "10.0.0.0/8"))
            .unwrap();
        let result = approve::<SourceIpChangePolicy>(&mut p, "req-2", "bob", (), Utc::now());
        assert!(matches!(result, Err(ApprovalError::DuplicateChange { .. })));
        assert_eq!(p.allowed_source_ips.len(), 1);
    }

    #[test]
    fn test_change_mutates_target_in_place() {
        let mut p = participant();
        p.allowed_source_ips.push(AllowedSourceIp {
            id: "ip-1".to_string(),
            cidr: "10.0.0.0/8".to_string(),
            port_mode: PortMode::Any,
            ports: Vec::new(),
            port_range: None,
        });

        let request = SourceIpChangeRequest {
            state: ChangeRequestState::new(Some("req-1".to_string()), "alice"),
            source_ip_id: Some("ip-1".to_string()),
            cidr: "192.168.0.0/16".to_string(),
            port_mode: PortMode::Specific,
            ports: vec![443],
            port_range: None,
            kind: SourceIpChangeKind::ChangeSourceIp,
        };
        submit::<SourceIpChangePolicy>(&mut p, request).unwrap();

        let outcome =
            approve::<SourceIpChangePolicy>(&mut p, "req-1", "bob", (), Utc::now()).unwrap();

        assert_eq!(outcome.id, "ip-1");
        assert_eq!(p.allowed_source_ips.len(), 1);
        assert_eq!(p.allowed_source_ips[0].cidr, "192.168.0.0/16");
        assert_eq!(p.allowed_source_ips[0].ports, vec![443]);
    }
}
