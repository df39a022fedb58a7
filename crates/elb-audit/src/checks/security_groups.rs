//! Instance security groups must let load-balancer traffic reach every
//! listener's back-end port.

use std::collections::BTreeSet;

use elb_core::{AuditConfig, Check, Finding, IngressRule, Instance, LoadBalancer, Protocol};
use tracing::debug;

use crate::topology::Topology;

pub const BANNER: &str = "Checking that instance security groups allow traffic from all listeners.";

pub fn check(lb: &LoadBalancer, topology: &Topology, config: &AuditConfig) -> Vec<Finding> {
    let region = lb.region();
    let mut findings = Vec::new();

    if lb.instances.is_empty() {
        findings.push(Finding::warning(
            Check::SecurityGroupPorts,
            &lb.name,
            region,
            "No instances assigned to this ELB",
        ));
    }

    let required = lb.required_ports();
    debug!(lb = %lb.name, ports = ?required, "Required instance ports");

    for instance in &lb.instances {
        let unopened = unopened_ports(instance, &required, topology, config);
        if unopened.is_empty() {
            continue;
        }
        let ports = unopened
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(",");
        findings.push(Finding::error(
            Check::SecurityGroupPorts,
            &lb.name,
            region,
            format!(
                "Instance {} does not have these ports open to listen to ELB traffic: {ports}",
                instance.id
            ),
        ));
    }

    findings
}

/// Required ports that none of the instance's rules open to the load balancer.
pub fn unopened_ports(
    instance: &Instance,
    required: &BTreeSet<u16>,
    topology: &Topology,
    config: &AuditConfig,
) -> BTreeSet<u16> {
    debug!(instance = %instance.id, "Checking instance");
    let mut needed = required.clone();

    for group_id in &instance.security_groups {
        if needed.is_empty() {
            break;
        }
        let Some(group) = topology.security_group(group_id) else {
            debug!(sg = %group_id, "Security group not in topology");
            continue;
        };
        debug!(sg = %group.id, name = %group.name, "Security group");

        for rule in &group.ingress {
            if needed.is_empty() {
                break;
            }
            if !authorizes_load_balancer(rule, config) {
                continue;
            }
            let Some(range) = rule.port_range() else {
                debug!("Permission has no usable port range");
                continue;
            };
            needed.retain(|port| {
                let open = range.contains(port);
                if open {
                    debug!(port, "Found opening for port");
                }
                !open
            });
        }
    }

    needed
}

/// Whether `rule` admits TCP traffic originating from the load balancer.
///
/// A rule naming source groups authorizes only when one of them is the
/// configured load-balancer group, whatever its CIDRs say. A rule without
/// source groups must be open to an unrestricted CIDR.
pub fn authorizes_load_balancer(rule: &IngressRule, config: &AuditConfig) -> bool {
    debug!(
        protocol = %rule.protocol,
        cidrs = %rule.cidr_ranges.join(","),
        groups = %rule.group_ids.join(","),
        from = ?rule.from_port,
        to = ?rule.to_port,
        "Permission"
    );

    if rule.protocol != Protocol::Tcp {
        debug!("Protocol is not TCP");
        return false;
    }

    if !rule.group_ids.is_empty() {
        let from_lb = rule.group_ids.iter().any(|g| config.is_load_balancer_group(g));
        if from_lb {
            debug!("Permission is to the load balancer's security group");
        } else {
            debug!("Permission is to a non-load-balancer security group");
        }
        return from_lb;
    }

    let open_to_all = rule.cidr_ranges.iter().any(|c| config.is_unrestricted(c));
    if !open_to_all {
        debug!("Permission is locked to a non-global IP address range");
    }
    open_to_all
}
