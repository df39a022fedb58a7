pub mod health_check;
pub mod security_groups;
pub mod zone_balance;

use elb_core::{AuditConfig, Finding, LoadBalancer};
use tracing::info;

use crate::topology::Topology;

/// Run the three checks over `selected`, check by check.
///
/// Each check visits every load balancer before the next one starts, so the
/// findings read as one section per check.
pub fn run_all(selected: &[&LoadBalancer], topology: &Topology, config: &AuditConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    info!("{}", security_groups::BANNER);
    for lb in selected {
        info!(lb = %lb.name, "Checking ELB");
        findings.extend(security_groups::check(lb, topology, config));
    }

    info!("{}", health_check::BANNER);
    for lb in selected {
        info!(lb = %lb.name, "Checking ELB");
        findings.extend(health_check::check(lb));
    }

    info!("{}", zone_balance::BANNER);
    for lb in selected {
        info!(lb = %lb.name, "Checking ELB");
        findings.extend(zone_balance::check(lb, &config.healthy_state));
    }

    findings
}
