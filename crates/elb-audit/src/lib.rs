pub mod checks;
pub mod report;
pub mod selector;
pub mod topology;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use elb_core::{AuditConfig, Finding, InputResult, Inventory, Severity};

pub use topology::Topology;

/// Outcome of one audit run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Regions the run was scoped to, after `<all>` expansion.
    pub regions: Vec<String>,
    /// Load balancers that went through the checks, in inventory order.
    pub load_balancers: Vec<String>,
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(Finding::is_error)
    }
}

/// Audit every load balancer in `topology` that matches the configured
/// names and regions.
///
/// Selection warnings come first, then the security-group, health-check and
/// zone-balance findings in that order. Nothing here fails; problems are
/// findings.
pub fn audit(topology: &Topology, config: &AuditConfig) -> AuditReport {
    let inventory = &topology.load_balancers;

    let names = selector::expand(&config.names, inventory.iter().map(|lb| lb.name.as_str()));
    let regions = selector::expand(&config.regions, inventory.iter().filter_map(|lb| lb.region()));
    tracing::info!(regions = %join(&regions), "Running ELB sanity check");
    tracing::info!(names = %join(&names), "Checking these ELBs");

    let selection = selector::select(inventory, &names, &regions);
    let mut findings = selection.findings;
    findings.extend(checks::run_all(&selection.selected, topology, config));

    tracing::info!(findings = findings.len(), "Done checking all specified ELBs");

    AuditReport {
        regions: regions.into_iter().collect(),
        load_balancers: selection.selected.iter().map(|lb| lb.name.clone()).collect(),
        findings,
    }
}

/// Collect a topology from `inventory` and audit it.
pub fn audit_inventory(inventory: &dyn Inventory, config: &AuditConfig) -> InputResult<AuditReport> {
    let topology = Topology::collect(inventory)?;
    Ok(audit(&topology, config))
}

fn join(values: &BTreeSet<String>) -> String {
    values.iter().cloned().collect::<Vec<_>>().join(",")
}
