//! Narrow the inventory down to the requested names and regions.

use std::collections::BTreeSet;

use elb_core::{ALL, Check, Finding, LoadBalancer};
use tracing::{debug, warn};

/// Load balancers chosen for auditing plus the warnings raised on the way.
#[derive(Debug)]
pub struct Selection<'a> {
    pub selected: Vec<&'a LoadBalancer>,
    pub findings: Vec<Finding>,
}

/// Resolve a filter list: `<all>` on its own (or nothing at all) means
/// every `available` value. Mixed with other entries it is just a name.
pub fn expand<'a>(requested: &[String], available: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    let all = match requested {
        [] => true,
        [only] => only == ALL,
        _ => false,
    };
    if all {
        available.into_iter().map(String::from).collect()
    } else {
        requested.iter().cloned().collect()
    }
}

/// Keep load balancers whose name and derived region were both requested,
/// in inventory order. Sentinels must already be expanded.
pub fn select<'a>(
    inventory: &'a [LoadBalancer],
    names: &BTreeSet<String>,
    regions: &BTreeSet<String>,
) -> Selection<'a> {
    let mut selection = Selection {
        selected: Vec::new(),
        findings: Vec::new(),
    };

    for lb in inventory {
        if !names.contains(&lb.name) {
            continue;
        }

        let Some(region) = lb.region() else {
            selection.findings.push(Finding::warning(
                Check::Selection,
                &lb.name,
                None,
                "No availability zones configured",
            ));
            continue;
        };

        if !lb.has_single_region() {
            warn!(lb = %lb.name, zones = ?lb.availability_zones, region, "Zones span several regions, using the first zone's");
        }

        if !regions.contains(region) {
            debug!(lb = %lb.name, region, "Region not requested");
            continue;
        }

        selection.selected.push(lb);
    }

    selection
}
