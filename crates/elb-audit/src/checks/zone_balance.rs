//! Every enabled zone needs healthy instances, in equal numbers.
//!
//! Instances registered in a zone the load balancer does not enable
//! ("stray" zones) receive no traffic; they are reported separately and
//! left out of the balance comparison.

use std::collections::BTreeSet;

use elb_core::{Check, Finding, LoadBalancer, region_of_zone};
use tracing::debug;

pub const BANNER: &str = "Checking that all enabled availability zones have healthy instances.";

/// Healthy instances per enabled zone and registered instances per stray zone.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ZoneCounts {
    /// Enabled zones, in the order the load balancer lists them.
    pub healthy: Vec<(String, usize)>,
    /// Stray zones, in the order their first instance appears.
    pub stray: Vec<(String, usize)>,
}

impl ZoneCounts {
    pub fn tally(lb: &LoadBalancer, healthy_state: &str) -> Self {
        let mut counts = ZoneCounts::default();
        for zone in &lb.availability_zones {
            if !counts.healthy.iter().any(|(z, _)| z == zone) {
                counts.healthy.push((zone.clone(), 0));
            }
        }

        for instance in &lb.instances {
            let zone = &instance.availability_zone;
            if let Some((_, count)) = counts.healthy.iter_mut().find(|(z, _)| z == zone) {
                if instance.is_healthy(healthy_state) {
                    *count += 1;
                }
            } else if let Some((_, count)) = counts.stray.iter_mut().find(|(z, _)| z == zone) {
                *count += 1;
            } else {
                counts.stray.push((zone.clone(), 1));
            }
        }

        counts
    }

    /// Whether zones that have healthy instances disagree on how many.
    ///
    /// Zones with none are already errors of their own and do not count.
    pub fn is_uneven(&self) -> bool {
        let sizes: BTreeSet<usize> = self
            .healthy
            .iter()
            .map(|(_, count)| *count)
            .filter(|count| *count > 0)
            .collect();
        sizes.len() > 1
    }
}

pub fn check(lb: &LoadBalancer, healthy_state: &str) -> Vec<Finding> {
    let counts = ZoneCounts::tally(lb, healthy_state);
    debug!(lb = %lb.name, zones = ?counts.healthy, stray = ?counts.stray, "Healthy instances per zone");

    let mut findings = Vec::new();

    for (zone, count) in &counts.healthy {
        if *count == 0 {
            findings.push(Finding::error(
                Check::ZoneBalance,
                &lb.name,
                Some(region_of_zone(zone)),
                format!("Availability zone {zone} is enabled but has no healthy instances in it."),
            ));
        }
    }

    for (zone, count) in &counts.stray {
        findings.push(Finding::warning(
            Check::ZoneBalance,
            &lb.name,
            Some(region_of_zone(zone)),
            format!(
                "Has {count} instances registered in availability zone {zone} but that zone is not enabled."
            ),
        ));
    }

    if counts.is_uneven() {
        let summary = counts
            .healthy
            .iter()
            .map(|(zone, count)| format!("{zone}={count}"))
            .collect::<Vec<_>>()
            .join(", ");
        findings.push(
            Finding::warning(
                Check::ZoneBalance,
                &lb.name,
                lb.region(),
                format!("Uneven distribution of healthy instances across enabled availability zones: {summary}"),
            )
            .with_zone_counts(counts.healthy.iter().cloned().collect()),
        );
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use elb_core::{IN_SERVICE, Instance, Severity};

    fn make_lb(zones: &[&str], instances: &[(&str, &str)]) -> LoadBalancer {
        LoadBalancer {
            name: "web".to_string(),
            availability_zones: zones.iter().map(|z| z.to_string()).collect(),
            listeners: vec![],
            health_check: None,
            instances: instances
                .iter()
                .enumerate()
                .map(|(idx, (zone, state))| Instance {
                    id: format!("i-{idx}"),
                    availability_zone: zone.to_string(),
                    security_groups: vec![],
                    state: state.to_string(),
                })
                .collect(),
        }
    }

    fn healthy_in(per_zone: &[(&'static str, usize)]) -> Vec<(&'static str, &'static str)> {
        per_zone
            .iter()
            .flat_map(|(zone, n)| std::iter::repeat((*zone, "InService")).take(*n))
            .collect()
    }

    fn zone_in(message: &str) -> &'static str {
        ["us-east-1a", "us-east-1b", "us-east-1c", "us-east-1d", "us-east-1f"]
            .into_iter()
            .find(|zone| message.contains(zone))
            .unwrap_or("none")
    }

    const AB: &[&str] = &["us-east-1a", "us-east-1b"];

    #[test]
    fn test_balanced_zones_pass() {
        let lb = make_lb(AB, &healthy_in(&[("us-east-1a", 2), ("us-east-1b", 2)]));
        assert!(check(&lb, IN_SERVICE).is_empty());
    }

    #[test]
    fn test_empty_zone_is_single_error() {
        let lb = make_lb(AB, &healthy_in(&[("us-east-1a", 2)]));
        let findings = check(&lb, IN_SERVICE);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert!(findings[0].message.contains("us-east-1b"));
        assert_eq!(findings[0].region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn test_uneven_zones_warn_with_counts() {
        let lb = make_lb(AB, &healthy_in(&[("us-east-1a", 3), ("us-east-1b", 1)]));
        let findings = check(&lb, IN_SERVICE);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        let counts = findings[0].zone_counts.as_ref().unwrap();
        assert_eq!(counts["us-east-1a"], 3);
        assert_eq!(counts["us-east-1b"], 1);
        assert!(findings[0].message.contains("us-east-1a=3, us-east-1b=1"));
    }

    #[test]
    fn test_unhealthy_instances_do_not_count() {
        let mut instances = healthy_in(&[("us-east-1a", 1), ("us-east-1b", 1)]);
        instances.push(("us-east-1a", "OutOfService"));
        let lb = make_lb(AB, &instances);

        assert!(check(&lb, IN_SERVICE).is_empty());
    }

    #[test]
    fn test_stray_zone_warns_and_is_not_compared() {
        let mut instances = healthy_in(&[("us-east-1a", 2), ("us-east-1b", 2)]);
        instances.extend(healthy_in(&[("us-east-1c", 5)]));
        let lb = make_lb(AB, &instances);
        let findings = check(&lb, IN_SERVICE);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.contains("Has 5 instances"));
        assert!(findings[0].message.contains("us-east-1c"));
    }

    #[test]
    fn test_stray_count_includes_unhealthy() {
        let lb = make_lb(&["us-east-1a"], &[("us-east-1a", "InService"), ("us-east-1d", "OutOfService")]);
        let counts = ZoneCounts::tally(&lb, IN_SERVICE);
        assert_eq!(counts.stray, vec![("us-east-1d".to_string(), 1)]);
    }

    #[test]
    fn test_findings_follow_enabled_zone_order() {
        let lb = make_lb(
            &["us-east-1c", "us-east-1a", "us-east-1b"],
            &[
                ("us-east-1b", "InService"),
                ("us-east-1f", "InService"),
                ("us-east-1d", "InService"),
            ],
        );
        let zones: Vec<&str> = check(&lb, IN_SERVICE)
            .iter()
            .map(|f| zone_in(&f.message))
            .collect();

        assert_eq!(zones, vec!["us-east-1c", "us-east-1a", "us-east-1f", "us-east-1d"]);
    }

    #[test]
    fn test_single_zone_never_uneven() {
        let lb = make_lb(&["us-east-1a"], &healthy_in(&[("us-east-1a", 7)]));
        assert!(check(&lb, IN_SERVICE).is_empty());
    }

    #[test]
    fn test_health_state_compared_case_insensitively() {
        let lb = make_lb(&["us-east-1a"], &[("us-east-1a", "inservice")]);
        assert!(check(&lb, IN_SERVICE).is_empty());
    }
}
