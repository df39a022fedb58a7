//! Shared types used across the elb-sanity crates.
//!
//! The model mirrors what a load-balancer provider reports: load balancers
//! with their zones, listeners, health-check target and registered instances,
//! plus the security groups those instances belong to. Everything derives
//! serde so a recorded snapshot decodes straight into these types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::RangeInclusive;

/// Reserved filter value meaning "every name" or "every region".
pub const ALL: &str = "<all>";

/// Health state a provider reports for an instance that is receiving traffic.
pub const IN_SERVICE: &str = "InService";

// ── Protocols ──────────────────────────────────────────────────────

/// Protocol symbol shared by listeners, health-check targets and ingress rules.
///
/// Parsing is case-insensitive, so `"HTTP"` from a listener and `"http"`
/// from a health-check target compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Protocol {
    Http,
    Https,
    Tcp,
    Ssl,
    Udp,
    /// Anything else, stored lower-cased (`icmp`, `-1`, ...).
    Other(String),
}

impl Protocol {
    pub fn as_str(&self) -> &str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
            Protocol::Tcp => "tcp",
            Protocol::Ssl => "ssl",
            Protocol::Udp => "udp",
            Protocol::Other(other) => other,
        }
    }

    /// Whether health-check targets of this protocol carry a request path.
    pub fn has_path(&self) -> bool {
        matches!(self, Protocol::Http | Protocol::Https)
    }
}

impl From<&str> for Protocol {
    fn from(raw: &str) -> Self {
        let folded = raw.to_ascii_lowercase();
        match folded.as_str() {
            "http" => Protocol::Http,
            "https" => Protocol::Https,
            "tcp" => Protocol::Tcp,
            "ssl" => Protocol::Ssl,
            "udp" => Protocol::Udp,
            _ => Protocol::Other(folded),
        }
    }
}

impl From<String> for Protocol {
    fn from(raw: String) -> Self {
        Protocol::from(raw.as_str())
    }
}

impl From<Protocol> for String {
    fn from(protocol: Protocol) -> Self {
        protocol.as_str().to_string()
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Load balancers ─────────────────────────────────────────────────

/// A front-end to back-end port mapping on a load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    pub frontend_protocol: Protocol,
    pub frontend_port: u16,
    pub backend_protocol: Protocol,
    pub backend_port: u16,
}

/// An instance registered with a load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    pub availability_zone: String,
    #[serde(default)]
    pub security_groups: Vec<String>,
    /// Provider health state, e.g. `InService` or `OutOfService`.
    pub state: String,
}

impl Instance {
    /// Whether the reported state matches `healthy_state`, ignoring case.
    pub fn is_healthy(&self, healthy_state: &str) -> bool {
        self.state.eq_ignore_ascii_case(healthy_state)
    }
}

/// A named load balancer and everything registered with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub name: String,
    #[serde(default)]
    pub availability_zones: Vec<String>,
    #[serde(default)]
    pub listeners: Vec<Listener>,
    /// Raw health-check target, e.g. `HTTP:8080/health`.
    #[serde(default)]
    pub health_check: Option<String>,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl LoadBalancer {
    /// Region derived from the first enabled zone, `None` without zones.
    pub fn region(&self) -> Option<&str> {
        self.availability_zones
            .first()
            .map(|zone| region_of_zone(zone))
    }

    /// Whether every enabled zone derives to the same region.
    pub fn has_single_region(&self) -> bool {
        let regions: BTreeSet<&str> = self
            .availability_zones
            .iter()
            .map(|zone| region_of_zone(zone))
            .collect();
        regions.len() <= 1
    }

    /// Distinct back-end ports the instances must accept traffic on.
    pub fn required_ports(&self) -> BTreeSet<u16> {
        self.listeners.iter().map(|l| l.backend_port).collect()
    }

    pub fn is_zone_enabled(&self, zone: &str) -> bool {
        self.availability_zones.iter().any(|z| z == zone)
    }
}

/// Strip the trailing zone letter: `us-east-1a` becomes `us-east-1`.
pub fn region_of_zone(zone: &str) -> &str {
    match zone.char_indices().last() {
        Some((idx, _)) => &zone[..idx],
        None => zone,
    }
}

// ── Security groups ────────────────────────────────────────────────

/// One allow-rule of a security group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRule {
    pub protocol: Protocol,
    /// `-1` for ICMP, absent on all-traffic rules.
    #[serde(default)]
    pub from_port: Option<i32>,
    #[serde(default)]
    pub to_port: Option<i32>,
    #[serde(default)]
    pub cidr_ranges: Vec<String>,
    /// Source security groups allowed instead of a CIDR.
    #[serde(default)]
    pub group_ids: Vec<String>,
}

impl IngressRule {
    /// The closed port interval this rule opens, `None` unless both ends
    /// are real port numbers.
    pub fn port_range(&self) -> Option<RangeInclusive<u16>> {
        let from = u16::try_from(self.from_port?).ok()?;
        let to = u16::try_from(self.to_port?).ok()?;
        Some(from..=to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ingress: Vec<IngressRule>,
}

// ── Findings ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which stage of the audit produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    Selection,
    SecurityGroupPorts,
    HealthCheckListener,
    ZoneBalance,
}

/// One severity-tagged diagnostic about a load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub check: Check,
    pub load_balancer: String,
    /// `None` when the load balancer has no zones to derive it from.
    pub region: Option<String>,
    pub message: String,
    /// Healthy instances per enabled zone, attached to balance warnings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_counts: Option<BTreeMap<String, usize>>,
}

impl Finding {
    pub fn error(check: Check, lb: &str, region: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, check, lb, region, message.into())
    }

    pub fn warning(check: Check, lb: &str, region: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, check, lb, region, message.into())
    }

    fn new(severity: Severity, check: Check, lb: &str, region: Option<&str>, message: String) -> Self {
        Self {
            severity,
            check,
            load_balancer: lb.to_string(),
            region: region.map(String::from),
            message,
            zone_counts: None,
        }
    }

    pub fn with_zone_counts(mut self, counts: BTreeMap<String, usize>) -> Self {
        self.zone_counts = Some(counts);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: ELB {} in {}: {}",
            self.severity,
            self.load_balancer,
            self.region.as_deref().unwrap_or("unknown region"),
            self.message
        )
    }
}
