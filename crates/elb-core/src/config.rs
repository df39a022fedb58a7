//! elb-sanity.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{InputError, InputResult};
use crate::types::{ALL, IN_SERVICE};

/// Settings that tune how the audit interprets provider data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Source security group load balancers use when reaching instances.
    /// Rules referencing it open ports regardless of their CIDR ranges.
    pub load_balancer_group_id: Option<String>,
    /// CIDR strings that mean "every address".
    pub unrestricted_cidrs: Vec<String>,
    /// Instance health state counted as healthy (case-insensitive).
    pub healthy_state: String,
    /// Regions to audit, `<all>` for every region in the inventory.
    pub regions: Vec<String>,
    /// Load balancer names to audit, `<all>` for every one.
    pub names: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            load_balancer_group_id: None,
            unrestricted_cidrs: vec!["0.0.0.0/0".to_string()],
            healthy_state: IN_SERVICE.to_string(),
            regions: vec![ALL.to_string()],
            names: vec![ALL.to_string()],
        }
    }
}

impl AuditConfig {
    pub fn from_file(path: &Path) -> InputResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> InputResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a config file with every setting spelled out.
    pub fn scaffold(load_balancer_group_id: Option<&str>) -> Self {
        AuditConfig {
            load_balancer_group_id: load_balancer_group_id.map(String::from),
            ..AuditConfig::default()
        }
    }

    pub fn is_unrestricted(&self, cidr: &str) -> bool {
        self.unrestricted_cidrs.iter().any(|c| c == cidr.trim())
    }

    pub fn is_load_balancer_group(&self, group_id: &str) -> bool {
        self.load_balancer_group_id.as_deref() == Some(group_id)
    }
}
