//! Provider inventory access.
//!
//! The audit only needs two reads from a provider: the load balancers with
//! their registered instances, and the ingress rules of each security group
//! those instances use. [`Inventory`] captures exactly that, so a live API
//! client, a recorded snapshot or a test fixture can all back a run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{InputError, InputResult};
use crate::types::{LoadBalancer, SecurityGroup};

/// Read-only view of a provider account, assumed to be a consistent
/// point-in-time snapshot.
pub trait Inventory {
    /// Every region the account can be audited in.
    fn list_regions(&self) -> InputResult<Vec<String>>;

    fn list_load_balancers(&self) -> InputResult<Vec<LoadBalancer>>;

    fn list_security_group_ingress(&self, group_id: &str) -> InputResult<SecurityGroup>;
}

/// An inventory recorded to JSON.
///
/// ```json
/// {
///   "load_balancers": [{ "name": "web", "availability_zones": ["us-east-1a"], ... }],
///   "security_groups": [{ "id": "sg-1", "name": "web", "ingress": [...] }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotInventory {
    /// Explicit region list; derived from the load balancers when empty.
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub load_balancers: Vec<LoadBalancer>,
    #[serde(default)]
    pub security_groups: Vec<SecurityGroup>,
}

impl SnapshotInventory {
    pub fn from_file(path: &Path) -> InputResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let snapshot = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            load_balancers = snapshot.load_balancers.len(),
            security_groups = snapshot.security_groups.len(),
            "Loaded inventory snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_json(content: &str) -> InputResult<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

impl Inventory for SnapshotInventory {
    fn list_regions(&self) -> InputResult<Vec<String>> {
        if !self.regions.is_empty() {
            return Ok(self.regions.clone());
        }
        let derived: BTreeSet<&str> = self
            .load_balancers
            .iter()
            .filter_map(|lb| lb.region())
            .collect();
        Ok(derived.into_iter().map(String::from).collect())
    }

    fn list_load_balancers(&self) -> InputResult<Vec<LoadBalancer>> {
        Ok(self.load_balancers.clone())
    }

    fn list_security_group_ingress(&self, group_id: &str) -> InputResult<SecurityGroup> {
        self.security_groups
            .iter()
            .find(|sg| sg.id == group_id)
            .cloned()
            .ok_or_else(|| InputError::UnknownSecurityGroup(group_id.to_string()))
    }
}
