//! The in-memory model an audit runs against.

use std::collections::{BTreeMap, BTreeSet};

use elb_core::{InputResult, Inventory, LoadBalancer, SecurityGroup};

/// Load balancers plus every security group their instances reference.
///
/// Built once per run and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    pub load_balancers: Vec<LoadBalancer>,
    security_groups: BTreeMap<String, SecurityGroup>,
}

impl Topology {
    pub fn new(load_balancers: Vec<LoadBalancer>, security_groups: Vec<SecurityGroup>) -> Self {
        Self {
            load_balancers,
            security_groups: security_groups
                .into_iter()
                .map(|sg| (sg.id.clone(), sg))
                .collect(),
        }
    }

    /// Read the inventory, fetching each referenced security group once.
    pub fn collect(inventory: &dyn Inventory) -> InputResult<Self> {
        let load_balancers = inventory.list_load_balancers()?;

        let group_ids: BTreeSet<&str> = load_balancers
            .iter()
            .flat_map(|lb| &lb.instances)
            .flat_map(|instance| &instance.security_groups)
            .map(String::as_str)
            .collect();

        let mut security_groups = BTreeMap::new();
        for group_id in group_ids {
            let group = inventory.list_security_group_ingress(group_id)?;
            tracing::debug!(sg = %group.id, name = %group.name, rules = group.ingress.len(), "Fetched security group");
            security_groups.insert(group_id.to_string(), group);
        }

        tracing::info!(
            load_balancers = load_balancers.len(),
            security_groups = security_groups.len(),
            "Collected topology"
        );

        Ok(Self {
            load_balancers,
            security_groups,
        })
    }

    pub fn security_group(&self, group_id: &str) -> Option<&SecurityGroup> {
        self.security_groups.get(group_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elb_core::{Instance, InputError, SnapshotInventory};

    fn make_lb(name: &str, groups: &[&str]) -> LoadBalancer {
        LoadBalancer {
            name: name.to_string(),
            availability_zones: vec!["us-east-1a".to_string()],
            listeners: vec![],
            health_check: None,
            instances: vec![Instance {
                id: format!("i-{name}"),
                availability_zone: "us-east-1a".to_string(),
                security_groups: groups.iter().map(|g| g.to_string()).collect(),
                state: "InService".to_string(),
            }],
        }
    }

    fn make_group(id: &str) -> SecurityGroup {
        SecurityGroup {
            id: id.to_string(),
            name: id.to_string(),
            ingress: vec![],
        }
    }

    #[test]
    fn test_collect_resolves_shared_groups_once() {
        let inventory = SnapshotInventory {
            regions: vec![],
            load_balancers: vec![make_lb("a", &["sg-1", "sg-2"]), make_lb("b", &["sg-1"])],
            security_groups: vec![make_group("sg-1"), make_group("sg-2"), make_group("sg-unused")],
        };

        let topology = Topology::collect(&inventory).unwrap();
        assert_eq!(topology.load_balancers.len(), 2);
        assert!(topology.security_group("sg-1").is_some());
        assert!(topology.security_group("sg-2").is_some());
        assert!(topology.security_group("sg-unused").is_none());
    }

    #[test]
    fn test_collect_fails_on_dangling_group() {
        let inventory = SnapshotInventory {
            regions: vec![],
            load_balancers: vec![make_lb("a", &["sg-missing"])],
            security_groups: vec![],
        };

        let result = Topology::collect(&inventory);
        assert!(matches!(result, Err(InputError::UnknownSecurityGroup(_))));
    }
}
