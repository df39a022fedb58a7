//! elb-core — model, configuration and inventory access for elb-sanity.
//!
//! Everything here is shared by the audit engine and the CLI: the
//! load-balancer topology types, the [`Finding`] they produce, the
//! health-check target parser and the [`Inventory`] capability trait with
//! its JSON snapshot implementation.

pub mod config;
pub mod error;
pub mod inventory;
pub mod target;
pub mod types;

pub use config::AuditConfig;
pub use error::{InputError, InputResult};
pub use inventory::{Inventory, SnapshotInventory};
pub use target::HealthCheckTarget;
pub use types::*;
