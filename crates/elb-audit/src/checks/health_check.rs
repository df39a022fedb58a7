//! The health check must probe a protocol/port some listener forwards to.

use elb_core::{Check, Finding, HealthCheckTarget, LoadBalancer};
use tracing::debug;

pub const BANNER: &str =
    "Checking for a health check with same instance protocol and instance port as a listener.";

pub fn check(lb: &LoadBalancer) -> Vec<Finding> {
    let region = lb.region();

    let Some(raw) = lb.health_check.as_deref().filter(|t| !t.trim().is_empty()) else {
        return vec![Finding::warning(
            Check::HealthCheckListener,
            &lb.name,
            region,
            "No health check is configured",
        )];
    };

    let target = HealthCheckTarget::parse(raw);
    debug!(lb = %lb.name, protocol = %target.protocol, port = target.port, "Health check");

    let has_matching_listener = lb.listeners.iter().any(|listener| {
        debug!(
            front_protocol = %listener.frontend_protocol,
            front_port = listener.frontend_port,
            back_protocol = %listener.backend_protocol,
            back_port = listener.backend_port,
            "Listener"
        );
        listener.backend_protocol == target.protocol
            && u32::from(listener.backend_port) == target.port
    });

    if has_matching_listener {
        return vec![];
    }

    vec![Finding::warning(
        Check::HealthCheckListener,
        &lb.name,
        region,
        format!(
            "No listener exists with instance protocol and instance port matching health check's protocol {} and port {}",
            target.protocol, target.port
        ),
    )]
}
