//! Health-check target descriptor parsing.
//!
//! Targets look like `HTTP:8080/health`, `HTTPS:8443/a/b` or `TCP:443`.
//! Parsing never fails: a malformed target still yields a best-effort
//! value, and the listener check then reports it as unmatched.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Protocol;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckTarget {
    pub protocol: Protocol,
    pub port: u32,
    /// Request path, only for HTTP and HTTPS targets.
    pub path: Option<String>,
}

impl HealthCheckTarget {
    pub fn parse(raw: &str) -> Self {
        let Some((scheme, rest)) = raw.split_once(':') else {
            return Self {
                protocol: Protocol::from(raw),
                port: 0,
                path: None,
            };
        };

        let protocol = Protocol::from(scheme);
        let (port_text, path) = if protocol.has_path() {
            match rest.find('/') {
                Some(slash) => (&rest[..slash], Some(rest[slash..].to_string())),
                None => (rest, None),
            }
        } else {
            (rest, None)
        };

        Self {
            protocol,
            port: leading_number(port_text),
            path,
        }
    }
}

impl fmt::Display for HealthCheckTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.protocol, self.port)?;
        if let Some(path) = &self.path {
            f.write_str(path)?;
        }
        Ok(())
    }
}

/// Leading decimal digits of `text`, 0 when there are none.
fn leading_number(text: &str) -> u32 {
    text.trim_start()
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u32, |acc, digit| acc.saturating_mul(10).saturating_add(digit))
}
