//! Per-tick index of Service virtual IPs

use std::collections::HashMap;

use overlap_api::Service;

/// Maps each assigned Service IP to the Service holding it
///
/// Borrowed from one tick's Service listing and dropped with it. Services
/// without an address (empty or headless) are not indexed, and when two
/// Services share an IP the later one in list order wins.
#[derive(Debug, Default)]
pub struct ServiceIpIndex<'a> {
    by_ip: HashMap<&'a str, &'a Service>,
}

impl<'a> ServiceIpIndex<'a> {
    pub fn build(services: &'a [Service]) -> Self {
        let by_ip = services
            .iter()
            .filter(|svc| svc.has_ip())
            .map(|svc| (svc.ip.as_str(), svc))
            .collect();
        Self { by_ip }
    }

    /// Service holding `ip`, if any. Unassigned addresses never match.
    pub fn get(&self, ip: &str) -> Option<&'a Service> {
        if !overlap_api::is_assigned_ip(ip) {
            return None;
        }
        self.by_ip.get(ip).copied()
    }

    pub fn len(&self) -> usize {
        self.by_ip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_ip.is_empty()
    }
}
