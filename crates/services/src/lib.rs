//! Background services announced by apps (client ports, server-to-server
//! ports, web bridges). The panel only records them; starting and stopping the
//! daemons is the job of the host's service manager.

use std::sync::RwLock;

use {serde::Serialize, tracing::debug};

/// A service an app exposes on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub id: String,
    pub description: String,
    /// Reachable from outside the box (needs firewall ports).
    pub is_external: bool,
    pub enabled: bool,
}

impl Service {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        is_external: bool,
        enabled: bool,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            is_external,
            enabled,
        }
    }
}

/// Registration-ordered set of services, keyed by id.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    services: RwLock<Vec<Service>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `service`, replacing an earlier entry with the same id in place.
    pub fn register(&self, service: Service) {
        debug!(
            id = %service.id,
            external = service.is_external,
            enabled = service.enabled,
            "registering service"
        );
        let mut services = self
            .services
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match services.iter_mut().find(|s| s.id == service.id) {
            Some(existing) => *existing = service,
            None => services.push(service),
        }
    }

    pub fn get(&self, id: &str) -> Option<Service> {
        self.services
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub fn list(&self) -> Vec<Service> {
        self.services
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.services
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_registration_order() {
        let registry = ServiceRegistry::new();
        registry.register(Service::new("b", "B", true, true));
        registry.register(Service::new("a", "A", false, true));

        let ids: Vec<_> = registry.list().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn re_registering_replaces() {
        let registry = ServiceRegistry::new();
        registry.register(Service::new("xmpp-bosh", "old", true, true));
        registry.register(Service::new("xmpp-bosh", "new", true, false));

        assert_eq!(registry.len(), 1);
        let svc = registry.get("xmpp-bosh");
        assert!(svc.is_some_and(|s| s.description == "new" && !s.enabled));
    }

    #[test]
    fn unknown_id() {
        assert!(ServiceRegistry::new().get("nope").is_none());
        assert!(ServiceRegistry::new().is_empty());
    }

    #[test]
    fn serializes_for_api() {
        let svc = Service::new("xmpp-client", "Chat", true, true);
        let json = serde_json::to_value(&svc).unwrap_or_default();
        assert_eq!(json["id"], "xmpp-client");
        assert_eq!(json["is_external"], true);
    }
}
