//! Aggregation of route contributions across modules.
//!
//! When a module registers the `route-provider` capability, the loader
//! forwards the provider's declared routes here, keyed by the registering
//! module's manifest name. An external HTTP binding reads
//! [`RouteRegistry::all_routes`] and mounts the result on its own framework.

use formwork_types::RouteDefinition;
use std::sync::RwLock;
use tracing::info;

/// A route tagged with the module that contributed it.
#[derive(Debug, Clone)]
pub struct BoundRoute {
    pub module: String,
    pub route: RouteDefinition,
}

/// Route sets in module-registration order.
#[derive(Default)]
pub struct RouteRegistry {
    inner: RwLock<Vec<(String, Vec<RouteDefinition>)>>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a module's route contribution. Multiple contributions from the
    /// same module accumulate in the order they were registered.
    pub fn add_routes(&self, module: &str, routes: Vec<RouteDefinition>) {
        info!(module = %module, count = routes.len(), "routes contributed");
        self.inner
            .write()
            .expect("route registry poisoned")
            .push((module.to_string(), routes));
    }

    /// Every contributed route, flattened in module-registration order and
    /// tagged with its module's name.
    pub fn all_routes(&self) -> Vec<BoundRoute> {
        self.inner
            .read()
            .expect("route registry poisoned")
            .iter()
            .flat_map(|(module, routes)| {
                routes.iter().map(|route| BoundRoute {
                    module: module.clone(),
                    route: route.clone(),
                })
            })
            .collect()
    }

    /// Routes contributed by one module, in contribution order.
    pub fn module_routes(&self, module: &str) -> Vec<RouteDefinition> {
        self.inner
            .read()
            .expect("route registry poisoned")
            .iter()
            .filter(|(name, _)| name == module)
            .flat_map(|(_, routes)| routes.iter().cloned())
            .collect()
    }

    pub fn route_count(&self) -> usize {
        self.inner
            .read()
            .expect("route registry poisoned")
            .iter()
            .map(|(_, routes)| routes.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_types::{HttpMethod, RouteResponse};
    use serde_json::json;

    fn route(method: HttpMethod, path: &str) -> RouteDefinition {
        RouteDefinition::new(method, path, |_| async { RouteResponse::json(json!({})) })
    }

    #[test]
    fn all_routes_flattens_in_registration_order() {
        let registry = RouteRegistry::new();
        registry.add_routes(
            "resource-module",
            vec![route(HttpMethod::Get, "/schema"), route(HttpMethod::Get, "/resources/:resource")],
        );
        registry.add_routes("payments", vec![route(HttpMethod::Post, "/orders/initiate")]);

        let all = registry.all_routes();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].module, "resource-module");
        assert_eq!(all[0].route.path, "/schema");
        assert_eq!(all[1].route.path, "/resources/:resource");
        assert_eq!(all[2].module, "payments");
    }

    #[test]
    fn module_routes_filters_by_module() {
        let registry = RouteRegistry::new();
        registry.add_routes("a", vec![route(HttpMethod::Get, "/a1")]);
        registry.add_routes("b", vec![route(HttpMethod::Get, "/b1")]);
        registry.add_routes("a", vec![route(HttpMethod::Get, "/a2")]);

        let a_routes = registry.module_routes("a");
        assert_eq!(a_routes.len(), 2);
        assert_eq!(a_routes[0].path, "/a1");
        assert_eq!(a_routes[1].path, "/a2");
        assert_eq!(registry.route_count(), 3);
    }
}
