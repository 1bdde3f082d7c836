//! The module loader.

use crate::bus::EventBus;
use crate::capability::CapabilityRegistry;
use crate::module::{CmsModule, ModuleContext};
use crate::routes::{BoundRoute, RouteRegistry};
use crate::state::StateStore;
use crate::RuntimeError;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Owns the ordered module list and all shared runtime state.
///
/// Modules are loaded strictly in [`use_module`](Self::use_module) order;
/// a module that needs a capability must be registered after the module
/// that provides it. The `requires` manifest metadata is informational:
/// unmet requirements are logged at load time, never reordered around.
#[derive(Default)]
pub struct App {
    modules: Vec<(Arc<dyn CmsModule>, Value)>,
    registry: Arc<CapabilityRegistry>,
    routes: Arc<RouteRegistry>,
    events: Arc<EventBus>,
    state: Arc<StateStore>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("modules", &self.modules.len())
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a module with an empty config.
    pub fn use_module(&mut self, module: Arc<dyn CmsModule>) -> Result<&mut Self, RuntimeError> {
        self.use_module_with(module, Value::Object(serde_json::Map::new()))
    }

    /// Append a module with its config.
    ///
    /// Config is keyed by the module's manifest name, so a duplicate name is
    /// rejected as a configuration error instead of silently overwriting the
    /// earlier module's config.
    pub fn use_module_with(
        &mut self,
        module: Arc<dyn CmsModule>,
        config: Value,
    ) -> Result<&mut Self, RuntimeError> {
        let name = module.manifest().name;
        if self
            .modules
            .iter()
            .any(|(existing, _)| existing.manifest().name == name)
        {
            return Err(RuntimeError::DuplicateModule(name));
        }
        self.modules.push((module, config));
        Ok(self)
    }

    /// Load every module in registration order.
    ///
    /// Each `load` is fully awaited before the next module starts. A load
    /// failure aborts the remaining modules with no rollback of the ones
    /// already loaded.
    pub async fn start(&mut self) -> Result<(), RuntimeError> {
        for (module, config) in &self.modules {
            let manifest = module.manifest();
            info!(module = %manifest.name, version = %manifest.version, "loading module");

            for required in &manifest.requires {
                if !self.registry.contains(required) {
                    warn!(
                        module = %manifest.name,
                        capability = %required,
                        "required capability not registered before load"
                    );
                }
            }

            let context = ModuleContext::new(
                manifest.name.clone(),
                config.clone(),
                Arc::clone(&self.registry),
                Arc::clone(&self.routes),
                Arc::clone(&self.events),
                Arc::clone(&self.state),
            );

            module
                .load(&context)
                .await
                .map_err(|source| RuntimeError::ModuleLoad {
                    module: manifest.name.clone(),
                    source,
                })?;
        }

        info!(modules = self.modules.len(), "app started");
        Ok(())
    }

    pub fn registry(&self) -> &Arc<CapabilityRegistry> {
        &self.registry
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn state(&self) -> &Arc<StateStore> {
        &self.state
    }

    pub fn routes(&self) -> &Arc<RouteRegistry> {
        &self.routes
    }

    /// Every contributed route, flattened in module-registration order.
    /// This is what an HTTP binding mounts.
    pub fn all_routes(&self) -> Vec<BoundRoute> {
        self.routes.all_routes()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}
