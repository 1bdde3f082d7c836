//! The module contract and the per-module context view.

use crate::bus::{EventBus, SubscribeOptions};
use crate::capability::{Capability, CapabilityRegistry, ROUTE_PROVIDER};
use crate::routes::RouteRegistry;
use crate::state::{StateStore, SubscriptionId};
use crate::RuntimeError;
use async_trait::async_trait;
use formwork_types::{DataProvider, ModuleManifest, PaymentProvider};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

/// A loadable unit of functionality.
///
/// Modules never hold references to each other; everything they share goes
/// through the capabilities, events, and state exposed by [`ModuleContext`].
#[async_trait]
pub trait CmsModule: Send + Sync {
    fn manifest(&self) -> ModuleManifest;

    /// Called once by the loader, in registration order. A capability
    /// resolved here is a snapshot: later re-registrations are not seen
    /// unless the module re-queries.
    async fn load(&self, context: &ModuleContext) -> anyhow::Result<()>;
}

/// A module's view of the shared runtime during `load`.
///
/// Wraps the shared registry, event bus, state store, and route registry
/// together with the module's own config and name. The name tags route
/// contributions and diagnostics.
pub struct ModuleContext {
    module: String,
    config: Value,
    registry: Arc<CapabilityRegistry>,
    routes: Arc<RouteRegistry>,
    events: Arc<EventBus>,
    state: Arc<StateStore>,
}

impl ModuleContext {
    pub(crate) fn new(
        module: String,
        config: Value,
        registry: Arc<CapabilityRegistry>,
        routes: Arc<RouteRegistry>,
        events: Arc<EventBus>,
        state: Arc<StateStore>,
    ) -> Self {
        Self {
            module,
            config,
            registry,
            routes,
            events,
            state,
        }
    }

    /// The loading module's manifest name.
    pub fn module_name(&self) -> &str {
        &self.module
    }

    /// This module's config value, as stored at registration.
    pub fn config(&self) -> &Value {
        &self.config
    }

    /// Deserialize this module's config into a typed struct.
    pub fn config_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.config.clone())
    }

    // ================================================================
    // Capabilities
    // ================================================================

    /// Register a capability under `name`.
    ///
    /// Registering under [`ROUTE_PROVIDER`] additionally forwards the
    /// provider's declared routes to the route registry, tagged with this
    /// module's name.
    pub fn register(&self, name: &str, capability: Capability) {
        if name == ROUTE_PROVIDER {
            match &capability {
                Capability::RouteProvider(provider) => {
                    self.routes.add_routes(&self.module, provider.routes());
                }
                other => {
                    warn!(
                        module = %self.module,
                        kind = other.kind(),
                        "route-provider registered with a non-route capability kind, routes not forwarded"
                    );
                }
            }
        }
        self.registry.register(name, capability);
    }

    /// Resolve a capability by name. Absence is not an error here; consumers
    /// decide whether to abort their own load.
    pub fn get_capability(&self, name: &str) -> Option<Capability> {
        self.registry.get(name)
    }

    /// Typed shortcut for the `database-adapter` capability.
    pub fn data_provider(&self) -> Option<Arc<dyn DataProvider>> {
        self.registry.data_provider()
    }

    /// Typed shortcut for the `payment-provider` capability.
    pub fn payment_provider(&self) -> Option<Arc<dyn PaymentProvider>> {
        self.registry.payment_provider()
    }

    // ================================================================
    // Events
    // ================================================================

    pub async fn emit(&self, event: &str, payload: Value) -> Result<(), RuntimeError> {
        self.events.emit(event, payload).await
    }

    pub fn subscribe<F, Fut>(&self, event: &str, options: SubscribeOptions, callback: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.events.subscribe(event, options, callback);
    }

    // ================================================================
    // State
    // ================================================================

    pub fn publish(&self, key: &str, value: Value) {
        self.state.publish(key, value);
    }

    pub fn get_state(&self, key: &str) -> Option<Value> {
        self.state.get(key)
    }

    pub fn subscribe_state<F>(&self, key: &str, callback: F) -> SubscriptionId
    where
        F: Fn(&Value) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.state.subscribe(key, callback)
    }
}
