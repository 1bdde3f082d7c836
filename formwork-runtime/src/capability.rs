//! Named capability registration and lookup.
//!
//! Modules publish capabilities by name at load time; later modules resolve
//! them through [`ModuleContext::get_capability`](crate::ModuleContext). A
//! resolved capability is a snapshot reference: re-registering a name does
//! not update handles already held by consumers.

use formwork_types::{DataProvider, PaymentProvider, RouteProvider};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::warn;

/// Well-known capability name for the [`DataProvider`] backend.
pub const DATABASE_ADAPTER: &str = "database-adapter";
/// Well-known capability name for a module's route contribution.
pub const ROUTE_PROVIDER: &str = "route-provider";
/// Well-known capability name for the [`PaymentProvider`] backend.
pub const PAYMENT_PROVIDER: &str = "payment-provider";

/// A capability implementation, tagged by kind.
///
/// The known kinds cover the contracts the scaffold itself consumes;
/// [`Capability::Opaque`] is the escape hatch for capabilities the core
/// never anticipated, resolved by downcast on the consumer side.
#[derive(Clone)]
pub enum Capability {
    DataProvider(Arc<dyn DataProvider>),
    RouteProvider(Arc<dyn RouteProvider>),
    PaymentProvider(Arc<dyn PaymentProvider>),
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Capability {
    /// Wrap an arbitrary value as an opaque capability.
    pub fn opaque<T: Send + Sync + 'static>(value: T) -> Self {
        Capability::Opaque(Arc::new(value))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Capability::DataProvider(_) => "data-provider",
            Capability::RouteProvider(_) => "route-provider",
            Capability::PaymentProvider(_) => "payment-provider",
            Capability::Opaque(_) => "opaque",
        }
    }

    pub fn as_data_provider(&self) -> Option<Arc<dyn DataProvider>> {
        match self {
            Capability::DataProvider(provider) => Some(Arc::clone(provider)),
            _ => None,
        }
    }

    pub fn as_route_provider(&self) -> Option<Arc<dyn RouteProvider>> {
        match self {
            Capability::RouteProvider(provider) => Some(Arc::clone(provider)),
            _ => None,
        }
    }

    pub fn as_payment_provider(&self) -> Option<Arc<dyn PaymentProvider>> {
        match self {
            Capability::PaymentProvider(provider) => Some(Arc::clone(provider)),
            _ => None,
        }
    }

    /// Downcast an opaque capability to a concrete type.
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        match self {
            Capability::Opaque(any) => Arc::clone(any).downcast::<T>().ok(),
            _ => None,
        }
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Capability").field(&self.kind()).finish()
    }
}

/// Name-to-implementation capability map shared by all modules.
///
/// Re-registering a name overwrites silently (last writer wins); the
/// overwrite is logged as a diagnostic. No shape checking is performed
/// beyond the kind tag; consumers validate what they resolve.
#[derive(Default)]
pub struct CapabilityRegistry {
    inner: RwLock<HashMap<String, Capability>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &str, capability: Capability) {
        let mut map = self.inner.write().expect("capability registry poisoned");
        if map.insert(name.to_string(), capability).is_some() {
            warn!(capability = %name, "capability re-registered, previous implementation replaced");
        }
    }

    pub fn get(&self, name: &str) -> Option<Capability> {
        self.inner
            .read()
            .expect("capability registry poisoned")
            .get(name)
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner
            .read()
            .expect("capability registry poisoned")
            .contains_key(name)
    }

    /// Registered capability names, unordered.
    pub fn names(&self) -> Vec<String> {
        self.inner
            .read()
            .expect("capability registry poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Resolve the `database-adapter` capability as a typed provider.
    pub fn data_provider(&self) -> Option<Arc<dyn DataProvider>> {
        self.get(DATABASE_ADAPTER)?.as_data_provider()
    }

    /// Resolve the `payment-provider` capability as a typed provider.
    pub fn payment_provider(&self) -> Option<Arc<dyn PaymentProvider>> {
        self.get(PAYMENT_PROVIDER)?.as_payment_provider()
    }
}
