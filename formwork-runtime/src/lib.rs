//! In-process module runtime for Formwork.
//!
//! Lets independently-loaded modules discover and compose each other without
//! direct imports, through three shared structures:
//! - [`CapabilityRegistry`] — named capability registration/lookup
//!   (last-write-wins, typed kinds with an opaque escape hatch)
//! - [`EventBus`] — staged, priority-ordered, partially-parallel events
//! - [`StateStore`] — key/value publish-subscribe for cross-cutting facts
//!   (last value wins, no replay for late subscribers)
//!
//! [`App`] owns all three plus the ordered module list; `start()` loads
//! modules strictly in registration order, handing each a [`ModuleContext`]
//! view. Registration order is the dependency mechanism: a module that
//! resolves a capability sees only what earlier modules registered.
//!
//! Nothing here persists across process restarts; this is a composition and
//! wiring layer only.

mod app;
mod bus;
mod capability;
mod error;
mod module;
mod routes;
mod state;

pub use app::App;
pub use bus::{EventBus, EventCallback, EventStage, SubscribeOptions};
pub use capability::{
    Capability, CapabilityRegistry, DATABASE_ADAPTER, PAYMENT_PROVIDER, ROUTE_PROVIDER,
};
pub use error::RuntimeError;
pub use module::{CmsModule, ModuleContext};
pub use routes::{BoundRoute, RouteRegistry};
pub use state::{StateStore, SubscriptionId};
