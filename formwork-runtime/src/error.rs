//! Error types for the module runtime.

use crate::EventStage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Two modules were registered under the same manifest name. Config is
    /// keyed by that name, so this is a configuration error rather than a
    /// silent overwrite.
    #[error("duplicate module name: {0}")]
    DuplicateModule(String),

    /// A module's `load` failed. Loading is fail-fast: modules registered
    /// after the failing one are not loaded and nothing is rolled back.
    #[error("module '{module}' failed to load")]
    ModuleLoad {
        module: String,
        #[source]
        source: anyhow::Error,
    },

    /// An event handler failed. For sequential handlers this aborts the rest
    /// of the emit; for parallel handlers the group is awaited first.
    #[error("handler failed for event '{event}' in {stage} stage")]
    Handler {
        event: String,
        stage: EventStage,
        #[source]
        source: anyhow::Error,
    },
}
