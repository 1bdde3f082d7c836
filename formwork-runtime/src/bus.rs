//! Staged, priority-ordered event bus.
//!
//! Each named event passes through four fixed stages in order: validation,
//! processing, notification, default. Within a stage, handlers run in
//! descending priority order (ties keep subscribe order). Handlers marked
//! parallel are issued together once the stage's sequential handlers have
//! all completed, and awaited as a group.
//!
//! Staging lets independent modules implement cross-cutting concerns (a
//! validation-stage veto before processing-stage side effects) without
//! coordinating directly; priority lets a module front-run or tail another
//! module's handler for the same event and stage.

use crate::RuntimeError;
use futures::future::{self, BoxFuture};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// The four fixed phases an event passes through during emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStage {
    Validation,
    Processing,
    Notification,
    Default,
}

impl EventStage {
    /// Stages in emission order.
    pub const ALL: [EventStage; 4] = [
        EventStage::Validation,
        EventStage::Processing,
        EventStage::Notification,
        EventStage::Default,
    ];

    fn index(self) -> usize {
        match self {
            EventStage::Validation => 0,
            EventStage::Processing => 1,
            EventStage::Notification => 2,
            EventStage::Default => 3,
        }
    }
}

impl fmt::Display for EventStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventStage::Validation => "validation",
            EventStage::Processing => "processing",
            EventStage::Notification => "notification",
            EventStage::Default => "default",
        };
        f.write_str(s)
    }
}

/// Subscription placement: stage, priority, and the parallel flag.
///
/// The parallel flag is an ordering-relaxation escape hatch for handlers
/// known to be independent of each other.
#[derive(Debug, Clone, Copy)]
pub struct SubscribeOptions {
    pub stage: EventStage,
    pub priority: i32,
    pub parallel: bool,
}

impl Default for SubscribeOptions {
    fn default() -> Self {
        Self {
            stage: EventStage::Default,
            priority: 0,
            parallel: false,
        }
    }
}

impl SubscribeOptions {
    pub fn stage(stage: EventStage) -> Self {
        Self {
            stage,
            ..Self::default()
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }
}

/// Boxed async event handler.
pub type EventCallback = Arc<dyn Fn(Value) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

#[derive(Clone)]
struct Subscription {
    callback: EventCallback,
    priority: i32,
    parallel: bool,
}

type StageTable = [Vec<Subscription>; 4];

/// Staged event bus shared by all modules of an [`App`](crate::App).
#[derive(Default)]
pub struct EventBus {
    events: Mutex<HashMap<String, StageTable>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler to the event's stage, keeping the stage sorted by
    /// descending priority. The sort is stable: equal priorities keep their
    /// subscribe order.
    pub fn subscribe<F, Fut>(&self, event: &str, options: SubscribeOptions, callback: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let callback: EventCallback = Arc::new(move |payload| Box::pin(callback(payload)));
        let mut events = self.events.lock().expect("event bus poisoned");
        let stage = &mut events.entry(event.to_string()).or_default()[options.stage.index()];
        stage.push(Subscription {
            callback,
            priority: options.priority,
            parallel: options.parallel,
        });
        stage.sort_by_key(|s| Reverse(s.priority));
    }

    /// Emit an event through all four stages in order.
    ///
    /// Resolves once every applicable handler has settled. A sequential
    /// handler failure aborts the remaining sequential handlers of its
    /// stage, skips the stage's parallel group, and stops all later stages.
    /// A parallel handler failure rejects the emit, but the group is awaited
    /// to collective completion first; started work is never cancelled.
    /// Emitting an event with no subscribers resolves immediately.
    pub async fn emit(&self, event: &str, payload: Value) -> Result<(), RuntimeError> {
        let table = {
            let events = self.events.lock().expect("event bus poisoned");
            events.get(event).cloned()
        };
        let Some(table) = table else {
            return Ok(());
        };

        for stage in EventStage::ALL {
            self.run_stage(event, stage, &table[stage.index()], &payload)
                .await?;
        }
        Ok(())
    }

    /// Emit a single stage of an event, with the same per-stage semantics
    /// as [`emit`](Self::emit).
    pub async fn emit_stage(
        &self,
        event: &str,
        payload: Value,
        stage: EventStage,
    ) -> Result<(), RuntimeError> {
        let handlers = {
            let events = self.events.lock().expect("event bus poisoned");
            events.get(event).map(|table| table[stage.index()].clone())
        };
        let Some(handlers) = handlers else {
            return Ok(());
        };
        self.run_stage(event, stage, &handlers, &payload).await
    }

    async fn run_stage(
        &self,
        event: &str,
        stage: EventStage,
        handlers: &[Subscription],
        payload: &Value,
    ) -> Result<(), RuntimeError> {
        // Sequential handlers first, one at a time, so each sees the side
        // effects of the ones before it.
        for sub in handlers.iter().filter(|s| !s.parallel) {
            (sub.callback)(payload.clone())
                .await
                .map_err(|source| RuntimeError::Handler {
                    event: event.to_string(),
                    stage,
                    source,
                })?;
        }

        let parallel: Vec<_> = handlers
            .iter()
            .filter(|s| s.parallel)
            .map(|s| (s.callback)(payload.clone()))
            .collect();
        if parallel.is_empty() {
            return Ok(());
        }

        for result in future::join_all(parallel).await {
            result.map_err(|source| RuntimeError::Handler {
                event: event.to_string(),
                stage,
                source,
            })?;
        }
        Ok(())
    }
}
