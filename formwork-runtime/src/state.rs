//! Key/value publish-subscribe state store.
//!
//! Broadcasts cross-cutting facts (e.g. `database.schema`) to any interested
//! module. Last write wins; there is no replay, so a subscriber added after
//! a publish never sees that value. Delivery is synchronous and per-key in
//! subscription order, against the subscriber set registered at the moment
//! of publish.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Handle returned by [`StateStore::subscribe`], usable to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type StateCallback = Arc<dyn Fn(&Value) -> anyhow::Result<()> + Send + Sync>;

#[derive(Default)]
struct Inner {
    values: HashMap<String, Value>,
    subscribers: HashMap<String, Vec<(SubscriptionId, StateCallback)>>,
    next_id: u64,
}

#[derive(Default)]
pub struct StateStore {
    inner: Mutex<Inner>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, then deliver it to every subscriber
    /// currently registered for that key, in subscription order.
    ///
    /// A failing subscriber is logged and skipped; it never blocks delivery
    /// to the subscribers after it.
    pub fn publish(&self, key: &str, value: Value) {
        let subscribers = {
            let mut inner = self.inner.lock().expect("state store poisoned");
            inner.values.insert(key.to_string(), value.clone());
            inner
                .subscribers
                .get(key)
                .map(|subs| subs.clone())
                .unwrap_or_default()
        };

        for (id, callback) in subscribers {
            if let Err(err) = callback(&value) {
                warn!(key = %key, subscription = ?id, "state subscriber failed: {err:#}");
            }
        }
    }

    /// Last value published under `key`, if any.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner
            .lock()
            .expect("state store poisoned")
            .values
            .get(key)
            .cloned()
    }

    /// Register a handler for future publishes to `key`.
    pub fn subscribe<F>(&self, key: &str, callback: F) -> SubscriptionId
    where
        F: Fn(&Value) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock().expect("state store poisoned");
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner
            .subscribers
            .entry(key.to_string())
            .or_default()
            .push((id, Arc::new(callback)));
        id
    }

    /// Remove a subscription. Unknown ids are ignored.
    pub fn unsubscribe(&self, key: &str, id: SubscriptionId) {
        let mut inner = self.inner.lock().expect("state store poisoned");
        if let Some(subs) = inner.subscribers.get_mut(key) {
            subs.retain(|(sub_id, _)| *sub_id != id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn publish_then_get() {
        let store = StateStore::new();
        store.publish("database.schema", json!({"entities": []}));
        assert_eq!(store.get("database.schema"), Some(json!({"entities": []})));
    }

    #[test]
    fn get_absent_returns_none() {
        let store = StateStore::new();
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn last_publish_wins() {
        let store = StateStore::new();
        store.publish("k", json!(1));
        store.publish("k", json!(2));
        assert_eq!(store.get("k"), Some(json!(2)));
    }

    #[test]
    fn subscriber_receives_each_publish_in_order() {
        let store = StateStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        store.subscribe("k", move |value| {
            seen_clone.lock().unwrap().push(value.clone());
            Ok(())
        });

        store.publish("k", json!(1));
        store.publish("k", json!(2));
        store.publish("k", json!(3));

        assert_eq!(*seen.lock().unwrap(), vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn late_subscriber_misses_prior_publishes() {
        let store = StateStore::new();
        store.publish("k", json!("early"));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        store.subscribe("k", move |value| {
            seen_clone.lock().unwrap().push(value.clone());
            Ok(())
        });

        assert!(seen.lock().unwrap().is_empty());
        store.publish("k", json!("late"));
        assert_eq!(*seen.lock().unwrap(), vec![json!("late")]);
    }

    #[test]
    fn delivery_is_in_subscription_order() {
        let store = StateStore::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            store.subscribe("k", move |_| {
                order.lock().unwrap().push(tag);
                Ok(())
            });
        }

        store.publish("k", json!(null));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn failing_subscriber_does_not_block_later_ones() {
        let store = StateStore::new();
        let delivered = Arc::new(Mutex::new(Vec::new()));

        store.subscribe("k", |_| anyhow::bail!("subscriber exploded"));

        let delivered_clone = Arc::clone(&delivered);
        store.subscribe("k", move |value| {
            delivered_clone.lock().unwrap().push(value.clone());
            Ok(())
        });

        store.publish("k", json!(42));
        assert_eq!(*delivered.lock().unwrap(), vec![json!(42)]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let store = StateStore::new();
        let count = Arc::new(Mutex::new(0));

        let count_clone = Arc::clone(&count);
        let id = store.subscribe("k", move |_| {
            *count_clone.lock().unwrap() += 1;
            Ok(())
        });

        store.publish("k", json!(1));
        store.unsubscribe("k", id);
        store.publish("k", json!(2));

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn subscriber_keys_are_independent() {
        let store = StateStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        store.subscribe("a", move |value| {
            seen_clone.lock().unwrap().push(value.clone());
            Ok(())
        });

        store.publish("b", json!("other key"));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn subscribing_during_publish_applies_to_next_publish() {
        let store = Arc::new(StateStore::new());
        let nested_seen = Arc::new(Mutex::new(0));

        let store_clone = Arc::clone(&store);
        let nested_clone = Arc::clone(&nested_seen);
        store.subscribe("k", move |_| {
            let nested = Arc::clone(&nested_clone);
            store_clone.subscribe("k", move |_| {
                *nested.lock().unwrap() += 1;
                Ok(())
            });
            Ok(())
        });

        store.publish("k", json!(1));
        assert_eq!(*nested_seen.lock().unwrap(), 0);

        store.publish("k", json!(2));
        assert_eq!(*nested_seen.lock().unwrap(), 1);
    }
}
