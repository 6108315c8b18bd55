//! Synchronous in-process publish/subscribe

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use anyhow::Result;
use tracing::warn;

use super::{GameEvent, Topic};

type Handler = Arc<dyn Fn(&GameEvent) -> Result<()> + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Outcome of a single publish call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: usize,
    pub failed: usize,
}

/// Topic -> ordered handler registry.
///
/// Handlers run inline on the publisher's thread in registration order.
/// Each call is isolated: an `Err` or a panic is logged and the remaining
/// handlers still run.
#[derive(Default)]
pub struct EventNotifier {
    handlers: RwLock<HashMap<Topic, Vec<(SubscriptionId, Handler)>>>,
    next_id: AtomicU64,
}

impl EventNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> SubscriptionId
    where
        F: Fn(&GameEvent) -> Result<()> + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        handlers
            .entry(topic)
            .or_default()
            .push((id, Arc::new(handler)));
        id
    }

    /// Remove a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        for list in handlers.values_mut() {
            if let Some(pos) = list.iter().position(|(sid, _)| *sid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        handlers.get(&topic).map(Vec::len).unwrap_or(0)
    }

    /// Deliver `event` to every handler registered for its topic at call time
    pub fn publish(&self, event: &GameEvent) -> Delivery {
        let topic = event.topic();

        // Snapshot so the lock is not held while handlers run
        let snapshot: Vec<Handler> = {
            let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
            match handlers.get(&topic) {
                Some(list) => list.iter().map(|(_, h)| Arc::clone(h)).collect(),
                None => return Delivery::default(),
            }
        };

        let mut delivery = Delivery::default();
        for handler in snapshot {
            match catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => delivery.delivered += 1,
                Ok(Err(e)) => {
                    warn!("[bq:events] Subscriber for {} failed: {}", topic, e);
                    delivery.failed += 1;
                }
                Err(_) => {
                    warn!("[bq:events] Subscriber for {} panicked", topic);
                    delivery.failed += 1;
                }
            }
        }
        delivery
    }

    pub fn publish_all<'a>(&self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            self.publish(event);
        }
    }
}

impl std::fmt::Debug for EventNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        let counts: HashMap<&str, usize> = handlers
            .iter()
            .map(|(topic, list)| (topic.as_str(), list.len()))
            .collect();
        f.debug_struct("EventNotifier")
            .field("subscribers", &counts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    fn score_event(score: u64) -> GameEvent {
        GameEvent::ScoreUpdated {
            user_id: "u1".to_string(),
            new_score: score,
            at: Utc::now(),
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let notifier = EventNotifier::new();
        let delivery = notifier.publish(&score_event(10));
        assert_eq!(delivery, Delivery::default());
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let notifier = EventNotifier::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            notifier.subscribe(Topic::ScoreUpdated, move |_| {
                seen.lock().unwrap().push(label);
                Ok(())
            });
        }

        let delivery = notifier.publish(&score_event(100));
        assert_eq!(delivery.delivered, 3);
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_only_matching_topic_is_notified() {
        let notifier = EventNotifier::new();
        let hits = Arc::new(Mutex::new(0));
        let h = Arc::clone(&hits);
        notifier.subscribe(Topic::RankUp, move |_| {
            *h.lock().unwrap() += 1;
            Ok(())
        });

        notifier.publish(&score_event(5));
        assert_eq!(*hits.lock().unwrap(), 0);
    }

    #[test]
    fn test_failing_subscribers_are_isolated() {
        let notifier = EventNotifier::new();
        let reached = Arc::new(Mutex::new(false));

        notifier.subscribe(Topic::ScoreUpdated, |_| anyhow::bail!("log sink closed"));
        notifier.subscribe(Topic::ScoreUpdated, |_| panic!("subscriber bug"));
        let r = Arc::clone(&reached);
        notifier.subscribe(Topic::ScoreUpdated, move |_| {
            *r.lock().unwrap() = true;
            Ok(())
        });

        let delivery = notifier.publish(&score_event(1));
        assert_eq!(delivery, Delivery { delivered: 1, failed: 2 });
        assert!(*reached.lock().unwrap());
    }

    #[test]
    fn test_subscriber_added_during_publish_is_not_called() {
        let notifier = Arc::new(EventNotifier::new());
        let late_calls = Arc::new(Mutex::new(0));

        let n = Arc::clone(&notifier);
        let late = Arc::clone(&late_calls);
        notifier.subscribe(Topic::ScoreUpdated, move |_| {
            let late = Arc::clone(&late);
            n.subscribe(Topic::ScoreUpdated, move |_| {
                *late.lock().unwrap() += 1;
                Ok(())
            });
            Ok(())
        });

        let delivery = notifier.publish(&score_event(1));
        assert_eq!(delivery.delivered, 1);
        assert_eq!(*late_calls.lock().unwrap(), 0);
        assert_eq!(notifier.subscriber_count(Topic::ScoreUpdated), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let notifier = EventNotifier::new();
        let id = notifier.subscribe(Topic::ScoreUpdated, |_| Ok(()));
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        assert_eq!(notifier.publish(&score_event(1)).delivered, 0);
    }
}
