//! Topic-based publish/subscribe with weakly referenced subscribers.
//!
//! Used for the wiretap message streams. Subscribers hand out an
//! `Arc<dyn Listener>`; topics only keep a `Weak` to it, so dropping
//! the subscriber (a disconnecting wizard) silently ends the
//! subscription. Events can be sent store-and-forward (drained by the
//! next `sync`) or synchronously.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

/// Topic key: a plain name, or a (kind, name) pair such as
/// ("wiretap-living", "julie").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TopicName {
    Simple(String),
    Pair(String, String),
}

impl TopicName {
    pub fn simple(name: impl Into<String>) -> Self {
        TopicName::Simple(name.into())
    }

    pub fn pair(kind: impl Into<String>, name: impl Into<String>) -> Self {
        TopicName::Pair(kind.into(), name.into())
    }
}

impl std::fmt::Display for TopicName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopicName::Simple(name) => write!(f, "{}", name),
            TopicName::Pair(kind, name) => write!(f, "{}:{}", kind, name),
        }
    }
}

/// A wiretap-style event: who said it, and what.
pub type TopicEvent = (String, String);

/// Outcome of delivering one event to one listener.
pub enum Listen {
    Consumed,
    /// Leave the event in place; deliver it again on the next sync.
    NotYet,
}

/// Subscriber interface.
pub trait Listener: Send + Sync {
    fn pubsub_event(&self, topic: &TopicName, event: &TopicEvent) -> Listen;
}

struct TopicInner {
    subscribers: Vec<Weak<dyn Listener>>,
    events: Vec<TopicEvent>,
}

/// A single named topic.
pub struct Topic {
    name: TopicName,
    inner: Mutex<TopicInner>,
}

impl Topic {
    fn new(name: TopicName) -> Self {
        Self {
            name,
            inner: Mutex::new(TopicInner {
                subscribers: Vec::new(),
                events: Vec::new(),
            }),
        }
    }

    pub fn name(&self) -> &TopicName {
        &self.name
    }

    pub fn subscribe(&self, listener: &Arc<dyn Listener>) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let already = inner
            .subscribers
            .iter()
            .any(|w| w.upgrade().map(|s| Arc::ptr_eq(&s, listener)).unwrap_or(false));
        if !already {
            inner.subscribers.push(Arc::downgrade(listener));
        }
    }

    pub fn unsubscribe(&self, listener: &Arc<dyn Listener>) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.subscribers.retain(|w| {
            w.upgrade()
                .map(|s| !Arc::ptr_eq(&s, listener))
                .unwrap_or(false)
        });
    }

    pub fn subscriber_count(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.subscribers.iter().filter(|w| w.strong_count() > 0).count()
    }

    /// Queue an event; delivers immediately when `synchronous`.
    pub fn send(&self, event: TopicEvent, synchronous: bool) {
        {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.events.push(event);
        }
        if synchronous {
            self.sync();
        }
    }

    /// Push all pending events to the live subscribers. An event a
    /// listener answers with `NotYet` stays queued for the next sync.
    pub fn sync(&self) {
        let (events, subscribers) = {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.subscribers.retain(|w| w.strong_count() > 0);
            (
                std::mem::take(&mut inner.events),
                inner.subscribers.clone(),
            )
        };
        let mut kept = Vec::new();
        for event in events {
            let mut retry = false;
            for weak in &subscribers {
                if let Some(listener) = weak.upgrade() {
                    if matches!(listener.pubsub_event(&self.name, &event), Listen::NotYet) {
                        retry = true;
                    }
                }
            }
            if retry {
                kept.push(event);
            }
        }
        if !kept.is_empty() {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            // preserve order: retried events go before anything newer
            let newer = std::mem::take(&mut inner.events);
            inner.events = kept;
            inner.events.extend(newer);
        }
    }

    pub fn pending_count(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.events.len()
    }
}

/// The topic registry. `topic()` returns a per-name singleton.
#[derive(Default)]
pub struct PubSub {
    topics: Mutex<HashMap<TopicName, Arc<Topic>>>,
}

impl PubSub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(&self, name: TopicName) -> Arc<Topic> {
        let mut topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        topics
            .entry(name.clone())
            .or_insert_with(|| Arc::new(Topic::new(name)))
            .clone()
    }

    /// Drain the pending events of every topic.
    pub fn sync_all(&self) {
        let topics: Vec<Arc<Topic>> = {
            let topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
            topics.values().cloned().collect()
        };
        for topic in topics {
            topic.sync();
        }
    }

    /// Remove a subscriber from every topic it was subscribed to.
    pub fn unsubscribe_all(&self, listener: &Arc<dyn Listener>) {
        let topics: Vec<Arc<Topic>> = {
            let topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
            topics.values().cloned().collect()
        };
        for topic in topics {
            topic.unsubscribe(listener);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Collector {
        received: Mutex<Vec<TopicEvent>>,
        defer_first: AtomicUsize,
    }

    impl Collector {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                received: Mutex::new(Vec::new()),
                defer_first: AtomicUsize::new(0),
            })
        }
    }

    impl Listener for Collector {
        fn pubsub_event(&self, _topic: &TopicName, event: &TopicEvent) -> Listen {
            if self.defer_first.load(Ordering::SeqCst) > 0 {
                self.defer_first.fetch_sub(1, Ordering::SeqCst);
                return Listen::NotYet;
            }
            self.received.lock().unwrap().push(event.clone());
            Listen::Consumed
        }
    }

    #[test]
    fn topics_are_singletons() {
        let bus = PubSub::new();
        let a = bus.topic(TopicName::simple("chatter"));
        let b = bus.topic(TopicName::simple("chatter"));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn store_and_forward_until_sync() {
        let bus = PubSub::new();
        let topic = bus.topic(TopicName::pair("wiretap-living", "julie"));
        let collector = Collector::new();
        let listener: Arc<dyn Listener> = collector.clone();
        topic.subscribe(&listener);
        topic.send(("julie".into(), "hello".into()), false);
        assert!(collector.received.lock().unwrap().is_empty());
        topic.sync();
        assert_eq!(collector.received.lock().unwrap().len(), 1);
    }

    #[test]
    fn synchronous_send_delivers_immediately() {
        let bus = PubSub::new();
        let topic = bus.topic(TopicName::simple("t"));
        let collector = Collector::new();
        let listener: Arc<dyn Listener> = collector.clone();
        topic.subscribe(&listener);
        topic.send(("a".into(), "b".into()), true);
        assert_eq!(collector.received.lock().unwrap().len(), 1);
    }

    #[test]
    fn not_yet_keeps_the_event_queued() {
        let bus = PubSub::new();
        let topic = bus.topic(TopicName::simple("t"));
        let collector = Collector::new();
        collector.defer_first.store(1, Ordering::SeqCst);
        let listener: Arc<dyn Listener> = collector.clone();
        topic.subscribe(&listener);
        topic.send(("a".into(), "later".into()), true);
        assert!(collector.received.lock().unwrap().is_empty());
        assert_eq!(topic.pending_count(), 1);
        topic.sync();
        assert_eq!(collector.received.lock().unwrap().len(), 1);
        assert_eq!(topic.pending_count(), 0);
    }

    #[test]
    fn dropped_subscribers_stop_receiving() {
        let bus = PubSub::new();
        let topic = bus.topic(TopicName::simple("t"));
        let collector = Collector::new();
        let listener: Arc<dyn Listener> = collector.clone();
        topic.subscribe(&listener);
        assert_eq!(topic.subscriber_count(), 1);
        drop(listener);
        drop(collector);
        topic.send(("a".into(), "b".into()), true);
        assert_eq!(topic.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribe_all_covers_every_topic() {
        let bus = PubSub::new();
        let t1 = bus.topic(TopicName::simple("one"));
        let t2 = bus.topic(TopicName::simple("two"));
        let collector = Collector::new();
        let listener: Arc<dyn Listener> = collector.clone();
        t1.subscribe(&listener);
        t2.subscribe(&listener);
        bus.unsubscribe_all(&listener);
        assert_eq!(t1.subscriber_count(), 0);
        assert_eq!(t2.subscriber_count(), 0);
    }
}
