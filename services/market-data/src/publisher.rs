//! Event fan-out with bounded subscriber queues
//!
//! Each subscriber owns a bounded queue. Publication enqueues and returns;
//! when a queue is full the oldest event is dropped and the subscriber's
//! drop counter incremented. The engine is therefore wait-free with
//! respect to subscribers: a stalled consumer loses events, it never
//! stalls matching.

use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use tracing::{debug, warn};

use matching_engine::events::{EventSink, MarketEvent};

use crate::channels::Topic;

/// One event routed to one topic
#[derive(Debug, Clone)]
pub struct Delivery {
    pub topic: Topic,
    pub event: MarketEvent,
}

struct SubscriberState {
    topics: BTreeSet<Topic>,
    queue: VecDeque<Delivery>,
    capacity: usize,
    dropped: u64,
}

impl SubscriberState {
    fn enqueue(&mut self, delivery: Delivery) {
        if self.queue.len() >= self.capacity {
            self.queue.pop_front();
            self.dropped += 1;
        }
        self.queue.push_back(delivery);
    }
}

/// Handle held by a subscriber
///
/// Draining and topic changes go through the handle; the publisher keeps a
/// shared reference to the same state for routing.
pub struct SubscriberHandle {
    id: u64,
    state: Arc<Mutex<SubscriberState>>,
}

impl SubscriberHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Take all queued deliveries, oldest first
    pub fn drain(&self) -> Vec<Delivery> {
        let mut state = self.state.lock().expect("subscriber state poisoned");
        state.queue.drain(..).collect()
    }

    /// Events lost to overflow since subscribing
    pub fn dropped(&self) -> u64 {
        self.state.lock().expect("subscriber state poisoned").dropped
    }

    pub fn queue_len(&self) -> usize {
        self.state
            .lock()
            .expect("subscriber state poisoned")
            .queue
            .len()
    }

    pub fn subscribe(&self, topic: Topic) {
        self.state
            .lock()
            .expect("subscriber state poisoned")
            .topics
            .insert(topic);
    }

    pub fn unsubscribe(&self, topic: &Topic) {
        self.state
            .lock()
            .expect("subscriber state poisoned")
            .topics
            .remove(topic);
    }

    pub fn topics(&self) -> Vec<Topic> {
        self.state
            .lock()
            .expect("subscriber state poisoned")
            .topics
            .iter()
            .cloned()
            .collect()
    }
}

/// Routes engine events to subscriber queues
pub struct Publisher {
    subscribers: DashMap<u64, Arc<Mutex<SubscriberState>>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl Publisher {
    /// `capacity` bounds each subscriber's queue
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "subscriber queue capacity must be positive");
        Self {
            subscribers: DashMap::new(),
            next_id: AtomicU64::new(1),
            capacity,
        }
    }

    /// Register a subscriber for `topics` (may be empty and changed later)
    pub fn subscribe(&self, topics: impl IntoIterator<Item = Topic>) -> SubscriberHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let state = Arc::new(Mutex::new(SubscriberState {
            topics: topics.into_iter().collect(),
            queue: VecDeque::new(),
            capacity: self.capacity,
            dropped: 0,
        }));
        self.subscribers.insert(id, state.clone());
        debug!(subscriber_id = id, "subscriber registered");
        SubscriberHandle { id, state }
    }

    /// Remove a subscriber; its handle keeps draining what is queued
    pub fn remove(&self, id: u64) -> bool {
        let removed = self.subscribers.remove(&id).is_some();
        if removed {
            debug!(subscriber_id = id, "subscriber removed");
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Enqueue `event` for every subscriber of `topic`
    pub fn publish_to(&self, topic: &Topic, event: &MarketEvent) {
        for entry in self.subscribers.iter() {
            let mut state = entry.value().lock().expect("subscriber state poisoned");
            if !state.topics.contains(topic) {
                continue;
            }
            let was_full = state.queue.len() >= state.capacity;
            state.enqueue(Delivery {
                topic: topic.clone(),
                event: event.clone(),
            });
            if was_full {
                warn!(
                    subscriber_id = *entry.key(),
                    %topic,
                    dropped = state.dropped,
                    "subscriber queue overflow; dropped oldest event"
                );
            }
        }
    }
}

impl EventSink for Publisher {
    fn publish(&self, event: &MarketEvent) {
        let topic = Topic::for_event(event);
        self.publish_to(&topic, event);
    }
}
