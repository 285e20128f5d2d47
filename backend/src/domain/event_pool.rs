//! Insertion-ordered event pool keyed by event name.
//!
//! Events offered through [`EventPool::offer`] are accepted only if no event
//! with the same name was accepted before. The name index is a hash set;
//! ordering comes from the backing vector.

use std::collections::HashSet;

use crate::domain::Event;

/// Accumulates events for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPool {
    events: Vec<Event>,
    names: HashSet<String>,
}

impl EventPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `event` unless an event with the same name is already pooled.
    ///
    /// Returns whether the event was accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_backend::domain::{Coordinates, Event, EventCategory, EventPool};
    ///
    /// let event = Event {
    ///     name: "Harbour Walk".to_owned(),
    ///     coordinates: Coordinates { latitude: 0.0, longitude: 0.0 },
    ///     snippet: String::new(),
    ///     intro: String::new(),
    ///     images: Vec::new(),
    ///     score: 1.0,
    ///     properties: Vec::new(),
    ///     category: EventCategory::HiddenGems,
    /// };
    /// let mut pool = EventPool::new();
    /// assert!(pool.offer(event.clone()));
    /// assert!(!pool.offer(event));
    /// assert_eq!(pool.len(), 1);
    /// ```
    pub fn offer(&mut self, event: Event) -> bool {
        if self.names.contains(&event.name) {
            return false;
        }
        self.names.insert(event.name.clone());
        self.events.push(event);
        true
    }

    /// Append `event` without checking for an existing name.
    ///
    /// Used by the popularity backfill, which does not deduplicate against
    /// the pool. Later [`offer`](Self::offer) calls still see the name.
    pub fn append_unchecked(&mut self, event: Event) {
        self.names.insert(event.name.clone());
        self.events.push(event);
    }

    /// Number of pooled events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the pool holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Pooled events in acceptance order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Consume the pool, yielding events in acceptance order.
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}
