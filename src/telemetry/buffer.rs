//! Bounded, newest-first event buffer

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::events::{generate_id, EventPayload, TelemetryEvent};

/// Default number of events retained
pub const DEFAULT_CAPACITY: usize = 50;

/// Rolling window of the most recent events, newest at the front
#[derive(Debug)]
pub struct EventBuffer {
    events: VecDeque<TelemetryEvent>,
    capacity: usize,
}

impl EventBuffer {
    /// Create a buffer holding at most `capacity` events (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Stamp a payload and insert it at the head, dropping the oldest if full
    ///
    /// The timestamp never goes backwards relative to the previous head, even
    /// if the wall clock does.
    pub fn push(&mut self, payload: EventPayload, now: DateTime<Utc>) -> TelemetryEvent {
        let timestamp = match self.events.front() {
            Some(head) if head.timestamp > now => head.timestamp,
            _ => now,
        };

        let event = TelemetryEvent {
            id: generate_id(),
            timestamp,
            payload,
        };

        self.events.push_front(event.clone());
        while self.events.len() > self.capacity {
            self.events.pop_back();
        }
        event
    }

    /// Owned copy of the buffer, newest first
    pub fn snapshot(&self) -> Vec<TelemetryEvent> {
        self.events.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GridInitialized;
    use chrono::Duration;

    fn payload(n: usize) -> EventPayload {
        EventPayload::GridInitialized(GridInitialized {
            row_count: n,
            columns: Vec::new(),
        })
    }

    fn row_count(event: &TelemetryEvent) -> usize {
        match &event.payload {
            EventPayload::GridInitialized(init) => init.row_count,
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_bound_holds_after_every_push() {
        let mut buffer = EventBuffer::default();
        for n in 0..120 {
            buffer.push(payload(n), Utc::now());
            assert!(buffer.len() <= DEFAULT_CAPACITY);
        }
        assert_eq!(buffer.len(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_keeps_most_recent_newest_first() {
        let mut buffer = EventBuffer::default();
        for n in 0..75 {
            buffer.push(payload(n), Utc::now());
        }

        let counts: Vec<usize> = buffer.snapshot().iter().map(row_count).collect();
        let expected: Vec<usize> = (25..75).rev().collect();
        assert_eq!(counts, expected);
    }

    #[test]
    fn test_timestamps_never_decrease() {
        let mut buffer = EventBuffer::new(10);
        let now = Utc::now();
        buffer.push(payload(0), now);
        // Clock stepped backwards
        let second = buffer.push(payload(1), now - Duration::seconds(5));
        assert_eq!(second.timestamp, now);

        let snapshot = buffer.snapshot();
        assert!(snapshot[0].timestamp >= snapshot[1].timestamp);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut buffer = EventBuffer::new(10);
        buffer.push(payload(0), Utc::now());
        let snapshot = buffer.snapshot();

        buffer.clear();
        buffer.push(payload(1), Utc::now());

        assert_eq!(snapshot.len(), 1);
        assert_eq!(row_count(&snapshot[0]), 0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut buffer = EventBuffer::new(10);
        buffer.push(payload(0), Utc::now());
        buffer.clear();
        buffer.clear();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut buffer = EventBuffer::new(0);
        buffer.push(payload(0), Utc::now());
        buffer.push(payload(1), Utc::now());
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(row_count(&buffer.snapshot()[0]), 1);
    }
}
