//! Telemetry service: stamps, buffers and forwards grid events
//!
//! One `TelemetryService` is created at application start and shared as an
//! `Arc` with every component that emits. It owns the bounded
//! [`EventBuffer`] and the registered [`EventSink`]s. Consumers read the
//! buffer through [`TelemetryService::snapshot`], which hands out an owned
//! copy, so a UI iterating over events can never observe a half-applied
//! insert or eviction.

use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::TelemetryConfig;
use crate::events::{EventPayload, TelemetryEvent};

pub mod buffer;
pub mod sink;
pub mod summary;

pub use buffer::{EventBuffer, DEFAULT_CAPACITY};
pub use sink::{ChannelSink, EventSink, TracingSink};
pub use summary::{summarize, TelemetrySummary};

/// Process-lifetime telemetry emitter
pub struct TelemetryService {
    buffer: Mutex<EventBuffer>,
    /// Held across buffering and delivery so sinks see buffer order
    delivery: Mutex<()>,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl TelemetryService {
    /// Create a service with no sinks
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Mutex::new(EventBuffer::new(capacity)),
            delivery: Mutex::new(()),
            sinks: Vec::new(),
        }
    }

    /// Create a service from config, registering the trace sink if enabled
    pub fn from_config(config: &TelemetryConfig) -> Self {
        let mut service = Self::new(config.buffer_capacity);
        if config.trace_events {
            service.register(TracingSink::new(config.trace_preview_bytes));
        }
        service
    }

    /// Register a sink
    ///
    /// Sinks are called in registration order after the event is buffered.
    pub fn register(&mut self, sink: impl EventSink + 'static) {
        self.sinks.push(Arc::new(sink));
    }

    fn buffer(&self) -> MutexGuard<'_, EventBuffer> {
        // Sinks run outside this lock; a poisoned buffer is still consistent
        self.buffer.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Stamp, buffer and forward an event
    ///
    /// Never fails: sink errors are logged and absorbed. Concurrent sends
    /// are serialized, so every sink receives events in buffer order. A sink
    /// must not call `send` from `deliver`.
    pub fn send(&self, payload: EventPayload) -> TelemetryEvent {
        let _ordered = self.delivery.lock().unwrap_or_else(|e| e.into_inner());
        let event = self.buffer().push(payload, Utc::now());

        for sink in &self.sinks {
            if let Err(e) = sink.deliver(&event) {
                tracing::warn!(
                    sink = sink.name(),
                    event_id = %event.id,
                    "Telemetry sink delivery failed: {:#}",
                    e
                );
            }
        }

        event
    }

    /// Drop every buffered event
    pub fn clear(&self) {
        self.buffer().clear();
        tracing::debug!("Telemetry buffer cleared");
    }

    /// Owned copy of the buffer, newest first
    pub fn snapshot(&self) -> Vec<TelemetryEvent> {
        self.buffer().snapshot()
    }

    pub fn summary(&self) -> TelemetrySummary {
        summarize(&self.snapshot())
    }

    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer().capacity()
    }

    /// Get names of registered sinks (for logging/debug)
    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Shut down all sinks in reverse registration order
    pub fn shutdown(&self) {
        for sink in self.sinks.iter().rev() {
            if let Err(e) = sink.shutdown() {
                tracing::warn!("Sink '{}' shutdown error: {}", sink.name(), e);
            }
        }
        tracing::debug!(buffered = self.len(), "Telemetry service shut down");
    }
}

impl Default for TelemetryService {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for TelemetryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryService")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("sinks", &self.sink_names())
            .finish()
    }
}
