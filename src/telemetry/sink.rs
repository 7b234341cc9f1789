//! Event sinks: where stamped events go after they are buffered
//!
//! The buffer is the in-memory record. Sinks are the pluggable hook for
//! everything else: the diagnostic trace, a UI channel, or an external
//! collector supplied by the embedding application.
//!
//! ```text
//! TelemetryService::send → EventBuffer (newest first, bounded)
//!                       └→ [Sink₁, Sink₂, ...] in registration order
//! ```
//!
//! # Sync Design
//!
//! `deliver` is synchronous and runs on the emitting thread, so it must not
//! block. Sinks that do I/O should hand the event to a channel or their own
//! task (see [`ChannelSink`]).
//!
//! The service delivers one event at a time in buffer order. `deliver` must
//! not emit through the same service.

use tokio::sync::mpsc;

use crate::events::TelemetryEvent;
use crate::util::json_preview;

/// Receiver of emitted telemetry events
pub trait EventSink: Send + Sync {
    /// Human-readable name for logging and debugging
    fn name(&self) -> &'static str;

    /// Handle one event. Errors are logged by the service and never reach
    /// the caller of `send`.
    fn deliver(&self, event: &TelemetryEvent) -> anyhow::Result<()>;

    /// Called once when the service shuts down
    fn shutdown(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Diagnostic trace of every event at debug level
pub struct TracingSink {
    preview_bytes: usize,
}

impl TracingSink {
    pub fn new(preview_bytes: usize) -> Self {
        Self { preview_bytes }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(512)
    }
}

impl EventSink for TracingSink {
    fn name(&self) -> &'static str {
        "tracing"
    }

    fn deliver(&self, event: &TelemetryEvent) -> anyhow::Result<()> {
        let data = serde_json::to_value(&event.payload)
            .map(|v| v.get("data").cloned().unwrap_or_default())
            .unwrap_or_default();

        tracing::debug!(
            sink = self.name(),
            event_id = %event.id,
            event_type = %event.event_type(),
            timestamp = %event.timestamp.to_rfc3339(),
            data = %json_preview(&data, self.preview_bytes),
            "Telemetry event"
        );
        Ok(())
    }
}

/// Forwards events into a tokio channel without blocking
///
/// A full or closed channel is reported as a delivery error; the event stays
/// in the buffer either way.
pub struct ChannelSink {
    tx: mpsc::Sender<TelemetryEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<TelemetryEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn name(&self) -> &'static str {
        "channel"
    }

    fn deliver(&self, event: &TelemetryEvent) -> anyhow::Result<()> {
        self.tx.try_send(event.clone()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => anyhow::anyhow!("channel full"),
            mpsc::error::TrySendError::Closed(_) => anyhow::anyhow!("channel closed"),
        })
    }
}
