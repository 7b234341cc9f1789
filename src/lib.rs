// gridspy - telemetry capture for data grid views
//
// Turns grid interactions into typed, timestamped events kept in a bounded
// in-memory buffer (newest first).
//
// Architecture:
// - Grid: capability trait over the live grid plus an availability slot
// - Extract: viewport/selection/full-state payload builders, debounced scroll tracker
// - Session: one grid's lifecycle callbacks wired to extraction
// - Telemetry: the emitter (buffer + sinks) shared behind an Arc

pub mod cli;
pub mod config;
pub mod demo;
pub mod events;
pub mod extract;
pub mod fixtures;
pub mod grid;
pub mod logging;
pub mod session;
pub mod telemetry;
pub mod util;

pub use events::{EventPayload, EventType, TelemetryEvent};
pub use grid::{GridSlot, GridSurface};
pub use session::GridSession;
pub use telemetry::{EventSink, TelemetryService};
