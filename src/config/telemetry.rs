//! Telemetry and aggregation configuration
//!
//! - Telemetry: buffer capacity, scroll debounce, diagnostic trace sink
//! - Aggregation: which row fields carry the key, price, quantity and stock flag

use serde::Deserialize;
use std::time::Duration;

use crate::extract::DEFAULT_DEBOUNCE;
use crate::telemetry::DEFAULT_CAPACITY;

// ─────────────────────────────────────────────────────────────────────────────
// Telemetry Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Event buffer and emitter settings
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryConfig {
    /// Maximum events retained in memory (oldest evicted first)
    pub buffer_capacity: usize,
    /// Quiet period before a scroll burst is reported (milliseconds)
    pub scroll_debounce_ms: u64,
    /// Register the diagnostic trace sink
    pub trace_events: bool,
    /// Bytes of event data shown in the diagnostic trace
    pub trace_preview_bytes: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_CAPACITY,
            scroll_debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            trace_events: true,
            trace_preview_bytes: 512,
        }
    }
}

impl TelemetryConfig {
    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }
}

/// Telemetry settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileTelemetry {
    pub buffer_capacity: Option<usize>,
    pub scroll_debounce_ms: Option<u64>,
    pub trace_events: Option<bool>,
    pub trace_preview_bytes: Option<usize>,
}

impl TelemetryConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileTelemetry>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            buffer_capacity: file.buffer_capacity.unwrap_or(defaults.buffer_capacity),
            scroll_debounce_ms: file
                .scroll_debounce_ms
                .unwrap_or(defaults.scroll_debounce_ms),
            trace_events: file.trace_events.unwrap_or(defaults.trace_events),
            trace_preview_bytes: file
                .trace_preview_bytes
                .unwrap_or(defaults.trace_preview_bytes),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregation Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Row field names used by the aggregates
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationConfig {
    /// Identifier reported in `*ProductIds` lists
    pub key_field: String,
    pub price_field: String,
    pub quantity_field: String,
    /// Boolean in-stock flag
    pub stock_field: String,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            key_field: "id".to_string(),
            price_field: "price".to_string(),
            quantity_field: "quantity".to_string(),
            stock_field: "inStock".to_string(),
        }
    }
}

/// Aggregation settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileAggregation {
    pub key_field: Option<String>,
    pub price_field: Option<String>,
    pub quantity_field: Option<String>,
    pub stock_field: Option<String>,
}

impl AggregationConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileAggregation>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            key_field: file.key_field.unwrap_or(defaults.key_field),
            price_field: file.price_field.unwrap_or(defaults.price_field),
            quantity_field: file.quantity_field.unwrap_or(defaults.quantity_field),
            stock_field: file.stock_field.unwrap_or(defaults.stock_field),
        }
    }
}
