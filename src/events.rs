// Events that flow from the grid extractors into the telemetry buffer
//
// Every event carries a process-unique id, a UTC timestamp and one of six
// payload shapes. The payload enum is adjacently tagged so a serialized event
// looks like {"id": .., "timestamp": .., "eventType": "grid_scrolled", "data": {..}}
// and consumers can match exhaustively on the variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::grid::{ColumnState, FilterModel};

/// A stamped telemetry event as stored in the buffer and sent to sinks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl TelemetryEvent {
    pub fn event_type(&self) -> EventType {
        self.payload.event_type()
    }
}

/// Payload of a telemetry event, discriminated by `eventType` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType", content = "data", rename_all = "snake_case")]
pub enum EventPayload {
    /// Rows inside the rendered viewport
    VisibleRowsExtracted(VisibleRows),

    /// Rows in the current selection
    SelectedRowsExtracted(SelectedRows),

    /// Every row plus column, filter and viewport configuration
    FullGridStateExtracted(Box<FullGridState>),

    /// Debounced scroll report
    GridScrolled(GridScrolled),

    /// A single row transitioned to selected
    RowSelected(RowSelected),

    /// The grid finished loading its data
    GridInitialized(GridInitialized),
}

impl EventPayload {
    pub fn event_type(&self) -> EventType {
        match self {
            EventPayload::VisibleRowsExtracted(_) => EventType::VisibleRowsExtracted,
            EventPayload::SelectedRowsExtracted(_) => EventType::SelectedRowsExtracted,
            EventPayload::FullGridStateExtracted(_) => EventType::FullGridStateExtracted,
            EventPayload::GridScrolled(_) => EventType::GridScrolled,
            EventPayload::RowSelected(_) => EventType::RowSelected,
            EventPayload::GridInitialized(_) => EventType::GridInitialized,
        }
    }
}

/// Event type discriminator (matches the JSON "eventType" field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    VisibleRowsExtracted,
    SelectedRowsExtracted,
    FullGridStateExtracted,
    GridScrolled,
    RowSelected,
    GridInitialized,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::VisibleRowsExtracted => "visible_rows_extracted",
            EventType::SelectedRowsExtracted => "selected_rows_extracted",
            EventType::FullGridStateExtracted => "full_grid_state_extracted",
            EventType::GridScrolled => "grid_scrolled",
            EventType::RowSelected => "row_selected",
            EventType::GridInitialized => "grid_initialized",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRows {
    pub first_displayed_row: i64,
    pub last_displayed_row: i64,
    pub visible_row_count: usize,
    pub visible_rows: Vec<Value>,
    pub visible_product_ids: Vec<String>,
    pub total_visible_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedRows {
    pub selected_count: usize,
    pub selected_rows: Vec<Value>,
    pub selected_product_ids: Vec<String>,
    pub total_selected_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullGridState {
    pub total_row_count: usize,
    pub displayed_row_count: usize,
    pub selected_row_count: usize,
    pub rows: Vec<Value>,
    pub column_state: Vec<ColumnState>,
    pub filter_model: FilterModel,
    pub viewport: Viewport,
    pub aggregations: Aggregations,
}

/// Inclusive range of displayed row indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub first_row: i64,
    pub last_row: i64,
}

/// Fixed aggregate set computed over all rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregations {
    pub total_inventory_value: f64,
    /// 0.0 when the grid has no rows
    pub avg_price: f64,
    pub in_stock_count: usize,
    pub out_of_stock_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridScrolled {
    pub direction: ScrollDirection,
    pub first_visible_row: i64,
    pub last_visible_row: i64,
    pub visible_row_count: usize,
    pub scroll_top: f64,
    pub scroll_left: f64,
}

/// Tag recorded on every `row_selected` event
pub const SELECTION_SOURCE: &str = "user_interaction";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSelected {
    pub product_id: String,
    pub row_data: Value,
    pub selection_source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridInitialized {
    pub row_count: usize,
    pub columns: Vec<String>,
}

/// Generate a process-unique event id
///
/// Format: `<unix millis>-<counter>`. The counter never repeats within a
/// process, so ids stay unique even when many events share a millisecond.
pub fn generate_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let count = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}", Utc::now().timestamp_millis(), count)
}
