//! Grid capability surface
//!
//! The rendering grid (virtualization, cell rendering, filter/sort UI) lives
//! outside this crate. The telemetry layer only needs a handful of read-only
//! queries against its current state, expressed as the [`GridSurface`] trait.
//!
//! # Availability
//!
//! A grid is not queryable until it has loaded, and stops being queryable
//! once it is unmounted. [`GridSlot`] is the shared handle that tracks this:
//! extractors and the scroll timer look the surface up at call time and treat
//! an empty slot as "nothing to extract".

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

pub mod memory;

pub use memory::InMemoryGrid;

/// A grid row: an arbitrary JSON record with a stable key field
pub type Row = Value;

/// Active filters keyed by column id; the filter shape belongs to the grid
pub type FilterModel = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinnedSide {
    Left,
    Right,
}

/// Per-column layout and sort configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnState {
    pub col_id: String,
    pub width: u32,
    pub hide: bool,
    pub sort: Option<SortDirection>,
    pub sort_index: Option<u32>,
    pub pinned: Option<PinnedSide>,
}

impl ColumnState {
    /// Visible, unsorted, unpinned column
    pub fn new(col_id: impl Into<String>, width: u32) -> Self {
        Self {
            col_id: col_id.into(),
            width,
            hide: false,
            sort: None,
            sort_index: None,
            pinned: None,
        }
    }
}

/// Read-only queries the telemetry layer issues against a live grid
///
/// Displayed indices are signed: a grid with nothing rendered reports a
/// first index greater than its last (typically `0` and `-1`).
pub trait GridSurface: Send + Sync {
    /// Index of the first rendered row
    fn first_displayed_index(&self) -> i64;

    /// Index of the last rendered row (inclusive)
    fn last_displayed_index(&self) -> i64;

    /// Displayed row at `index`, if any
    fn row_at(&self, index: i64) -> Option<Row>;

    /// Currently selected rows, in selection order
    fn selected_rows(&self) -> Vec<Row>;

    /// Visit every row known to the grid, displayed or not
    fn for_each_row(&self, visit: &mut dyn FnMut(&Row));

    fn column_state(&self) -> Vec<ColumnState>;

    fn filter_model(&self) -> FilterModel;

    /// Rows remaining after filtering
    fn displayed_row_count(&self) -> usize;

    /// Total rows known to the grid
    fn row_count(&self) -> usize {
        let mut count = 0;
        self.for_each_row(&mut |_| count += 1);
        count
    }
}

/// Shared handle to the grid surface, empty until the grid is ready
#[derive(Clone, Default)]
pub struct GridSlot {
    inner: Arc<RwLock<Option<Arc<dyn GridSurface>>>>,
}

impl GridSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, surface: Arc<dyn GridSurface>) {
        let mut slot = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(surface);
    }

    pub fn detach(&self) {
        let mut slot = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }

    /// Current surface, or `None` if the grid is not available
    pub fn current(&self) -> Option<Arc<dyn GridSurface>> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_attached(&self) -> bool {
        self.current().is_some()
    }
}

impl std::fmt::Debug for GridSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridSlot")
            .field("attached", &self.is_attached())
            .finish()
    }
}
