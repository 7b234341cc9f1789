//! Extraction adapters: grid state in, telemetry events out
//!
//! Each adapter reads the live grid through [`GridSurface`](crate::grid::GridSurface)
//! and produces one typed payload. The payload builders in the submodules are
//! pure functions of the grid; [`Extractor`] adds the availability guard and
//! hands the result to the [`TelemetryService`].
//!
//! | Adapter    | Event                       | Trigger                     |
//! |------------|-----------------------------|-----------------------------|
//! | viewport   | `visible_rows_extracted`    | on demand                   |
//! | selection  | `selected_rows_extracted`   | on demand                   |
//! | full_state | `full_grid_state_extracted` | on demand (full scan)       |
//! | scroll     | `grid_scrolled`             | debounced scroll callbacks  |

use std::sync::Arc;

use crate::events::{EventPayload, TelemetryEvent};
use crate::grid::GridSlot;
use crate::telemetry::TelemetryService;

pub mod aggregate;
pub mod full_state;
pub mod scroll;
pub mod selection;
pub mod viewport;

pub use aggregate::Aggregator;
pub use scroll::{ScrollEvent, ScrollTracker, DEFAULT_DEBOUNCE};

/// On-demand extraction against whatever grid is currently attached
#[derive(Debug, Clone)]
pub struct Extractor {
    service: Arc<TelemetryService>,
    grid: GridSlot,
    aggregator: Aggregator,
}

impl Extractor {
    pub fn new(service: Arc<TelemetryService>, grid: GridSlot, aggregator: Aggregator) -> Self {
        Self {
            service,
            grid,
            aggregator,
        }
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Emit `visible_rows_extracted`; `None` if no grid is attached
    pub fn extract_visible_rows(&self) -> Option<TelemetryEvent> {
        let grid = self.available("visible rows")?;
        let payload = viewport::visible_rows(grid.as_ref(), &self.aggregator);
        Some(self.service.send(EventPayload::VisibleRowsExtracted(payload)))
    }

    /// Emit `selected_rows_extracted`; `None` if no grid is attached
    pub fn extract_selected_rows(&self) -> Option<TelemetryEvent> {
        let grid = self.available("selected rows")?;
        let payload = selection::selected_rows(grid.as_ref(), &self.aggregator);
        Some(self.service.send(EventPayload::SelectedRowsExtracted(payload)))
    }

    /// Emit `full_grid_state_extracted`; `None` if no grid is attached
    ///
    /// Scans every row. Avoid calling this per render frame on large grids.
    pub fn extract_full_state(&self) -> Option<TelemetryEvent> {
        let grid = self.available("full state")?;
        let payload = full_state::full_state(grid.as_ref(), &self.aggregator);
        tracing::debug!(rows = payload.total_row_count, "Full grid state extracted");
        Some(
            self.service
                .send(EventPayload::FullGridStateExtracted(Box::new(payload))),
        )
    }

    fn available(&self, what: &str) -> Option<Arc<dyn crate::grid::GridSurface>> {
        let grid = self.grid.current();
        if grid.is_none() {
            tracing::trace!("Skipping {} extraction: grid not ready", what);
        }
        grid
    }
}
