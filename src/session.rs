// Grid session - wires one grid's lifecycle callbacks to the telemetry service
//
// A session exists for as long as the grid view is mounted:
// - on_grid_ready: grid data loaded, surface becomes queryable
// - on_selection_changed / on_body_scroll: interaction callbacks
// - extract_*: user-triggered snapshots
// - on_grid_destroyed (or drop): pending scroll report cancelled, surface released

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::events::{EventPayload, GridInitialized, RowSelected, TelemetryEvent, SELECTION_SOURCE};
use crate::extract::{Aggregator, Extractor, ScrollEvent, ScrollTracker};
use crate::grid::{GridSlot, GridSurface, Row};
use crate::telemetry::TelemetryService;

pub struct GridSession {
    service: Arc<TelemetryService>,
    grid: GridSlot,
    extractor: Extractor,
    scroll: ScrollTracker,
    selected_count: AtomicUsize,
}

impl GridSession {
    pub fn new(service: Arc<TelemetryService>, aggregator: Aggregator, debounce: Duration) -> Self {
        let grid = GridSlot::new();
        Self {
            extractor: Extractor::new(service.clone(), grid.clone(), aggregator),
            scroll: ScrollTracker::new(service.clone(), grid.clone(), debounce),
            service,
            grid,
            selected_count: AtomicUsize::new(0),
        }
    }

    pub fn from_config(service: Arc<TelemetryService>, config: &Config) -> Self {
        Self::new(
            service,
            Aggregator::new(&config.aggregation),
            config.telemetry.scroll_debounce(),
        )
    }

    /// Grid finished loading: attach it and emit `grid_initialized`
    pub fn on_grid_ready(&self, surface: Arc<dyn GridSurface>) -> TelemetryEvent {
        let row_count = surface.row_count();
        let columns = surface
            .column_state()
            .into_iter()
            .map(|c| c.col_id)
            .collect();
        self.selected_count
            .store(surface.selected_rows().len(), Ordering::SeqCst);
        self.grid.attach(surface);

        tracing::info!(row_count, "Grid ready");
        self.service
            .send(EventPayload::GridInitialized(GridInitialized { row_count, columns }))
    }

    /// A row's selection state changed
    ///
    /// Only selections are logged individually; deselections just refresh
    /// the selected count. Returns the `row_selected` event if one was sent.
    pub fn on_selection_changed(&self, row: &Row, selected: bool) -> Option<TelemetryEvent> {
        let surface = self.grid.current()?;

        let event = selected.then(|| {
            self.service.send(EventPayload::RowSelected(RowSelected {
                product_id: self.extractor.aggregator().key(row),
                row_data: row.clone(),
                selection_source: SELECTION_SOURCE.to_string(),
            }))
        });

        self.selected_count
            .store(surface.selected_rows().len(), Ordering::SeqCst);
        event
    }

    pub fn on_body_scroll(&self, event: ScrollEvent) {
        self.scroll.on_scroll(event);
    }

    pub fn extract_visible_rows(&self) -> Option<TelemetryEvent> {
        self.extractor.extract_visible_rows()
    }

    pub fn extract_selected_rows(&self) -> Option<TelemetryEvent> {
        self.extractor.extract_selected_rows()
    }

    pub fn extract_full_state(&self) -> Option<TelemetryEvent> {
        self.extractor.extract_full_state()
    }

    /// Selected-row count as of the last selection change
    pub fn selected_count(&self) -> usize {
        self.selected_count.load(Ordering::SeqCst)
    }

    pub fn is_ready(&self) -> bool {
        self.grid.is_attached()
    }

    pub fn scroll_pending(&self) -> bool {
        self.scroll.is_pending()
    }

    /// Grid unmounted: cancel pending scroll reporting and release the surface
    pub fn on_grid_destroyed(&self) {
        self.scroll.teardown();
        self.grid.detach();
        self.selected_count.store(0, Ordering::SeqCst);
        tracing::info!("Grid destroyed");
    }

    pub fn service(&self) -> &Arc<TelemetryService> {
        &self.service
    }
}
