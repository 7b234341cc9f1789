// Demo mode: drive a scripted grid session against the sample inventory
//
// Walks through what a user would do in the data view: the grid loads, a few
// rows are selected (and one deselected), the user scrolls in a burst, then
// asks for viewport, selection and full-state snapshots. Real timing is used
// so the scroll burst exercises the debounce.
//
// Run with: cargo run -- demo --format summary

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::Config;
use crate::extract::ScrollEvent;
use crate::fixtures;
use crate::grid::{FilterModel, GridSurface, InMemoryGrid, SortDirection};
use crate::session::GridSession;
use crate::telemetry::TelemetryService;

/// Rows rendered at once in the demo grid
const DEMO_PAGE_SIZE: usize = 6;

/// Pixel height of one demo row
const ROW_HEIGHT: f64 = 42.0;

/// Gap between scroll callbacks in the burst
const SCROLL_TICK: Duration = Duration::from_millis(50);

/// One step of the scripted session
#[derive(Debug, Clone)]
enum DemoStep {
    Select(&'static str),
    Deselect(&'static str),
    /// Burst of scroll callbacks ending with the given top row
    ScrollBurst { to_row: usize, ticks: usize },
    Filter(FilterModel),
    Sort(&'static str, SortDirection),
    ExtractVisible,
    ExtractSelected,
    ExtractFull,
    Pause(Duration),
}

fn demo_script(debounce: Duration) -> Vec<DemoStep> {
    let mut in_stock_only = FilterModel::new();
    in_stock_only.insert(
        "quantity".to_string(),
        serde_json::json!({"filterType": "number", "type": "greaterThan", "filter": 0}),
    );

    vec![
        DemoStep::Select("P002"),
        DemoStep::Select("P004"),
        DemoStep::Select("P010"),
        DemoStep::Deselect("P004"),
        DemoStep::ExtractSelected,
        DemoStep::ScrollBurst { to_row: 5, ticks: 8 },
        // Let the debounce settle before reading the viewport
        DemoStep::Pause(debounce + Duration::from_millis(100)),
        DemoStep::ExtractVisible,
        DemoStep::Sort("price", SortDirection::Desc),
        DemoStep::Filter(in_stock_only),
        DemoStep::ExtractVisible,
        DemoStep::ExtractFull,
    ]
}

/// Run the scripted session and return the service holding its events
pub async fn run_demo(config: &Config, service: Arc<TelemetryService>) -> Arc<TelemetryService> {
    let debounce = config.telemetry.scroll_debounce();
    let session = GridSession::from_config(service.clone(), config);
    let grid = Arc::new(fixtures::sample_grid().with_page_size(DEMO_PAGE_SIZE));

    session.on_grid_ready(grid.clone());

    for step in demo_script(debounce) {
        tracing::debug!(?step, "Demo step");
        match step {
            DemoStep::Select(key) => {
                if let Some(row) = grid.select(key) {
                    session.on_selection_changed(&row, true);
                }
            }
            DemoStep::Deselect(key) => {
                if let Some(row) = grid.deselect(key) {
                    session.on_selection_changed(&row, false);
                }
            }
            DemoStep::ScrollBurst { to_row, ticks } => {
                let start = grid_first_row(&grid);
                for tick in 1..=ticks {
                    let row = start + (to_row.saturating_sub(start) * tick) / ticks;
                    grid.scroll_to(row);
                    session.on_body_scroll(ScrollEvent::vertical(row as f64 * ROW_HEIGHT));
                    sleep(SCROLL_TICK).await;
                }
            }
            DemoStep::Filter(model) => grid.set_filter_model(model),
            DemoStep::Sort(col_id, direction) => grid.set_sort(col_id, Some(direction)),
            DemoStep::ExtractVisible => {
                session.extract_visible_rows();
            }
            DemoStep::ExtractSelected => {
                session.extract_selected_rows();
            }
            DemoStep::ExtractFull => {
                session.extract_full_state();
            }
            DemoStep::Pause(duration) => sleep(duration).await,
        }
    }

    session.on_grid_destroyed();
    tracing::info!(
        events = service.len(),
        selected = session.selected_count(),
        "Demo session complete"
    );
    service
}

fn grid_first_row(grid: &InMemoryGrid) -> usize {
    usize::try_from(grid.first_displayed_index()).unwrap_or(0)
}
