//! Viewport extraction: the rows currently rendered by the grid

use crate::events::VisibleRows;
use crate::grid::GridSurface;

use super::Aggregator;

/// Build the `visible_rows_extracted` payload from the live viewport
///
/// Walks the inclusive displayed range and skips indices the grid cannot
/// resolve. An inverted range (nothing displayed) yields no rows and a zero
/// total.
pub fn visible_rows(grid: &dyn GridSurface, aggregator: &Aggregator) -> VisibleRows {
    let first = grid.first_displayed_index();
    let last = grid.last_displayed_index();

    let rows: Vec<_> = if first <= last {
        (first..=last).filter_map(|index| grid.row_at(index)).collect()
    } else {
        Vec::new()
    };

    VisibleRows {
        first_displayed_row: first,
        last_displayed_row: last,
        visible_row_count: rows.len(),
        visible_product_ids: aggregator.keys(&rows),
        total_visible_value: aggregator.total_value(&rows),
        visible_rows: rows,
    }
}
