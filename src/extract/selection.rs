//! Selection extraction: the rows the user has selected

use crate::events::SelectedRows;
use crate::grid::GridSurface;

use super::Aggregator;

/// Build the `selected_rows_extracted` payload
///
/// The grid hands over its selection in one call; an empty selection yields a
/// zero count and a zero total.
pub fn selected_rows(grid: &dyn GridSurface, aggregator: &Aggregator) -> SelectedRows {
    let rows = grid.selected_rows();

    SelectedRows {
        selected_count: rows.len(),
        selected_product_ids: aggregator.keys(&rows),
        total_selected_value: aggregator.total_value(&rows),
        selected_rows: rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AggregationConfig;
    use crate::fixtures;

    #[test]
    fn test_empty_selection() {
        let grid = fixtures::sample_grid();
        let payload = selected_rows(&grid, &Aggregator::new(&AggregationConfig::default()));

        assert_eq!(payload.selected_count, 0);
        assert!(payload.selected_rows.is_empty());
        assert!(payload.selected_product_ids.is_empty());
        assert_eq!(payload.total_selected_value, 0.0);
    }

    #[test]
    fn test_selection_keeps_order_and_sums_value() {
        let grid = fixtures::sample_grid();
        let agg = Aggregator::new(&AggregationConfig::default());
        let b = grid.select("P005").unwrap();
        let a = grid.select("P002").unwrap();

        let payload = selected_rows(&grid, &agg);

        assert_eq!(payload.selected_count, 2);
        assert_eq!(payload.selected_product_ids, vec!["P005", "P002"]);
        assert_eq!(payload.total_selected_value, agg.value(&b) + agg.value(&a));
    }
}
