//! Full-state extraction
//!
//! Scans every row the grid knows about, not just the rendered ones, so cost
//! grows with the dataset. Intended for explicit user requests rather than
//! per-frame reporting.

use crate::events::{FullGridState, Viewport};
use crate::grid::GridSurface;

use super::Aggregator;

pub fn full_state(grid: &dyn GridSurface, aggregator: &Aggregator) -> FullGridState {
    let mut rows = Vec::new();
    grid.for_each_row(&mut |row| rows.push(row.clone()));

    FullGridState {
        total_row_count: rows.len(),
        displayed_row_count: grid.displayed_row_count(),
        selected_row_count: grid.selected_rows().len(),
        column_state: grid.column_state(),
        filter_model: grid.filter_model(),
        viewport: Viewport {
            first_row: grid.first_displayed_index(),
            last_row: grid.last_displayed_index(),
        },
        aggregations: aggregator.aggregations(&rows),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AggregationConfig;
    use crate::fixtures;
    use crate::grid::{FilterModel, InMemoryGrid, SortDirection};
    use serde_json::json;

    fn aggregator() -> Aggregator {
        Aggregator::new(&AggregationConfig::default())
    }

    #[test]
    fn test_sample_dataset_aggregates() {
        let grid = fixtures::sample_grid();
        let state = full_state(&grid, &aggregator());

        assert_eq!(state.total_row_count, 15);
        assert_eq!(state.aggregations.in_stock_count, 12);
        assert_eq!(state.aggregations.out_of_stock_count, 3);

        let expected: f64 = fixtures::sample_rows()
            .iter()
            .map(|row| row["price"].as_f64().unwrap() * row["quantity"].as_f64().unwrap())
            .sum();
        assert_eq!(state.aggregations.total_inventory_value, expected);
    }

    #[test]
    fn test_zero_rows_average_is_defined() {
        let grid = InMemoryGrid::new(Vec::new(), fixtures::sample_columns(), "id");
        let state = full_state(&grid, &aggregator());

        assert_eq!(state.total_row_count, 0);
        assert_eq!(state.aggregations.avg_price, 0.0);
        assert!(state.aggregations.avg_price.is_finite());
        // Serializes as a plain number, not null
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["aggregations"]["avgPrice"], json!(0.0));
    }

    #[test]
    fn test_includes_rows_hidden_by_filter() {
        let grid = fixtures::sample_grid();
        let mut model = FilterModel::new();
        model.insert(
            "category".to_string(),
            json!({"filterType": "text", "type": "equals", "filter": "Electronics"}),
        );
        grid.set_filter_model(model.clone());

        let state = full_state(&grid, &aggregator());
        assert_eq!(state.total_row_count, 15);
        assert!(state.displayed_row_count < 15);
        assert_eq!(state.filter_model, model);
    }

    #[test]
    fn test_captures_column_sort_and_selection() {
        let grid = fixtures::sample_grid();
        grid.set_sort("price", Some(SortDirection::Asc));
        grid.set_column_hidden("category", true);
        grid.select("P001");

        let state = full_state(&grid, &aggregator());
        assert_eq!(state.selected_row_count, 1);

        let price = state.column_state.iter().find(|c| c.col_id == "price").unwrap();
        assert_eq!(price.sort, Some(SortDirection::Asc));
        let category = state.column_state.iter().find(|c| c.col_id == "category").unwrap();
        assert!(category.hide);
        assert_eq!(state.viewport.first_row, grid.first_displayed_index());
        assert_eq!(state.viewport.last_row, grid.last_displayed_index());
    }
}
