//! Sample product inventory used by the demo and tests
//!
//! 15 products across four categories; 12 are in stock.

use serde_json::{json, Value};

use crate::grid::{ColumnState, InMemoryGrid, PinnedSide};

/// (id, name, category, price, quantity, in stock)
const PRODUCTS: [(&str, &str, &str, f64, u32, bool); 15] = [
    ("P001", "Wireless Mouse", "Electronics", 24.99, 150, true),
    ("P002", "Mechanical Keyboard", "Electronics", 89.5, 45, true),
    ("P003", "USB-C Hub", "Electronics", 39.0, 0, false),
    ("P004", "Standing Desk", "Furniture", 349.0, 12, true),
    ("P005", "Ergonomic Chair", "Furniture", 279.99, 8, true),
    ("P006", "Monitor Arm", "Furniture", 64.25, 0, false),
    ("P007", "Notebook Pack", "Stationery", 12.75, 300, true),
    ("P008", "Gel Pens (12)", "Stationery", 8.5, 420, true),
    ("P009", "Desk Organizer", "Stationery", 19.99, 75, true),
    ("P010", "Noise-Cancelling Headphones", "Electronics", 199.0, 30, true),
    ("P011", "Webcam 1080p", "Electronics", 59.95, 0, false),
    ("P012", "LED Desk Lamp", "Lighting", 34.5, 90, true),
    ("P013", "Floor Lamp", "Lighting", 79.0, 20, true),
    ("P014", "Smart Bulb (4)", "Lighting", 44.99, 60, true),
    ("P015", "Cable Organizer", "Stationery", 9.25, 200, true),
];

pub fn sample_rows() -> Vec<Value> {
    PRODUCTS
        .iter()
        .map(|(id, name, category, price, quantity, in_stock)| {
            json!({
                "id": id,
                "name": name,
                "category": category,
                "price": price,
                "quantity": quantity,
                "inStock": in_stock,
            })
        })
        .collect()
}

pub fn sample_columns() -> Vec<ColumnState> {
    let mut id = ColumnState::new("id", 90);
    id.pinned = Some(PinnedSide::Left);

    vec![
        id,
        ColumnState::new("name", 240),
        ColumnState::new("category", 140),
        ColumnState::new("price", 110),
        ColumnState::new("quantity", 110),
        ColumnState::new("inStock", 100),
    ]
}

pub fn column_ids() -> Vec<String> {
    sample_columns().into_iter().map(|c| c.col_id).collect()
}

/// Sample inventory in an in-memory grid keyed by `id`
pub fn sample_grid() -> InMemoryGrid {
    InMemoryGrid::new(sample_rows(), sample_columns(), "id")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_shape() {
        let rows = sample_rows();
        assert_eq!(rows.len(), 15);
        let in_stock = rows.iter().filter(|r| r["inStock"] == true).count();
        assert_eq!(in_stock, 12);
    }

    #[test]
    fn test_out_of_stock_rows_have_no_quantity() {
        for row in sample_rows() {
            if row["inStock"] == false {
                assert_eq!(row["quantity"], 0);
            }
        }
    }
}
