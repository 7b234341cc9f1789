//! Row aggregates
//!
//! Which row fields hold the key, price, quantity and stock flag is
//! configuration, so the same extractors work for any record shape that has
//! "a price times a quantity". Missing or non-numeric fields count as zero and
//! every result is finite, so payloads always serialize to plain JSON numbers.

use serde_json::Value;

use crate::config::AggregationConfig;
use crate::events::Aggregations;
use crate::grid::Row;

/// Computes keys and numeric aggregates over grid rows
#[derive(Debug, Clone)]
pub struct Aggregator {
    key_field: String,
    price_field: String,
    quantity_field: String,
    stock_field: String,
}

impl Aggregator {
    pub fn new(config: &AggregationConfig) -> Self {
        Self {
            key_field: config.key_field.clone(),
            price_field: config.price_field.clone(),
            quantity_field: config.quantity_field.clone(),
            stock_field: config.stock_field.clone(),
        }
    }

    /// Stable key of a row, rendered as a string
    pub fn key(&self, row: &Row) -> String {
        match row.get(&self.key_field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    pub fn keys<'a>(&self, rows: impl IntoIterator<Item = &'a Row>) -> Vec<String> {
        rows.into_iter().map(|row| self.key(row)).collect()
    }

    pub fn price(&self, row: &Row) -> f64 {
        number(row.get(&self.price_field))
    }

    pub fn quantity(&self, row: &Row) -> f64 {
        number(row.get(&self.quantity_field))
    }

    /// price × quantity for one row
    pub fn value(&self, row: &Row) -> f64 {
        let value = self.price(row) * self.quantity(row);
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    /// Sum of price × quantity; 0.0 for no rows
    pub fn total_value<'a>(&self, rows: impl IntoIterator<Item = &'a Row>) -> f64 {
        rows.into_iter().map(|row| self.value(row)).sum()
    }

    pub fn in_stock(&self, row: &Row) -> bool {
        match row.get(&self.stock_field) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n > 0.0),
            Some(Value::String(s)) => matches!(s.to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
            _ => false,
        }
    }

    /// Full-state aggregate set
    ///
    /// The average price of an empty row set is defined as 0.0.
    pub fn aggregations(&self, rows: &[Row]) -> Aggregations {
        let total_inventory_value = self.total_value(rows);
        let price_sum: f64 = rows.iter().map(|row| self.price(row)).sum();
        let avg_price = if rows.is_empty() {
            0.0
        } else {
            finite_or_zero(price_sum / rows.len() as f64)
        };
        let in_stock_count = rows.iter().filter(|row| self.in_stock(row)).count();

        Aggregations {
            total_inventory_value,
            avg_price,
            in_stock_count,
            out_of_stock_count: rows.len() - in_stock_count,
        }
    }
}

fn number(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    finite_or_zero(n)
}

fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}
