//! In-memory grid surface
//!
//! A self-contained [`GridSurface`] over a `Vec` of JSON rows, with a movable
//! viewport, key-based selection, single-column sort and a small subset of
//! column filters. Backs the demo session and the test suite; a real UI wires
//! its own grid component to the trait instead.

use serde_json::Value;
use std::cmp::Ordering;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{ColumnState, FilterModel, GridSurface, Row, SortDirection};

#[derive(Debug)]
struct GridState {
    rows: Vec<Row>,
    columns: Vec<ColumnState>,
    filter_model: FilterModel,
    /// Indices into `rows` after filtering and sorting
    displayed: Vec<usize>,
    viewport_first: usize,
    page_size: usize,
    /// Selected row keys in selection order
    selected: Vec<String>,
}

/// Grid surface backed by an in-memory row set
#[derive(Debug)]
pub struct InMemoryGrid {
    key_field: String,
    state: RwLock<GridState>,
}

impl InMemoryGrid {
    /// Create a grid whose viewport initially spans every row
    pub fn new(rows: Vec<Row>, columns: Vec<ColumnState>, key_field: impl Into<String>) -> Self {
        let displayed = (0..rows.len()).collect();
        let page_size = rows.len().max(1);
        Self {
            key_field: key_field.into(),
            state: RwLock::new(GridState {
                rows,
                columns,
                filter_model: FilterModel::new(),
                displayed,
                viewport_first: 0,
                page_size,
                selected: Vec::new(),
            }),
        }
    }

    /// Limit the viewport to `page_size` rows (virtualized rendering)
    pub fn with_page_size(self, page_size: usize) -> Self {
        self.write().page_size = page_size.max(1);
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, GridState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, GridState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn key_of(&self, row: &Row) -> Option<String> {
        match row.get(&self.key_field)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Set the rendered range explicitly (inclusive)
    ///
    /// `last < first` renders nothing: the grid then reports `first` and
    /// `first - 1` until the viewport is resized.
    pub fn set_viewport(&self, first: usize, last: usize) {
        let mut state = self.write();
        state.viewport_first = first;
        state.page_size = (last + 1).saturating_sub(first);
    }

    /// Move the viewport so `first` is the top rendered row, keeping its height
    pub fn scroll_to(&self, first: usize) {
        let mut state = self.write();
        let max_first = state.displayed.len().saturating_sub(state.page_size);
        state.viewport_first = first.min(max_first);
    }

    /// Select a row by key. Returns the row if the selection changed.
    pub fn select(&self, key: &str) -> Option<Row> {
        let row = self.row_by_key(key)?;
        let mut state = self.write();
        if state.selected.iter().any(|k| k == key) {
            return None;
        }
        state.selected.push(key.to_string());
        Some(row)
    }

    /// Deselect a row by key. Returns the row if the selection changed.
    pub fn deselect(&self, key: &str) -> Option<Row> {
        let row = self.row_by_key(key)?;
        let mut state = self.write();
        let before = state.selected.len();
        state.selected.retain(|k| k != key);
        (state.selected.len() != before).then_some(row)
    }

    pub fn row_by_key(&self, key: &str) -> Option<Row> {
        self.read()
            .rows
            .iter()
            .find(|row| self.key_of(row).as_deref() == Some(key))
            .cloned()
    }

    /// Replace the filter model and recompute the displayed rows
    pub fn set_filter_model(&self, model: FilterModel) {
        let mut state = self.write();
        state.filter_model = model;
        self.refresh_displayed(&mut state);
    }

    /// Sort by a single column (or clear sorting with `None`)
    pub fn set_sort(&self, col_id: &str, direction: Option<SortDirection>) {
        let mut state = self.write();
        for column in state.columns.iter_mut() {
            if column.col_id == col_id {
                column.sort = direction;
                column.sort_index = direction.map(|_| 0);
            } else {
                column.sort = None;
                column.sort_index = None;
            }
        }
        self.refresh_displayed(&mut state);
    }

    pub fn set_column_hidden(&self, col_id: &str, hide: bool) {
        let mut state = self.write();
        if let Some(column) = state.columns.iter_mut().find(|c| c.col_id == col_id) {
            column.hide = hide;
        }
    }

    fn refresh_displayed(&self, state: &mut GridState) {
        let mut displayed: Vec<usize> = (0..state.rows.len())
            .filter(|&i| passes_filters(&state.rows[i], &state.filter_model))
            .collect();

        let sort = state
            .columns
            .iter()
            .find_map(|c| c.sort.map(|dir| (c.col_id.clone(), dir)));
        if let Some((col_id, direction)) = sort {
            displayed.sort_by(|&a, &b| {
                let ord = compare_values(state.rows[a].get(&col_id), state.rows[b].get(&col_id));
                match direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        state.displayed = displayed;
        let max_first = state.displayed.len().saturating_sub(state.page_size);
        state.viewport_first = state.viewport_first.min(max_first);
    }
}

impl GridSurface for InMemoryGrid {
    fn first_displayed_index(&self) -> i64 {
        let state = self.read();
        if state.displayed.is_empty() {
            return 0;
        }
        state.viewport_first.min(state.displayed.len() - 1) as i64
    }

    fn last_displayed_index(&self) -> i64 {
        let state = self.read();
        if state.displayed.is_empty() {
            return -1;
        }
        let end = state.displayed.len() - 1;
        let first = state.viewport_first.min(end);
        // page_size 0 yields first - 1
        ((first + state.page_size) as i64 - 1).min(end as i64)
    }

    fn row_at(&self, index: i64) -> Option<Row> {
        let state = self.read();
        let index = usize::try_from(index).ok()?;
        let row_index = *state.displayed.get(index)?;
        state.rows.get(row_index).cloned()
    }

    fn selected_rows(&self) -> Vec<Row> {
        let state = self.read();
        state
            .selected
            .iter()
            .filter_map(|key| {
                state
                    .rows
                    .iter()
                    .find(|row| self.key_of(row).as_deref() == Some(key.as_str()))
                    .cloned()
            })
            .collect()
    }

    fn for_each_row(&self, visit: &mut dyn FnMut(&Row)) {
        for row in &self.read().rows {
            visit(row);
        }
    }

    fn column_state(&self) -> Vec<ColumnState> {
        self.read().columns.clone()
    }

    fn filter_model(&self) -> FilterModel {
        self.read().filter_model.clone()
    }

    fn displayed_row_count(&self) -> usize {
        self.read().displayed.len()
    }

    fn row_count(&self) -> usize {
        self.read().rows.len()
    }
}

/// A row passes when every recognized filter accepts it
fn passes_filters(row: &Row, model: &FilterModel) -> bool {
    model
        .iter()
        .all(|(col_id, filter)| passes_filter(row.get(col_id), filter))
}

fn passes_filter(value: Option<&Value>, filter: &Value) -> bool {
    let kind = filter.get("type").and_then(Value::as_str).unwrap_or("equals");

    match filter.get("filterType").and_then(Value::as_str) {
        Some("text") => {
            let needle = filter
                .get("filter")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_lowercase();
            let hay = match value {
                Some(Value::String(s)) => s.to_lowercase(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string().to_lowercase(),
            };
            match kind {
                "contains" => hay.contains(&needle),
                "notContains" => !hay.contains(&needle),
                "startsWith" => hay.starts_with(&needle),
                "endsWith" => hay.ends_with(&needle),
                "notEqual" => hay != needle,
                _ => hay == needle,
            }
        }
        Some("number") => {
            let (Some(actual), Some(target)) = (
                value.and_then(Value::as_f64),
                filter.get("filter").and_then(Value::as_f64),
            ) else {
                return false;
            };
            match kind {
                "notEqual" => actual != target,
                "greaterThan" => actual > target,
                "greaterThanOrEqual" => actual >= target,
                "lessThan" => actual < target,
                "lessThanOrEqual" => actual <= target,
                _ => actual == target,
            }
        }
        Some("set") => {
            let Some(values) = filter.get("values").and_then(Value::as_array) else {
                return true;
            };
            let actual = match value {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => return false,
            };
            values.iter().any(|v| match v {
                Value::String(s) => *s == actual,
                other => other.to_string() == actual,
            })
        }
        // Unknown filter types are left to the real grid
        _ => true,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}
