//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::{Config, ENV_BUFFER_CAPACITY, ENV_SCROLL_DEBOUNCE_MS};

impl Config {
    /// Render the config as a commented TOML file
    pub fn to_toml(&self) -> String {
        format!(
            r#"# gridspy configuration

# Event buffer and emitter
[telemetry]
# Events kept in memory, newest first ({env_capacity} overrides)
buffer_capacity = {capacity}
# Quiet period before a scroll burst is reported ({env_debounce} overrides)
scroll_debounce_ms = {debounce}
# Log every event at debug level with a truncated data preview
trace_events = {trace}
trace_preview_bytes = {preview}

# Row fields used for value totals and stock counts
[aggregation]
key_field = {key:?}
price_field = {price:?}
quantity_field = {quantity:?}
stock_field = {stock:?}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level:?}
# JSON file logging in addition to stderr
file_enabled = {log_file_enabled}
file_dir = {log_file_dir:?}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix:?}
"#,
            env_capacity = ENV_BUFFER_CAPACITY,
            capacity = self.telemetry.buffer_capacity,
            env_debounce = ENV_SCROLL_DEBOUNCE_MS,
            debounce = self.telemetry.scroll_debounce_ms,
            trace = self.telemetry.trace_events,
            preview = self.telemetry.trace_preview_bytes,
            key = self.aggregation.key_field,
            price = self.aggregation.price_field,
            quantity = self.aggregation.quantity_field,
            stock = self.aggregation.stock_field,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display().to_string(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
