//! Shared utility functions

use serde_json::Value;

/// Safely truncate a string to at most `max_bytes` while respecting UTF-8 boundaries.
///
/// # Examples
///
/// ```
/// use gridspy::util::truncate_utf8_safe;
///
/// assert_eq!(truncate_utf8_safe("hello world", 5), "hello");
///
/// // "日" is three bytes; cutting at 4 keeps only the first character
/// assert_eq!(truncate_utf8_safe("日本語", 4), "日");
/// ```
pub fn truncate_utf8_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Compact JSON rendering of `value`, cut to `max_bytes` with a marker
///
/// Used for log lines, where a full-state payload could otherwise be
/// thousands of bytes long.
pub fn json_preview(value: &Value, max_bytes: usize) -> String {
    let json = value.to_string();
    if json.len() <= max_bytes {
        return json;
    }
    format!(
        "{}… ({} bytes)",
        truncate_utf8_safe(&json, max_bytes),
        json.len()
    )
}
