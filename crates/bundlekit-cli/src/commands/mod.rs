pub mod completions;
pub mod machines;
pub mod man_pages;
pub mod placement;

use console::Style;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_VALIDATION_ERROR: u8 = 2;
pub const EXIT_INPUT_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn mark_ok(msg: &str) -> String {
    format!("{} {msg}", Style::new().green().apply_to("✓"))
}

pub fn mark_fail(msg: &str) -> String {
    format!("{} {msg}", Style::new().red().bold().apply_to("✗"))
}

/// Placeholder for empty fields in human-readable output.
pub fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
