//! UI helpers for CLI display.

use console::style;

/// Check if color output is disabled via `NO_COLOR` env var.
#[must_use]
pub fn is_color_disabled() -> bool {
    std::env::var("NO_COLOR").is_ok()
}

/// Print a styled header.
pub fn print_header(text: &str) {
    if is_color_disabled() {
        println!("=== {text} ===");
    } else {
        println!("{}", style(format!("=== {text} ===")).bold().cyan());
    }
}

/// Print an error message to stderr.
pub fn print_error(text: &str) {
    if is_color_disabled() {
        eprintln!("[ERROR] {text}");
    } else {
        eprintln!("{} {text}", style("[ERROR]").red().bold());
    }
}

/// Status tag for one row of a comparison table.
#[must_use]
pub fn status_tag(ok: bool) -> String {
    match (ok, is_color_disabled()) {
        (true, true) => "OK".to_string(),
        (false, true) => "ERROR".to_string(),
        (true, false) => style("OK").green().to_string(),
        (false, false) => style("ERROR").red().to_string(),
    }
}
