//! Severity and status presentation colors
//!
//! Total, case-insensitive lookups; unknown input maps to a defined
//! default, never an error.

/// RRGGBB hex color for a severity label.
pub fn severity_color(severity: &str) -> &'static str {
    match severity.to_lowercase().as_str() {
        "critical" => "800000", // dark red
        "high" => "FF0000",
        "medium" => "FF8C00", // dark orange
        "low" => "228B22",    // forest green
        _ => "000000",
    }
}

/// RRGGBB hex color for a status label: red while open, green otherwise.
pub fn status_color(status: &str) -> &'static str {
    if status.to_lowercase() == "open" {
        "FF0000"
    } else {
        "228B22"
    }
}
