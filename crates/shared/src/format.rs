//! Display formatting helpers.
//!
//! Device agents report transfer counters in raw bytes and encode `.` in
//! store keys as `_` (the store rejects dots in key names). These helpers
//! reverse both for display.

/// Formats a raw byte count as megabytes with two decimals, e.g. `2097152` -> `"2.00"`.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0 / 1024.0)
}

/// Reverses the key-escaping convention for file names and SMS addresses (`_` -> `.`).
pub fn display_key(key: &str) -> String {
    key.replace('_', ".")
}

/// Reverses the key-escaping convention for location strings (`_` -> space).
pub fn display_location(location: &str) -> String {
    location.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_megabytes_two_decimals() {
        assert_eq!(format_megabytes(2_097_152), "2.00");
        assert_eq!(format_megabytes(0), "0.00");
        assert_eq!(format_megabytes(1_572_864), "1.50");
    }

    #[test]
    fn test_display_key_unescapes_dots() {
        assert_eq!(display_key("report_pdf"), "report.pdf");
        assert_eq!(display_key("plain"), "plain");
    }

    #[test]
    fn test_display_location_unescapes_spaces() {
        assert_eq!(display_location("New_York"), "New York");
    }
}
