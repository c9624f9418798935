//! Chapter timestamp formatting.

/// Format seconds as a chapter timestamp.
///
/// Hours are included only when the offset reaches one hour, matching the
/// format video platforms expect in chapter descriptions: `H:MM:SS` past
/// the hour mark, `M:SS` before it.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Format a duration for human-readable descriptions, e.g. "62 minutes".
pub fn format_minutes(seconds: f64) -> String {
    format!("{:.0} minutes", seconds / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_zero() {
        assert_eq!(format_timestamp(0.0), "0:00");
    }

    #[test]
    fn test_format_timestamp_under_hour() {
        assert_eq!(format_timestamp(90.0), "1:30");
        assert_eq!(format_timestamp(650.0), "10:50");
        assert_eq!(format_timestamp(3599.0), "59:59");
    }

    #[test]
    fn test_format_timestamp_over_hour() {
        assert_eq!(format_timestamp(3600.0), "1:00:00");
        assert_eq!(format_timestamp(3661.0), "1:01:01");
        assert_eq!(format_timestamp(7325.0), "2:02:05");
    }

    #[test]
    fn test_format_timestamp_negative_clamps() {
        assert_eq!(format_timestamp(-5.0), "0:00");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(3900.0), "65 minutes");
    }
}
