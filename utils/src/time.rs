//! Time formatting helpers.

/// Format a duration in milliseconds to a human-readable string.
pub fn format_duration_ms(millis: u64) -> String {
    if millis < 1_000 {
        return format!("{}ms", millis);
    }
    let secs = millis / 1_000;
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_protocol_defaults() {
        assert_eq!(format_duration_ms(300_000), "5m 0s");
        assert_eq!(format_duration_ms(120_000), "2m 0s");
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(7_200_000), "2h 0m");
    }
}
