use std::time::Duration;

/// Formats elapsed seconds as `"{m}m {s}s"`, or `"Time: {s}s"` when under a minute.
///
/// Both components are truncated, never rounded.
pub fn format_elapsed(secs: f64) -> String {
    let minutes = (secs / 60.0).floor();
    let seconds = (secs % 60.0).floor();
    if minutes != 0.0 {
        format!("{}m {}s", minutes as u64, seconds as u64)
    } else {
        format!("Time: {}s", seconds as u64)
    }
}

pub fn format_duration(elapsed: Duration) -> String {
    format_elapsed(elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_and_seconds() {
        assert_eq!(format_elapsed(125.7), "2m 5s");
        assert_eq!(format_elapsed(60.0), "1m 0s");
        assert_eq!(format_elapsed(3725.2), "62m 5s");
    }

    #[test]
    fn under_a_minute() {
        assert_eq!(format_elapsed(45.9), "Time: 45s");
        assert_eq!(format_elapsed(59.999), "Time: 59s");
        assert_eq!(format_elapsed(0.0), "Time: 0s");
    }

    #[test]
    fn from_duration() {
        assert_eq!(format_duration(Duration::from_millis(61_500)), "1m 1s");
        assert_eq!(format_duration(Duration::from_millis(900)), "Time: 0s");
    }
}
