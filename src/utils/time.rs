//! Time and timestamp utilities

/// Current wall-clock time, epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Normalize an epoch value to milliseconds.
///
/// Producers disagree on units; anything below ~Nov 2286 in milliseconds
/// reads as seconds and is scaled up.
pub fn to_epoch_millis(value: i64) -> i64 {
    const MILLIS_THRESHOLD: i64 = 10_000_000_000;
    if value.abs() < MILLIS_THRESHOLD {
        value * 1000
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_are_scaled_to_millis() {
        assert_eq!(to_epoch_millis(1_700_000_000), 1_700_000_000_000);
    }

    #[test]
    fn test_millis_pass_through() {
        assert_eq!(to_epoch_millis(1_700_000_000_123), 1_700_000_000_123);
    }
}
