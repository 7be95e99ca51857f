use std::time::Duration;

use chrono::{DateTime, Utc};

/// True iff the session has been connected for at least `threshold`.
///
/// Callers capture `now` once per batch so every session in the batch is
/// judged against the same instant. A session with no connection timestamp
/// never exceeds the threshold; it is not eligible, not an error.
pub fn exceeds_active_threshold(
    now: DateTime<Utc>,
    connected_at: Option<DateTime<Utc>>,
    threshold: Duration,
) -> bool {
    let Some(connected_at) = connected_at else {
        return false;
    };

    match chrono::Duration::from_std(threshold) {
        Ok(threshold) => now.signed_duration_since(connected_at) >= threshold,
        Err(_) => false,
    }
}

/// True iff the session has seen no activity for at least `threshold`.
///
/// This is the final gate immediately before termination. Missing activity
/// data fails closed: a session we have no activity record for is never
/// terminated.
pub fn exceeds_idle_threshold(
    now: DateTime<Utc>,
    last_updated_at: Option<DateTime<Utc>>,
    threshold: Duration,
) -> bool {
    let Some(last_updated_at) = last_updated_at else {
        return false;
    };

    match chrono::Duration::from_std(threshold) {
        Ok(threshold) => now.signed_duration_since(last_updated_at) >= threshold,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, min, 0).unwrap()
    }

    #[test]
    fn missing_connected_at_never_exceeds() {
        assert!(!exceeds_active_threshold(
            at(12, 0),
            None,
            Duration::from_secs(0)
        ));
        assert!(!exceeds_active_threshold(
            at(12, 0),
            None,
            Duration::from_secs(3600)
        ));
    }

    #[test]
    fn active_threshold_is_inclusive() {
        let now = at(12, 0);
        let five_hours = Duration::from_secs(5 * 3600);

        // Connected exactly five hours ago: boundary counts.
        assert!(exceeds_active_threshold(now, Some(at(7, 0)), five_hours));
        // One minute short.
        assert!(!exceeds_active_threshold(now, Some(at(7, 1)), five_hours));
        // Well past.
        assert!(exceeds_active_threshold(now, Some(at(1, 0)), five_hours));
    }

    #[test]
    fn idle_threshold_is_inclusive() {
        let now = at(12, 0);
        let two_hours = Duration::from_secs(2 * 3600);

        assert!(exceeds_idle_threshold(now, Some(at(10, 0)), two_hours));
        assert!(!exceeds_idle_threshold(now, Some(at(10, 1)), two_hours));
    }

    #[test]
    fn missing_last_activity_fails_closed() {
        assert!(!exceeds_idle_threshold(at(12, 0), None, Duration::from_secs(0)));
    }

    #[test]
    fn fractional_hour_thresholds() {
        let now = at(12, 0);
        let ninety_minutes = Duration::from_secs_f64(1.5 * 3600.0);

        assert!(exceeds_idle_threshold(now, Some(at(10, 30)), ninety_minutes));
        assert!(!exceeds_idle_threshold(now, Some(at(10, 31)), ninety_minutes));
    }
}
