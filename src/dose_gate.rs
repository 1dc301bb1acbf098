//! Time gate for dose mutations: nothing is recorded before it was
//! scheduled to happen.
//!
//! All comparisons are naive local time. Schedules are created and
//! administered in the school's timezone and the portal never converts;
//! the gate must not either.
//!
//! The gate is a UX guard, not an authorization boundary. The portal is
//! the authority and may still reject a mutation the gate allowed, so a
//! pass means "attempt it", never "it will succeed".

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Parse a wall-clock time in the portal's `HH:mm` spelling
/// (tolerating a seconds suffix, which some endpoints emit).
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}

fn due_instant(scheduled_date: NaiveDate, scheduled_time: &str) -> Option<NaiveDateTime> {
    parse_hhmm(scheduled_time).map(|time| scheduled_date.and_time(time))
}

/// True iff `now` is at or after the scheduled instant. Equality counts
/// as mutable. A row whose time cannot be parsed is never mutable.
pub fn can_mutate(scheduled_date: NaiveDate, scheduled_time: &str, now: NaiveDateTime) -> bool {
    match due_instant(scheduled_date, scheduled_time) {
        Some(due) => now >= due,
        None => false,
    }
}

/// Remaining wait until the dose becomes mutable; `None` once it is
/// (or when the scheduled time is unreadable and no wait can be computed).
pub fn time_until_mutable(
    scheduled_date: NaiveDate,
    scheduled_time: &str,
    now: NaiveDateTime,
) -> Option<Duration> {
    let due = due_instant(scheduled_date, scheduled_time)?;
    if now >= due {
        None
    } else {
        Some(due - now)
    }
}

/// Render a remaining duration as `"Xh Ym"`, or `"Ym"` under an hour.
/// Partial minutes round up so a positive wait never shows as `0m`.
pub fn format_remaining(remaining: Duration) -> String {
    let seconds = remaining.num_seconds().max(0);
    let minutes = (seconds + 59) / 60;
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours > 0 {
        format!("{hours}h {rest}m")
    } else {
        format!("{rest}m")
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, h: u32, min: u32) -> NaiveDateTime {
        d.and_time(NaiveTime::from_hms_opt(h, min, 0).unwrap())
    }

    #[test]
    fn one_minute_early_is_locked() {
        let today = date(2026, 3, 2);
        assert!(!can_mutate(today, "08:00", at(today, 7, 59)));
    }

    #[test]
    fn exactly_on_time_is_mutable() {
        let today = date(2026, 3, 2);
        assert!(can_mutate(today, "08:00", at(today, 8, 0)));
        assert!(can_mutate(today, "08:00", at(today, 8, 1)));
    }

    #[test]
    fn past_days_are_always_mutable() {
        let scheduled = date(2026, 3, 1);
        assert!(can_mutate(scheduled, "20:00", at(date(2026, 3, 2), 6, 0)));
    }

    #[test]
    fn future_days_are_locked_regardless_of_clock_time() {
        let scheduled = date(2026, 3, 3);
        assert!(!can_mutate(scheduled, "06:00", at(date(2026, 3, 2), 23, 0)));
    }

    #[test]
    fn unparseable_time_is_never_mutable() {
        let today = date(2026, 3, 2);
        assert!(!can_mutate(today, "noonish", at(today, 23, 59)));
        assert_eq!(time_until_mutable(today, "noonish", at(today, 6, 0)), None);
    }

    #[test]
    fn seconds_suffix_is_tolerated() {
        let today = date(2026, 3, 2);
        assert!(can_mutate(today, "08:00:00", at(today, 8, 0)));
    }

    #[test]
    fn remaining_is_positive_until_due_then_none() {
        let today = date(2026, 3, 2);
        let remaining = time_until_mutable(today, "08:00", at(today, 6, 30)).unwrap();
        assert_eq!(remaining, Duration::minutes(90));
        assert_eq!(time_until_mutable(today, "08:00", at(today, 8, 0)), None);
    }

    #[test]
    fn formats_hours_and_minutes() {
        assert_eq!(format_remaining(Duration::minutes(90)), "1h 30m");
        assert_eq!(format_remaining(Duration::minutes(59)), "59m");
        assert_eq!(format_remaining(Duration::minutes(120)), "2h 0m");
    }

    #[test]
    fn formats_partial_minutes_up() {
        assert_eq!(format_remaining(Duration::seconds(30)), "1m");
        assert_eq!(format_remaining(Duration::seconds(0)), "0m");
        assert_eq!(format_remaining(Duration::seconds(-10)), "0m");
    }
}
