//! Schedule window resolution.
//!
//! Decides whether a schedule is "currently open" at an instant and selects
//! deterministically among overlapping open windows. All evaluation happens
//! in UTC; wall-clock times are zero-padded `HH:MM` strings, so lexical
//! comparison is chronological comparison.

use chrono::{DateTime, Datelike, Utc};

use crate::models::AttendanceSchedule;

/// Whether `schedule` is open at instant `at`.
///
/// Open means: active, `at` within the schedule's date range (open-ended
/// when `end_date` is null), the weekday flag for `at`'s UTC weekday set,
/// and `at`'s time of day within `[start_time, end_time]` inclusive.
pub fn is_open(schedule: &AttendanceSchedule, at: DateTime<Utc>) -> bool {
    if !schedule.is_active {
        return false;
    }
    if at < schedule.start_date {
        return false;
    }
    if let Some(end_date) = schedule.end_date {
        if at > end_date {
            return false;
        }
    }
    if !schedule.day_enabled(at.weekday()) {
        return false;
    }

    let time_of_day = at.format("%H:%M").to_string();
    schedule.start_time.as_str() <= time_of_day.as_str()
        && time_of_day.as_str() <= schedule.end_time.as_str()
}

/// Selects the open schedule among `schedules` at instant `at`.
///
/// When several windows are open at once (a misconfiguration, but one that
/// must not be silently nondeterministic), the earliest `start_time` wins;
/// ties break on the lowest schedule id.
pub fn resolve_open(
    schedules: Vec<AttendanceSchedule>,
    at: DateTime<Utc>,
) -> Option<AttendanceSchedule> {
    schedules
        .into_iter()
        .filter(|s| is_open(s, at))
        .min_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)))
}

/// Whether two schedules can ever be open at the same instant.
///
/// Used to warn at creation time; see `resolve_open` for the runtime
/// tie-break that makes an overlap survivable.
pub fn windows_overlap(a: &AttendanceSchedule, b: &AttendanceSchedule) -> bool {
    let share_a_day = [
        (a.monday, b.monday),
        (a.tuesday, b.tuesday),
        (a.wednesday, b.wednesday),
        (a.thursday, b.thursday),
        (a.friday, b.friday),
        (a.saturday, b.saturday),
        (a.sunday, b.sunday),
    ]
    .iter()
    .any(|(x, y)| *x && *y);
    if !share_a_day {
        return false;
    }

    let dates_intersect = match (a.end_date, b.end_date) {
        (Some(a_end), Some(b_end)) => a.start_date <= b_end && b.start_date <= a_end,
        (Some(a_end), None) => b.start_date <= a_end,
        (None, Some(b_end)) => a.start_date <= b_end,
        (None, None) => true,
    };
    if !dates_intersect {
        return false;
    }

    a.start_time <= b.end_time && b.start_time <= a.end_time
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn weekday_schedule(start_time: &str, end_time: &str) -> AttendanceSchedule {
        AttendanceSchedule {
            id: Uuid::new_v4(),
            name: "Morning".to_string(),
            description: None,
            dormitory_id: Uuid::new_v4(),
            created_by_id: Uuid::new_v4(),
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: false,
            sunday: false,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            start_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            end_date: None,
            is_active: true,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
            last_attendance_taken: None,
        }
    }

    // 2025-03-10 is a Monday.
    fn monday_at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_open_inside_window() {
        let s = weekday_schedule("07:00", "08:30");
        assert!(is_open(&s, monday_at(7, 15)));
    }

    #[test]
    fn test_window_boundaries_inclusive() {
        let s = weekday_schedule("07:00", "08:30");
        assert!(is_open(&s, monday_at(7, 0)));
        assert!(is_open(&s, monday_at(8, 30)));
    }

    #[test]
    fn test_closed_outside_window() {
        let s = weekday_schedule("07:00", "08:30");
        assert!(!is_open(&s, monday_at(6, 59)));
        assert!(!is_open(&s, monday_at(8, 31)));
        assert!(!is_open(&s, monday_at(9, 0)));
    }

    #[test]
    fn test_closed_on_disabled_weekday() {
        let s = weekday_schedule("07:00", "08:30");
        // 2025-03-15 is a Saturday.
        let saturday = Utc.with_ymd_and_hms(2025, 3, 15, 7, 15, 0).unwrap();
        assert!(!is_open(&s, saturday));
    }

    #[test]
    fn test_weekday_is_evaluated_in_utc() {
        let mut s = weekday_schedule("23:00", "23:59");
        s.sunday = false;
        s.monday = true;
        // 23:30 UTC Sunday would already be Monday in UTC+1; the reference
        // timezone is UTC, so Sunday stays closed.
        let sunday_late = Utc.with_ymd_and_hms(2025, 3, 9, 23, 30, 0).unwrap();
        assert!(!is_open(&s, sunday_late));
        let monday_late = Utc.with_ymd_and_hms(2025, 3, 10, 23, 30, 0).unwrap();
        assert!(is_open(&s, monday_late));
    }

    #[test]
    fn test_closed_when_inactive() {
        let mut s = weekday_schedule("07:00", "08:30");
        s.is_active = false;
        assert!(!is_open(&s, monday_at(7, 15)));
    }

    #[test]
    fn test_closed_before_start_date() {
        let mut s = weekday_schedule("07:00", "08:30");
        s.start_date = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert!(!is_open(&s, monday_at(7, 15)));
    }

    #[test]
    fn test_closed_after_end_date() {
        let mut s = weekday_schedule("07:00", "08:30");
        s.end_date = Some(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());
        assert!(!is_open(&s, monday_at(7, 15)));
    }

    #[test]
    fn test_open_ended_schedule() {
        let s = weekday_schedule("07:00", "08:30");
        let far_future = Utc.with_ymd_and_hms(2031, 3, 10, 7, 15, 0).unwrap();
        assert!(is_open(&s, far_future));
    }

    #[test]
    fn test_resolve_none_when_nothing_open() {
        let s = weekday_schedule("07:00", "08:30");
        assert!(resolve_open(vec![s], monday_at(12, 0)).is_none());
    }

    #[test]
    fn test_resolve_single_open() {
        let s = weekday_schedule("07:00", "08:30");
        let id = s.id;
        let resolved = resolve_open(vec![s], monday_at(7, 15)).unwrap();
        assert_eq!(resolved.id, id);
    }

    #[test]
    fn test_resolve_overlap_prefers_earliest_start_time() {
        let early = weekday_schedule("06:30", "08:30");
        let late = weekday_schedule("07:00", "09:00");
        let early_id = early.id;

        let resolved = resolve_open(vec![late, early], monday_at(7, 30)).unwrap();
        assert_eq!(resolved.id, early_id);
    }

    #[test]
    fn test_resolve_overlap_ties_break_on_lowest_id() {
        let mut a = weekday_schedule("07:00", "08:30");
        let mut b = weekday_schedule("07:00", "08:30");
        a.id = Uuid::from_u128(1);
        b.id = Uuid::from_u128(2);

        let resolved = resolve_open(vec![b.clone(), a.clone()], monday_at(7, 30)).unwrap();
        assert_eq!(resolved.id, a.id);

        // Order of the input must not matter.
        let resolved = resolve_open(vec![a.clone(), b], monday_at(7, 30)).unwrap();
        assert_eq!(resolved.id, a.id);
    }

    #[test]
    fn test_windows_overlap_same_day_and_time() {
        let a = weekday_schedule("07:00", "08:30");
        let b = weekday_schedule("08:00", "09:00");
        assert!(windows_overlap(&a, &b));
    }

    #[test]
    fn test_windows_no_overlap_disjoint_times() {
        let a = weekday_schedule("07:00", "08:30");
        let b = weekday_schedule("20:00", "21:00");
        assert!(!windows_overlap(&a, &b));
    }

    #[test]
    fn test_windows_no_overlap_disjoint_days() {
        let a = weekday_schedule("07:00", "08:30");
        let mut b = weekday_schedule("07:00", "08:30");
        b.monday = false;
        b.tuesday = false;
        b.wednesday = false;
        b.thursday = false;
        b.friday = false;
        b.saturday = true;
        assert!(!windows_overlap(&a, &b));
    }

    #[test]
    fn test_windows_no_overlap_disjoint_date_ranges() {
        let mut a = weekday_schedule("07:00", "08:30");
        let mut b = weekday_schedule("07:00", "08:30");
        a.end_date = Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
        b.start_date = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        assert!(!windows_overlap(&a, &b));
    }
}
