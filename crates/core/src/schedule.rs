//! Derived schedule fields.
//!
//! Session dates and weekday labels are computed on read from the schedule's
//! start date and frequency. They are never stored on the draft, so they
//! cannot go stale when the inputs change.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveTime, Weekday};
use serde::Serialize;

use crate::class_draft::{Frequency, ScheduleInfo, MAX_TOTAL_SESSIONS};

/// Start of the fallback session window (16:00).
pub const DEFAULT_SESSION_START: (u32, u32) = (16, 0);

/// End of the fallback session window (17:30).
pub const DEFAULT_SESSION_END: (u32, u32) = (17, 30);

/// Date of the `index`-th session (1-based) of a schedule.
///
/// Index 0 is treated as the first session. Monthly schedules move by
/// calendar months and land on the last day of shorter months. Returns
/// `None` only if the result falls outside chrono's date range.
pub fn session_date(start: NaiveDate, frequency: Frequency, index: u32) -> Option<NaiveDate> {
    let offset = index.saturating_sub(1);
    match frequency {
        Frequency::Daily => start.checked_add_days(Days::new(u64::from(offset))),
        Frequency::Weekly => start.checked_add_days(Days::new(7 * u64::from(offset))),
        Frequency::Monthly => start.checked_add_months(Months::new(offset)),
    }
}

/// English weekday name of a date (`Monday` .. `Sunday`).
pub fn day_of_week_label(date: NaiveDate) -> &'static str {
    weekday_label(date.weekday())
}

pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// The default 16:00-17:30 session window.
pub fn default_window() -> (NaiveTime, NaiveTime) {
    let (sh, sm) = DEFAULT_SESSION_START;
    let (eh, em) = DEFAULT_SESSION_END;
    (
        NaiveTime::from_hms_opt(sh, sm, 0).unwrap_or(NaiveTime::MIN),
        NaiveTime::from_hms_opt(eh, em, 0).unwrap_or(NaiveTime::MIN),
    )
}

/// A concrete session occurrence with its derived fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSlot {
    pub index: u32,
    pub date: NaiveDate,
    pub day_of_week: &'static str,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Weekday of the schedule's start date, if it has one.
pub fn schedule_day_of_week(schedule: &ScheduleInfo) -> Option<&'static str> {
    schedule.start_date.map(day_of_week_label)
}

/// Session window of a schedule: its first time slot, or the default.
pub fn session_window(schedule: &ScheduleInfo) -> (NaiveTime, NaiveTime) {
    schedule
        .time_slots
        .first()
        .map(|slot| (slot.start_time, slot.end_time))
        .unwrap_or_else(default_window)
}

/// The `index`-th session of a schedule.
///
/// An incomplete schedule (no start date or no frequency) falls back to
/// `today` with the default time window instead of failing.
pub fn next_session(schedule: &ScheduleInfo, index: u32, today: NaiveDate) -> SessionSlot {
    let derived = match (schedule.start_date, schedule.frequency) {
        (Some(start), Some(frequency)) => {
            session_date(start, frequency, index).map(|date| (date, session_window(schedule)))
        }
        _ => None,
    };
    let (date, (start_time, end_time)) = derived.unwrap_or_else(|| (today, default_window()));

    SessionSlot {
        index: index.max(1),
        date,
        day_of_week: day_of_week_label(date),
        start_time,
        end_time,
    }
}

/// Every session of a complete schedule, in order.
///
/// Empty when the start date or frequency is missing. Never lists more than
/// [`MAX_TOTAL_SESSIONS`] sessions, since unvalidated drafts reach this too.
pub fn session_dates(schedule: &ScheduleInfo) -> Vec<SessionSlot> {
    let (Some(start), Some(frequency)) = (schedule.start_date, schedule.frequency) else {
        return Vec::new();
    };
    let (start_time, end_time) = session_window(schedule);

    (1..=schedule.total_sessions.clamp(1, MAX_TOTAL_SESSIONS))
        .filter_map(|index| {
            session_date(start, frequency, index).map(|date| SessionSlot {
                index,
                date,
                day_of_week: day_of_week_label(date),
                start_time,
                end_time,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_draft::TimeSlot;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn weekly_third_session_is_two_weeks_later() {
        // 2024-06-03 is a Monday.
        assert_eq!(
            session_date(date(2024, 6, 3), Frequency::Weekly, 3),
            Some(date(2024, 6, 17))
        );
    }

    #[test]
    fn first_session_is_the_start_date() {
        for frequency in [Frequency::Daily, Frequency::Weekly, Frequency::Monthly] {
            assert_eq!(
                session_date(date(2024, 6, 3), frequency, 1),
                Some(date(2024, 6, 3))
            );
            assert_eq!(
                session_date(date(2024, 6, 3), frequency, 0),
                Some(date(2024, 6, 3))
            );
        }
    }

    #[test]
    fn daily_and_monthly_offsets() {
        assert_eq!(
            session_date(date(2024, 12, 30), Frequency::Daily, 4),
            Some(date(2025, 1, 2))
        );
        assert_eq!(
            session_date(date(2024, 6, 3), Frequency::Monthly, 3),
            Some(date(2024, 8, 3))
        );
        assert_eq!(
            session_date(date(2024, 11, 15), Frequency::Monthly, 3),
            Some(date(2025, 1, 15))
        );
    }

    #[test]
    fn monthly_clamps_to_end_of_short_month() {
        assert_eq!(
            session_date(date(2024, 1, 31), Frequency::Monthly, 2),
            Some(date(2024, 2, 29))
        );
    }

    #[test]
    fn matches_direct_arithmetic_and_is_idempotent() {
        let start = date(2024, 2, 27);
        for n in 1..=60u32 {
            let weekly = session_date(start, Frequency::Weekly, n).unwrap();
            assert_eq!((weekly - start).num_days(), 7 * i64::from(n - 1));
            assert_eq!(session_date(start, Frequency::Weekly, n), Some(weekly));

            let daily = session_date(start, Frequency::Daily, n).unwrap();
            assert_eq!((daily - start).num_days(), i64::from(n - 1));

            let monthly = session_date(start, Frequency::Monthly, n).unwrap();
            let months = (monthly.year() - start.year()) * 12 + monthly.month() as i32
                - start.month() as i32;
            assert_eq!(months, (n - 1) as i32);
        }
    }

    #[test]
    fn weekday_labels() {
        assert_eq!(day_of_week_label(date(2024, 6, 3)), "Monday");
        assert_eq!(day_of_week_label(date(2024, 6, 9)), "Sunday");
        assert_eq!(day_of_week_label(date(2024, 2, 29)), "Thursday");
    }

    #[test]
    fn incomplete_schedule_falls_back_to_today() {
        let today = date(2026, 10, 19);
        let slot = next_session(&ScheduleInfo::default(), 3, today);
        assert_eq!(slot.date, today);
        assert_eq!(slot.day_of_week, "Monday");
        assert_eq!(slot.start_time, time(16, 0));
        assert_eq!(slot.end_time, time(17, 30));

        let only_date = ScheduleInfo {
            start_date: Some(date(2024, 6, 3)),
            ..ScheduleInfo::default()
        };
        assert_eq!(next_session(&only_date, 2, today).date, today);
    }

    #[test]
    fn next_session_uses_first_time_slot() {
        let schedule = ScheduleInfo {
            frequency: Some(Frequency::Weekly),
            start_date: Some(date(2024, 6, 3)),
            time_slots: vec![TimeSlot {
                start_time: time(9, 0),
                end_time: time(10, 0),
            }],
            ..ScheduleInfo::default()
        };
        let slot = next_session(&schedule, 2, date(2026, 1, 1));
        assert_eq!(slot.date, date(2024, 6, 10));
        assert_eq!(slot.day_of_week, "Monday");
        assert_eq!(slot.start_time, time(9, 0));
        assert_eq!(slot.end_time, time(10, 0));
    }

    #[test]
    fn session_dates_lists_every_session() {
        let schedule = ScheduleInfo {
            frequency: Some(Frequency::Daily),
            start_date: Some(date(2024, 6, 3)),
            total_sessions: 3,
            ..ScheduleInfo::default()
        };
        let dates: Vec<_> = session_dates(&schedule).into_iter().map(|s| s.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 6, 3), date(2024, 6, 4), date(2024, 6, 5)]
        );
        assert!(session_dates(&ScheduleInfo::default()).is_empty());
    }

    #[test]
    fn session_dates_is_capped_for_oversized_schedules() {
        let schedule = ScheduleInfo {
            frequency: Some(Frequency::Daily),
            start_date: Some(date(2024, 6, 3)),
            total_sessions: u32::MAX,
            ..ScheduleInfo::default()
        };
        let sessions = session_dates(&schedule);
        assert_eq!(sessions.len(), MAX_TOTAL_SESSIONS as usize);
        assert_eq!(sessions.last().unwrap().index, MAX_TOTAL_SESSIONS);
    }
}
