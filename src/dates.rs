//! Date bucketing and weekly rollover.
//!
//! Everything here is a pure function of its inputs; callers pass `today` /
//! `now` explicitly so classification is reproducible. The `*_now` helpers
//! read the local clock for the CLI and TUI.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Utc};

use crate::task::Task;

/// Habit weeks roll over once more than this many days have elapsed.
pub const WEEK_LENGTH_DAYS: i64 = 7;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// The local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Signed number of days from `today` to `date`: positive in the future,
/// zero today, negative when past.
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Open tasks that are overdue, due today or due tomorrow.
pub fn is_due_soon(task: &Task, today: NaiveDate) -> bool {
    !task.completed && days_until(task.due_date, today) <= 1
}

/// Open tasks due today or within the next two days. Overdue tasks are not upcoming.
pub fn is_upcoming(task: &Task, today: NaiveDate) -> bool {
    if task.completed {
        return false;
    }
    let d = days_until(task.due_date, today);
    (0..=2).contains(&d)
}

/// Whole days between two instants, rounded up, in either direction.
///
/// The difference is absolute, so a clock moved backwards past the week start
/// also counts as elapsed time.
pub fn elapsed_days(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (now - since).num_milliseconds().abs();
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// True once more than a week has passed since `week_start`.
pub fn should_reset_week(week_start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    elapsed_days(week_start, now) > WEEK_LENGTH_DAYS
}

/// Parse human due-date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow"
/// - "in 3d", "in 2w"
/// - weekday names ("fri", "next monday")
/// - "YYYY-MM-DD"
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return shift_days(today, 1),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return shift_days(today, days);
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Duration::try_weeks(weeks).and_then(|w| today.checked_add_signed(w));
            }
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    let current = today.weekday().num_days_from_monday() as i64;
    for (name, target) in weekdays {
        let ahead = (target + 7 - current) % 7;
        if s == name {
            return shift_days(today, ahead);
        }
        if s == format!("next {}", name) {
            let add = if ahead == 0 { 7 } else { ahead + 7 };
            return shift_days(today, add);
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// `today` moved by `days`, or `None` when the result leaves chrono's date range.
fn shift_days(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|d| today.checked_add_signed(d))
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: NaiveDate, today: NaiveDate) -> String {
    match days_until(due, today) {
        0 => "today".into(),
        1 => "tomorrow".into(),
        n if n > 1 => format!("in {}d", n),
        n => format!("{}d late", -n),
    }
}

/// `DD/MM/YYYY`.
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
