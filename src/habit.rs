//! Weekly habits.
//!
//! A habit has a goal (days per week) and seven check slots. The slots are a
//! fixed Sat..Fri sequence, not tied to calendar dates: the whole row is
//! cleared on weekly rollover.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

pub const DAYS_PER_WEEK: usize = 7;

/// Slot labels, in slot order.
pub const DAY_LABELS: [&str; DAYS_PER_WEEK] = ["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"];

/// Resolve a day slot from a number ("3") or a label ("tue", case-insensitive).
///
/// Numbers are returned as-is, even out of range; `Habit::toggle_day` is the
/// place that rejects them.
pub fn parse_day(s: &str) -> Option<usize> {
    let s = s.trim();
    if let Ok(n) = s.parse::<usize>() {
        return Some(n);
    }
    DAY_LABELS
        .iter()
        .position(|label| label.eq_ignore_ascii_case(s))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: u64,
    pub name: String,
    pub goal: u32,
    /// Deserializing a `days` array of any other length fails, which the
    /// storage layer treats as a malformed key.
    pub days: [bool; DAYS_PER_WEEK],
}

impl Habit {
    pub fn new(id: u64, name: String, goal: u32) -> Self {
        Habit {
            id,
            name,
            goal,
            days: [false; DAYS_PER_WEEK],
        }
    }

    /// Flip one slot. Indices outside 0..=6 are rejected.
    pub fn toggle_day(&mut self, day: usize) -> Result<bool> {
        let slot = self
            .days
            .get_mut(day)
            .ok_or(TrackerError::DayOutOfRange(day))?;
        *slot = !*slot;
        Ok(*slot)
    }

    pub fn clear_week(&mut self) {
        self.days = [false; DAYS_PER_WEEK];
    }

    pub fn completed_count(&self) -> u32 {
        self.days.iter().filter(|&&d| d).count() as u32
    }

    pub fn is_goal_met(&self) -> bool {
        self.completed_count() >= self.goal
    }
}

/// Validated input for a new habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitDraft {
    pub name: String,
    pub goal: u32,
}

impl HabitDraft {
    pub fn new(name: impl Into<String>, goal: u32) -> Self {
        HabitDraft {
            name: name.into(),
            goal,
        }
    }

    pub fn validated(mut self) -> Result<Self> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(TrackerError::validation("Habit name cannot be empty"));
        }
        if self.goal == 0 {
            return Err(TrackerError::validation("Weekly goal must be at least 1 day"));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_habit_starts_with_seven_empty_slots() {
        let h = Habit::new(1, "Read".into(), 3);
        assert_eq!(h.days.len(), 7);
        assert_eq!(h.completed_count(), 0);
    }

    #[test]
    fn toggling_a_slot_twice_restores_it() {
        let mut h = Habit::new(1, "Run".into(), 2);
        let before = h.days;
        assert!(h.toggle_day(3).unwrap());
        assert!(!h.toggle_day(3).unwrap());
        assert_eq!(h.days, before);
        assert_eq!(h.days.len(), 7);
    }

    #[test]
    fn out_of_range_slot_is_rejected() {
        let mut h = Habit::new(1, "Run".into(), 2);
        assert!(matches!(h.toggle_day(7), Err(TrackerError::DayOutOfRange(7))));
        assert_eq!(h.days, [false; 7]);
    }

    #[test]
    fn goal_met_with_three_of_three() {
        let mut h = Habit::new(1, "Stretch".into(), 3);
        h.days = [true, true, true, false, false, false, false];
        assert_eq!(h.completed_count(), 3);
        assert!(h.is_goal_met());
    }

    #[test]
    fn short_days_array_does_not_deserialize() {
        let raw = r#"{"id":1,"name":"x","goal":1,"days":[true,false]}"#;
        assert!(serde_json::from_str::<Habit>(raw).is_err());
    }

    #[test]
    fn days_parse_from_numbers_and_labels() {
        assert_eq!(parse_day("0"), Some(0));
        assert_eq!(parse_day("sat"), Some(0));
        assert_eq!(parse_day("TUE"), Some(3));
        assert_eq!(parse_day("Fri"), Some(6));
        assert_eq!(parse_day("12"), Some(12));
        assert_eq!(parse_day("someday"), None);
    }

    #[test]
    fn draft_rejects_zero_goal_and_blank_name() {
        assert!(HabitDraft::new("Read", 0).validated().is_err());
        assert!(HabitDraft::new("  ", 3).validated().is_err());
        assert_eq!(HabitDraft::new(" Read ", 3).validated().unwrap().name, "Read");
    }
}
