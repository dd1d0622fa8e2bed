//! Per-habit weekly progress and the achievement summary.

use crate::habit::{Habit, DAYS_PER_WEEK};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitProgress {
    pub id: u64,
    pub name: String,
    pub goal: u32,
    pub days: [bool; DAYS_PER_WEEK],
    pub completed_count: u32,
    pub is_goal_met: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitView {
    pub habits: Vec<HabitProgress>,
    pub habits_achieved: usize,
    pub total_habits: usize,
}

impl HabitView {
    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// One-line weekly summary.
    pub fn summary(&self) -> String {
        if self.total_habits == 0 {
            "Start by adding your first habit!".to_string()
        } else {
            format!(
                "Achieved {} of {} goals this week.",
                self.habits_achieved, self.total_habits
            )
        }
    }
}

pub fn project_habits(habits: &[Habit]) -> HabitView {
    let progress: Vec<HabitProgress> = habits
        .iter()
        .map(|h| HabitProgress {
            id: h.id,
            name: h.name.clone(),
            goal: h.goal,
            days: h.days,
            completed_count: h.completed_count(),
            is_goal_met: h.is_goal_met(),
        })
        .collect();
    let habits_achieved = progress.iter().filter(|p| p.is_goal_met).count();
    HabitView {
        total_habits: progress.len(),
        habits_achieved,
        habits: progress,
    }
}
