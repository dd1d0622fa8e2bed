//! Summary counters shown on the dashboard.

use chrono::NaiveDate;

use crate::dates::{is_due_soon, is_upcoming};
use crate::habit::Habit;
use crate::task::Task;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dashboard {
    pub completed_count: usize,
    pub total_count: usize,
    /// Rounded percentage in 0..=100; 0 when there are no tasks.
    pub progress_percent: u8,
    pub due_soon_count: usize,
    pub habit_goals_met: usize,
    pub total_habits: usize,
    /// Open tasks due today through two days out, in insertion order.
    pub upcoming_tasks: Vec<Task>,
}

pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (completed.min(total) as f64 * 100.0 / total as f64).round();
    pct as u8
}

pub fn aggregate(tasks: &[Task], habits: &[Habit], today: NaiveDate) -> Dashboard {
    let completed_count = tasks.iter().filter(|t| t.completed).count();
    let total_count = tasks.len();
    Dashboard {
        completed_count,
        total_count,
        progress_percent: progress_percent(completed_count, total_count),
        due_soon_count: tasks.iter().filter(|t| is_due_soon(t, today)).count(),
        habit_goals_met: habits.iter().filter(|h| h.is_goal_met()).count(),
        total_habits: habits.len(),
        upcoming_tasks: tasks
            .iter()
            .filter(|t| is_upcoming(t, today))
            .cloned()
            .collect(),
    }
}
