//! The domain store: the single owner of tasks, habits, favorites and theme.
//!
//! All mutation goes through `Store`. Each successful operation has been
//! written through the storage gateway before it returns, and reports which
//! views it affected so the caller can recompute them (see `views`).
//!
//! Policy for unknown ids: every id-taking mutation returns
//! `TrackerError::NotFound` and leaves both memory and storage untouched.
//!
//! New tasks may not be due before today. An edit may keep a task's stored
//! due date even once it has passed, but may not move it to another past day.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use log::{error, info, warn};

use crate::dates;
use crate::error::{Result, TrackerError};
use crate::fields::Theme;
use crate::habit::{Habit, HabitDraft};
use crate::storage::{DomainState, Gateway, KeyValueStore};
use crate::task::{Task, TaskDraft};

/// Source of the current instant. Swapped for a fixed clock in tests.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Views that need recomputing after a mutation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Affected {
    pub tasks: bool,
    pub habits: bool,
    pub resources: bool,
    pub dashboard: bool,
    pub theme: bool,
}

impl Affected {
    pub const NONE: Affected = Affected {
        tasks: false,
        habits: false,
        resources: false,
        dashboard: false,
        theme: false,
    };
    pub const TASKS: Affected = Affected { tasks: true, dashboard: true, ..Affected::NONE };
    pub const HABITS: Affected = Affected { habits: true, dashboard: true, ..Affected::NONE };
    pub const RESOURCES: Affected = Affected { resources: true, ..Affected::NONE };
    pub const THEME: Affected = Affected { theme: true, ..Affected::NONE };
    pub const ALL: Affected = Affected {
        tasks: true,
        habits: true,
        resources: true,
        dashboard: true,
        theme: true,
    };
}

/// Evidence that a weekly rollover is due. Only `Store::propose_week_reset`
/// creates one; dropping it declines the reset.
#[derive(Debug)]
pub struct WeekResetProposal {
    week_start: DateTime<Utc>,
    elapsed_days: i64,
}

impl WeekResetProposal {
    pub fn week_start(&self) -> DateTime<Utc> {
        self.week_start
    }

    pub fn elapsed_days(&self) -> i64 {
        self.elapsed_days
    }
}

/// Permission to wipe all stored data. Dropping it declines.
#[derive(Debug)]
pub struct ResetAllProposal {
    _private: (),
}

pub struct Store<S: KeyValueStore, C: Clock = SystemClock> {
    state: DomainState,
    gateway: Gateway<S>,
    clock: C,
}

impl<S: KeyValueStore> Store<S, SystemClock> {
    /// Load state from `backend` using the system clock.
    pub fn open(backend: S) -> Self {
        Store::with_clock(backend, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> Store<S, C> {
    pub fn with_clock(backend: S, clock: C) -> Self {
        let gateway = Gateway::new(backend);
        let state = gateway.load();
        info!(
            "event=store_loaded tasks={} habits={} favorites={}",
            state.tasks.len(),
            state.habits.len(),
            state.favorites.len()
        );
        Store { state, gateway, clock }
    }

    pub fn state(&self) -> &DomainState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn habits(&self) -> &[Habit] {
        &self.state.habits
    }

    pub fn favorites(&self) -> &[u64] {
        &self.state.favorites
    }

    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    pub fn task(&self, id: u64) -> Option<&Task> {
        self.state.tasks.iter().find(|t| t.id == id)
    }

    pub fn habit(&self, id: u64) -> Option<&Habit> {
        self.state.habits.iter().find(|h| h.id == id)
    }

    #[cfg(test)]
    pub(crate) fn gateway(&self) -> &Gateway<S> {
        &self.gateway
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&chrono::Local).date_naive()
    }

    // ---- tasks -----------------------------------------------------------

    pub fn add_task(&mut self, draft: TaskDraft) -> Result<(u64, Affected)> {
        let draft = draft.validated()?;
        self.reject_past_due(draft.due_date)?;
        let id = self.next_id()?;
        self.mutate(Affected::TASKS, |state| {
            state.tasks.push(Task::from_draft(id, draft));
            Ok(())
        })?;
        info!("event=task_add id={id}");
        Ok((id, Affected::TASKS))
    }

    /// Title plus date; Medium priority in the Personal category.
    pub fn quick_add_task(&mut self, title: &str, due: NaiveDate) -> Result<(u64, Affected)> {
        self.add_task(TaskDraft::quick(title, due))
    }

    pub fn update_task(&mut self, id: u64, draft: TaskDraft) -> Result<Affected> {
        let draft = draft.validated()?;
        let current = self.task(id).ok_or_else(|| TrackerError::task_not_found(id))?;
        if current.due_date != draft.due_date {
            self.reject_past_due(draft.due_date)?;
        }
        self.mutate(Affected::TASKS, |state| {
            let task = find_task(state, id)?;
            task.apply(draft);
            Ok(())
        })?;
        info!("event=task_update id={id}");
        Ok(Affected::TASKS)
    }

    pub fn delete_task(&mut self, id: u64) -> Result<Affected> {
        self.mutate(Affected::TASKS, |state| {
            let idx = state
                .tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| TrackerError::task_not_found(id))?;
            state.tasks.remove(idx);
            Ok(())
        })?;
        info!("event=task_delete id={id}");
        Ok(Affected::TASKS)
    }

    /// Flip completion; returns the new value.
    pub fn toggle_task_completion(&mut self, id: u64) -> Result<(bool, Affected)> {
        let mut completed = false;
        self.mutate(Affected::TASKS, |state| {
            let task = find_task(state, id)?;
            task.completed = !task.completed;
            completed = task.completed;
            Ok(())
        })?;
        info!("event=task_toggle id={id} completed={completed}");
        Ok((completed, Affected::TASKS))
    }

    // ---- habits ----------------------------------------------------------

    pub fn add_habit(&mut self, draft: HabitDraft) -> Result<(u64, Affected)> {
        let draft = draft.validated()?;
        let id = self.next_id()?;
        self.mutate(Affected::HABITS, |state| {
            state.habits.push(Habit::new(id, draft.name, draft.goal));
            Ok(())
        })?;
        info!("event=habit_add id={id}");
        Ok((id, Affected::HABITS))
    }

    /// Flip one day slot (0 = Sat .. 6 = Fri); returns the new value.
    pub fn toggle_habit_day(&mut self, id: u64, day: usize) -> Result<(bool, Affected)> {
        let mut checked = false;
        self.mutate(Affected::HABITS, |state| {
            let habit = state
                .habits
                .iter_mut()
                .find(|h| h.id == id)
                .ok_or_else(|| TrackerError::habit_not_found(id))?;
            checked = habit.toggle_day(day)?;
            Ok(())
        })?;
        info!("event=habit_toggle id={id} day={day} checked={checked}");
        Ok((checked, Affected::HABITS))
    }

    pub fn delete_habit(&mut self, id: u64) -> Result<Affected> {
        self.mutate(Affected::HABITS, |state| {
            let idx = state
                .habits
                .iter()
                .position(|h| h.id == id)
                .ok_or_else(|| TrackerError::habit_not_found(id))?;
            state.habits.remove(idx);
            Ok(())
        })?;
        info!("event=habit_delete id={id}");
        Ok(Affected::HABITS)
    }

    /// Check whether the habit week has rolled over.
    ///
    /// With no week marker stored yet, this records `now` as the start of the
    /// week and proposes nothing.
    pub fn propose_week_reset(&mut self) -> Result<Option<WeekResetProposal>> {
        let now = self.clock.now();
        let Some(week_start) = self.gateway.week_start() else {
            self.gateway.set_week_start(now)?;
            return Ok(None);
        };
        if !dates::should_reset_week(week_start, now) {
            return Ok(None);
        }
        let elapsed_days = dates::elapsed_days(week_start, now);
        info!("event=week_rollover_due elapsed_days={elapsed_days}");
        Ok(Some(WeekResetProposal { week_start, elapsed_days }))
    }

    /// Clear every habit's week and start a new week now.
    pub fn reset_all_habit_weeks(&mut self, _proposal: WeekResetProposal) -> Result<Affected> {
        let now = self.clock.now();
        let previous_start = self.gateway.week_start();
        self.gateway.set_week_start(now)?;
        let result = self.mutate(Affected::HABITS, |state| {
            for habit in state.habits.iter_mut() {
                habit.clear_week();
            }
            Ok(())
        });
        if let Err(err) = result {
            if let Some(prev) = previous_start {
                if let Err(restore) = self.gateway.set_week_start(prev) {
                    warn!("event=week_start_restore_failed error={restore}");
                }
            }
            return Err(err);
        }
        info!("event=week_reset habits={}", self.state.habits.len());
        Ok(Affected::HABITS)
    }

    // ---- favorites & theme ----------------------------------------------

    /// Add the id if absent, remove it if present; returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, resource_id: u64) -> Result<(bool, Affected)> {
        let mut now_favorite = false;
        self.mutate(Affected::RESOURCES, |state| {
            if let Some(pos) = state.favorites.iter().position(|&f| f == resource_id) {
                state.favorites.remove(pos);
            } else {
                state.favorites.push(resource_id);
                now_favorite = true;
            }
            Ok(())
        })?;
        info!("event=favorite_toggle resource={resource_id} favorite={now_favorite}");
        Ok((now_favorite, Affected::RESOURCES))
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<Affected> {
        self.mutate(Affected::THEME, |state| {
            state.theme = theme;
            Ok(())
        })?;
        info!("event=theme_set theme={}", theme.as_str());
        Ok(Affected::THEME)
    }

    pub fn toggle_theme(&mut self) -> Result<(Theme, Affected)> {
        let next = self.state.theme.toggled();
        let affected = self.set_theme(next)?;
        Ok((next, affected))
    }

    // ---- reset all -------------------------------------------------------

    pub fn propose_reset_all(&self) -> ResetAllProposal {
        ResetAllProposal { _private: () }
    }

    /// Delete every stored key and return to defaults.
    ///
    /// If a key cannot be removed, the unchanged state is written back so the
    /// disk is not left half cleared, and the removal error is returned.
    pub fn reset_all(&mut self, _proposal: ResetAllProposal) -> Result<Affected> {
        let week_start = self.gateway.week_start();
        if let Err(err) = self.gateway.clear_all() {
            warn!("event=reset_all_failed error={err}");
            if let Err(restore) = self.restore_after_failed_clear(week_start) {
                error!("event=reset_all_restore_failed error={restore}");
            }
            return Err(err);
        }
        self.state = DomainState::default();
        warn!("event=reset_all");
        Ok(Affected::ALL)
    }

    // ---- internals -------------------------------------------------------

    fn reject_past_due(&self, due: NaiveDate) -> Result<()> {
        if due < self.today() {
            return Err(TrackerError::validation("Due date cannot be in the past"));
        }
        Ok(())
    }

    /// Write the in-memory state back after `clear_all` failed partway.
    fn restore_after_failed_clear(&mut self, week_start: Option<DateTime<Utc>>) -> Result<()> {
        self.gateway.save(&self.state, self.clock.now())?;
        if let Some(start) = week_start {
            self.gateway.set_week_start(start)?;
        }
        Ok(())
    }

    /// Timestamp-derived id, bumped past every existing task and habit id.
    /// Once the largest id is `u64::MAX`, the smallest unused id is taken.
    fn next_id(&self) -> Result<u64> {
        let stamp = self.clock.now().timestamp_millis().max(0) as u64;
        let ids = || {
            self.state
                .tasks
                .iter()
                .map(|t| t.id)
                .chain(self.state.habits.iter().map(|h| h.id))
        };
        match ids().max() {
            Some(max) if max >= stamp => match max.checked_add(1) {
                Some(id) => Ok(id),
                None => {
                    let used: HashSet<u64> = ids().collect();
                    (1..=u64::MAX)
                        .find(|id| !used.contains(id))
                        .ok_or_else(|| TrackerError::validation("No free id left"))
                }
            },
            _ => Ok(stamp),
        }
    }

    /// Apply `change` to the state and persist it. If the change fails nothing
    /// is written; if the write fails the in-memory state is rolled back.
    fn mutate<F>(&mut self, affected: Affected, change: F) -> Result<()>
    where
        F: FnOnce(&mut DomainState) -> Result<()>,
    {
        let snapshot = self.state.clone();
        if let Err(err) = change(&mut self.state) {
            self.state = snapshot;
            return Err(err);
        }
        if let Err(err) = self.gateway.save(&self.state, self.clock.now()) {
            self.state = snapshot;
            warn!("event=persist_failed affected={affected:?} error={err}");
            return Err(err);
        }
        Ok(())
    }
}

fn find_task(state: &mut DomainState, id: u64) -> Result<&mut Task> {
    state
        .tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| TrackerError::task_not_found(id))
}
