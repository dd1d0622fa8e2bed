//! Task and habit forms for the terminal user interface.
//!
//! Forms hold raw text; `to_draft` turns it into a validated draft for the
//! store, so the same rules apply as on the command line.

use chrono::NaiveDate;

use crate::dates::parse_due_input;
use crate::error::{Result, TrackerError};
use crate::fields::Priority;
use crate::habit::HabitDraft;
use crate::task::{Task, TaskDraft, DEFAULT_CATEGORY};
use crate::tui::input::InputField;

pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const DUE_FIELD: usize = 2;
pub const PRIORITY_FIELD: usize = 3;
pub const CATEGORY_FIELD: usize = 4;

const FULL_FIELDS: [usize; 5] = [TITLE_FIELD, DESCRIPTION_FIELD, DUE_FIELD, PRIORITY_FIELD, CATEGORY_FIELD];
const QUICK_FIELDS: [usize; 2] = [TITLE_FIELD, DUE_FIELD];

/// Form for creating (full or quick) and editing tasks.
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub due: InputField,
    pub priority: Priority,
    pub category: InputField,
    pub current_field: usize,
    pub quick: bool,
}

impl TaskForm {
    pub fn new() -> Self {
        Self {
            title: InputField::new(),
            description: InputField::new(),
            due: InputField::new(),
            priority: Priority::Medium,
            category: InputField::with_value(DEFAULT_CATEGORY),
            current_field: TITLE_FIELD,
            quick: false,
        }
    }

    /// Title and due date only.
    pub fn new_quick() -> Self {
        Self { quick: true, ..Self::new() }
    }

    /// Create a form populated from an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: InputField::with_value(&task.title),
            description: InputField::with_value(&task.description),
            due: InputField::with_value(&task.due_date.format("%Y-%m-%d").to_string()),
            priority: task.priority,
            category: InputField::with_value(&task.category),
            current_field: TITLE_FIELD,
            quick: false,
        }
    }

    pub fn fields(&self) -> &'static [usize] {
        if self.quick {
            &QUICK_FIELDS
        } else {
            &FULL_FIELDS
        }
    }

    fn position(&self) -> usize {
        self.fields()
            .iter()
            .position(|&f| f == self.current_field)
            .unwrap_or(0)
    }

    pub fn next_field(&mut self) {
        let fields = self.fields();
        self.current_field = fields[(self.position() + 1) % fields.len()];
    }

    pub fn prev_field(&mut self) {
        let fields = self.fields();
        self.current_field = fields[(self.position() + fields.len() - 1) % fields.len()];
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_FIELD => Some(&mut self.title),
            DESCRIPTION_FIELD => Some(&mut self.description),
            DUE_FIELD => Some(&mut self.due),
            CATEGORY_FIELD => Some(&mut self.category),
            _ => None,
        }
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(input) = self.active_input() {
            input.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(input) = self.active_input() {
            input.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(input) = self.active_input() {
            input.handle_delete();
        }
    }

    /// Left/right moves the cursor in text fields, cycles the priority, and on
    /// the category field steps through `categories`.
    pub fn handle_left_right(&mut self, forward: bool, categories: &[String]) {
        match self.current_field {
            PRIORITY_FIELD => {
                let all = Priority::ALL;
                let idx = all.iter().position(|&p| p == self.priority).unwrap_or(1);
                let next = if forward {
                    (idx + 1) % all.len()
                } else {
                    (idx + all.len() - 1) % all.len()
                };
                self.priority = all[next];
            }
            CATEGORY_FIELD if !categories.is_empty() => {
                let idx = categories.iter().position(|c| *c == self.category.value);
                let next = match (idx, forward) {
                    (Some(i), true) => (i + 1) % categories.len(),
                    (Some(i), false) => (i + categories.len() - 1) % categories.len(),
                    (None, _) => 0,
                };
                self.category = InputField::with_value(&categories[next]);
            }
            _ => {
                if let Some(input) = self.active_input() {
                    if forward {
                        input.move_cursor_right();
                    } else {
                        input.move_cursor_left();
                    }
                }
            }
        }
    }

    /// Validate into a draft. The due date must parse.
    pub fn to_draft(&self, today: NaiveDate) -> Result<TaskDraft> {
        let due_date = parse_due_input(&self.due.value, today).ok_or_else(|| {
            TrackerError::validation("Enter a valid due date (YYYY-MM-DD, today, tomorrow, in Nd)")
        })?;
        let draft = if self.quick {
            TaskDraft::quick(self.title.value.clone(), due_date)
        } else {
            TaskDraft {
                title: self.title.value.clone(),
                description: self.description.value.clone(),
                due_date,
                priority: self.priority,
                category: self.category.value.clone(),
            }
        };
        draft.validated()
    }
}

pub const NAME_FIELD: usize = 0;
pub const GOAL_FIELD: usize = 1;

/// Form for a new habit.
pub struct HabitForm {
    pub name: InputField,
    pub goal: InputField,
    pub current_field: usize,
}

impl HabitForm {
    pub fn new() -> Self {
        Self {
            name: InputField::new(),
            goal: InputField::with_value("3"),
            current_field: NAME_FIELD,
        }
    }

    pub fn toggle_field(&mut self) {
        self.current_field = if self.current_field == NAME_FIELD { GOAL_FIELD } else { NAME_FIELD };
    }

    pub fn active_input(&mut self) -> &mut InputField {
        if self.current_field == NAME_FIELD {
            &mut self.name
        } else {
            &mut self.goal
        }
    }

    pub fn to_draft(&self) -> Result<HabitDraft> {
        let goal = self
            .goal
            .value
            .trim()
            .parse::<u32>()
            .map_err(|_| TrackerError::validation("Weekly goal must be a number of days"))?;
        HabitDraft::new(self.name.value.clone(), goal).validated()
    }
}
