//! Task data structure and related functionality.
//!
//! This module defines the `Task` struct as it is persisted, and `TaskDraft`,
//! the validated set of user-editable fields used for both creation and edits.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::fields::Priority;

/// Category assigned by quick-add.
pub const DEFAULT_CATEGORY: &str = "Personal";

/// Categories always offered by selectors, even before any task uses them.
pub const BUILTIN_CATEGORIES: [&str; 2] = ["Personal", "Work"];

/// A single to-do item.
///
/// Field names follow the persisted JSON layout (`dueDate`), so files written
/// by earlier versions load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
    pub category: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn from_draft(id: u64, draft: TaskDraft) -> Self {
        Task {
            id,
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            priority: draft.priority,
            category: draft.category,
            completed: false,
        }
    }

    /// Overwrite the editable fields, keeping `id` and `completed`.
    pub fn apply(&mut self, draft: TaskDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.due_date = draft.due_date;
        self.priority = draft.priority;
        self.category = draft.category;
    }
}

/// User-supplied task fields, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub category: String,
}

impl TaskDraft {
    /// Minimal draft used by quick-add: Medium priority, Personal category.
    pub fn quick(title: impl Into<String>, due_date: NaiveDate) -> Self {
        TaskDraft {
            title: title.into(),
            description: String::new(),
            due_date,
            priority: Priority::Medium,
            category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Trim text fields and reject an empty title. An empty category falls
    /// back to the default one.
    pub fn validated(mut self) -> Result<Self> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(TrackerError::validation("Task title cannot be empty"));
        }
        self.description = self.description.trim().to_string();
        self.category = self.category.trim().to_string();
        if self.category.is_empty() {
            self.category = DEFAULT_CATEGORY.to_string();
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn quick_draft_uses_defaults() {
        let d = TaskDraft::quick("Buy milk", date(2026, 3, 1));
        assert_eq!(d.priority, Priority::Medium);
        assert_eq!(d.category, "Personal");
        assert!(d.description.is_empty());
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = TaskDraft::quick("   ", date(2026, 3, 1)).validated().unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
    }

    #[test]
    fn validation_trims_and_defaults_category() {
        let mut d = TaskDraft::quick("  Read  ", date(2026, 3, 1));
        d.category = " ".into();
        let d = d.validated().unwrap();
        assert_eq!(d.title, "Read");
        assert_eq!(d.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn task_json_uses_camel_case_due_date() {
        let t = Task::from_draft(1, TaskDraft::quick("x", date(2026, 1, 2)));
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["dueDate"], "2026-01-02");
        assert_eq!(json["priority"], "Medium");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn legacy_task_without_description_loads() {
        let raw = r#"{"id":5,"title":"t","dueDate":"2026-05-01","priority":"High","category":"Work"}"#;
        let t: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(t.description, "");
        assert!(!t.completed);
    }

    #[test]
    fn apply_keeps_identity_and_completion() {
        let mut t = Task::from_draft(9, TaskDraft::quick("a", date(2026, 1, 1)));
        t.completed = true;
        let mut edit = TaskDraft::quick("b", date(2026, 2, 2));
        edit.priority = Priority::High;
        t.apply(edit);
        assert_eq!(t.id, 9);
        assert!(t.completed);
        assert_eq!(t.title, "b");
        assert_eq!(t.priority, Priority::High);
    }
}
