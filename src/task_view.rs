//! Projection of the task collection into the filtered, sorted task list.

use crate::fields::{CategoryFilter, SortKey, StatusFilter};
use crate::task::{Task, BUILTIN_CATEGORIES};

/// The user's current task list selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub status: StatusFilter,
    pub category: CategoryFilter,
    pub sort: SortKey,
}

/// Ordered list of visible tasks. Empty is a normal state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskView {
    pub tasks: Vec<Task>,
    /// Size of the unfiltered collection, for "3/10" style counters.
    pub total: usize,
}

impl TaskView {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}

/// Filter by status and category, then sort. Both sort orders are stable, so
/// equal keys keep insertion order.
pub fn project_tasks(tasks: &[Task], query: &TaskQuery) -> TaskView {
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|t| match query.status {
            StatusFilter::All => true,
            StatusFilter::Active => !t.completed,
            StatusFilter::Completed => t.completed,
        })
        .filter(|t| query.category.matches(&t.category))
        .collect();

    match query.sort {
        SortKey::Date => visible.sort_by_key(|t| t.due_date),
        SortKey::Priority => visible.sort_by(|a, b| b.priority.weight().cmp(&a.priority.weight())),
    }

    TaskView {
        tasks: visible.into_iter().cloned().collect(),
        total: tasks.len(),
    }
}

/// Categories for the filter selector: the built-in ones first, then any
/// others in order of first use.
pub fn task_categories(tasks: &[Task]) -> Vec<String> {
    let mut out: Vec<String> = BUILTIN_CATEGORIES.iter().map(|c| c.to_string()).collect();
    for t in tasks {
        if !out.iter().any(|c| c == &t.category) {
            out.push(t.category.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use crate::task::TaskDraft;
    use chrono::NaiveDate;

    fn task(id: u64, day: u32, priority: Priority, category: &str, completed: bool) -> Task {
        let mut draft = TaskDraft::quick(format!("t{id}"), NaiveDate::from_ymd_opt(2026, 6, day).unwrap());
        draft.priority = priority;
        draft.category = category.into();
        let mut t = Task::from_draft(id, draft);
        t.completed = completed;
        t
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, 20, Priority::Low, "Work", false),
            task(2, 10, Priority::High, "Personal", true),
            task(3, 15, Priority::Medium, "Work", false),
            task(4, 10, Priority::High, "Personal", false),
            task(5, 12, Priority::Medium, "Study", true),
        ]
    }

    fn ids(view: &TaskView) -> Vec<u64> {
        view.tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn all_filters_return_a_permutation() {
        let tasks = sample();
        let view = project_tasks(&tasks, &TaskQuery::default());
        let mut got = ids(&view);
        got.sort_unstable();
        assert_eq!(got, vec![1, 2, 3, 4, 5]);
        assert_eq!(view.total, 5);
    }

    #[test]
    fn date_sort_is_ascending_with_insertion_tiebreak() {
        let view = project_tasks(&sample(), &TaskQuery::default());
        assert_eq!(ids(&view), vec![2, 4, 5, 3, 1]);
    }

    #[test]
    fn priority_sort_is_descending_and_stable() {
        let query = TaskQuery { sort: SortKey::Priority, ..TaskQuery::default() };
        let view = project_tasks(&sample(), &query);
        assert_eq!(ids(&view), vec![2, 4, 3, 5, 1]);
    }

    #[test]
    fn status_filters_split_on_completion() {
        let tasks = sample();
        let active = TaskQuery { status: StatusFilter::Active, ..TaskQuery::default() };
        let done = TaskQuery { status: StatusFilter::Completed, ..TaskQuery::default() };
        assert_eq!(ids(&project_tasks(&tasks, &active)), vec![4, 3, 1]);
        assert_eq!(ids(&project_tasks(&tasks, &done)), vec![2, 5]);
    }

    #[test]
    fn category_filter_is_exact() {
        let query = TaskQuery {
            category: CategoryFilter::Only("Work".into()),
            ..TaskQuery::default()
        };
        assert_eq!(ids(&project_tasks(&sample(), &query)), vec![3, 1]);
        let query = TaskQuery {
            category: CategoryFilter::Only("work".into()),
            ..TaskQuery::default()
        };
        assert!(project_tasks(&sample(), &query).is_empty());
    }

    #[test]
    fn empty_collection_projects_to_empty_view() {
        let view = project_tasks(&[], &TaskQuery::default());
        assert!(view.is_empty());
        assert_eq!(view.total, 0);
    }

    #[test]
    fn projection_is_idempotent() {
        let tasks = sample();
        let q = TaskQuery { sort: SortKey::Priority, ..TaskQuery::default() };
        assert_eq!(project_tasks(&tasks, &q), project_tasks(&tasks, &q));
    }

    #[test]
    fn categories_include_builtins_then_first_use_order() {
        assert_eq!(task_categories(&sample()), vec!["Personal", "Work", "Study"]);
        assert_eq!(task_categories(&[]), vec!["Personal", "Work"]);
    }
}
