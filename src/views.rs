//! Cached view models and the recompute rule that keeps them in step with the store.
//!
//! Every store mutation returns an `Affected` set; passing it to
//! `Views::refresh` recomputes exactly those views. Task and habit changes
//! always include the dashboard because it counts both.

use chrono::NaiveDate;

use crate::catalog::{CatalogSource, CatalogState};
use crate::dashboard::{aggregate, Dashboard};
use crate::habit_view::{project_habits, HabitView};
use crate::resources::{filter_resources, ResourceEntry, ResourceQuery};
use crate::storage::DomainState;
use crate::store::Affected;
use crate::task_view::{project_tasks, task_categories, TaskQuery, TaskView};

/// What the resources section shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceView {
    NotLoaded,
    Failed(String),
    /// Possibly empty: no matches is not an error.
    Entries(Vec<ResourceEntry>),
}

#[derive(Debug, Clone)]
pub struct Views {
    pub task_query: TaskQuery,
    pub resource_query: ResourceQuery,
    pub catalog: CatalogState,
    pub tasks: TaskView,
    pub task_categories: Vec<String>,
    pub habits: HabitView,
    pub dashboard: Dashboard,
    pub resources: ResourceView,
}

impl Views {
    /// Compute every view from scratch.
    pub fn new(state: &DomainState, today: NaiveDate) -> Self {
        let mut views = Views {
            task_query: TaskQuery::default(),
            resource_query: ResourceQuery::default(),
            catalog: CatalogState::NotLoaded,
            tasks: TaskView::default(),
            task_categories: Vec::new(),
            habits: HabitView::default(),
            dashboard: Dashboard::default(),
            resources: ResourceView::NotLoaded,
        };
        views.refresh(Affected::ALL, state, today);
        views
    }

    /// Recompute the views named in `affected`.
    pub fn refresh(&mut self, affected: Affected, state: &DomainState, today: NaiveDate) {
        if affected.tasks {
            self.tasks = project_tasks(&state.tasks, &self.task_query);
            self.task_categories = task_categories(&state.tasks);
        }
        if affected.habits {
            self.habits = project_habits(&state.habits);
        }
        if affected.dashboard {
            self.dashboard = aggregate(&state.tasks, &state.habits, today);
        }
        if affected.resources {
            self.resources = match &self.catalog {
                CatalogState::NotLoaded => ResourceView::NotLoaded,
                CatalogState::Failed(msg) => ResourceView::Failed(msg.clone()),
                CatalogState::Loaded(catalog) => ResourceView::Entries(filter_resources(
                    catalog,
                    &self.resource_query,
                    &state.favorites,
                )),
            };
        }
    }

    /// Change the task selection and reproject the list.
    pub fn set_task_query(&mut self, query: TaskQuery, state: &DomainState) {
        self.task_query = query;
        self.tasks = project_tasks(&state.tasks, &self.task_query);
    }

    /// Change the resource selection and refilter.
    pub fn set_resource_query(&mut self, query: ResourceQuery, state: &DomainState, today: NaiveDate) {
        self.resource_query = query;
        self.refresh(Affected::RESOURCES, state, today);
    }

    /// Fetch the catalog (one attempt) and refilter.
    pub fn load_catalog(&mut self, source: &CatalogSource, state: &DomainState, today: NaiveDate) {
        self.catalog = CatalogState::load(source);
        self.refresh(Affected::RESOURCES, state, today);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Resource;
    use crate::fields::{SortKey, StatusFilter};
    use crate::habit::HabitDraft;
    use crate::storage::MemoryStore;
    use crate::store::tests::{start, TestClock};
    use crate::store::Store;

    fn store() -> Store<MemoryStore, TestClock> {
        Store::with_clock(MemoryStore::new(), TestClock::at(start()))
    }

    fn catalog() -> Vec<Resource> {
        vec![Resource {
            id: 7,
            title: "Rust Book".into(),
            description: "Guide".into(),
            category: "Programming".into(),
            link: String::new(),
        }]
    }

    #[test]
    fn task_mutation_refreshes_list_and_dashboard_only() {
        let mut s = store();
        let today = s.today();
        let mut views = Views::new(s.state(), today);
        let habits_before = views.habits.clone();

        let (_, affected) = s.quick_add_task("Buy milk", today).unwrap();
        views.refresh(affected, s.state(), today);

        assert_eq!(views.tasks.len(), 1);
        assert_eq!(views.dashboard.total_count, 1);
        assert_eq!(views.dashboard.due_soon_count, 1);
        assert_eq!(views.habits, habits_before);
    }

    #[test]
    fn habit_mutation_updates_dashboard_counts() {
        let mut s = store();
        let today = s.today();
        let mut views = Views::new(s.state(), today);
        let (id, affected) = s.add_habit(HabitDraft::new("Read", 1)).unwrap();
        views.refresh(affected, s.state(), today);
        assert_eq!(views.dashboard.total_habits, 1);
        assert_eq!(views.dashboard.habit_goals_met, 0);

        let (_, affected) = s.toggle_habit_day(id, 0).unwrap();
        views.refresh(affected, s.state(), today);
        assert_eq!(views.habits.habits_achieved, 1);
        assert_eq!(views.dashboard.habit_goals_met, 1);
    }

    #[test]
    fn refresh_is_idempotent() {
        let mut s = store();
        let today = s.today();
        s.quick_add_task("A", today).unwrap();
        let mut views = Views::new(s.state(), today);
        let first = (views.tasks.clone(), views.dashboard.clone());
        views.refresh(Affected::ALL, s.state(), today);
        views.refresh(Affected::ALL, s.state(), today);
        assert_eq!((views.tasks.clone(), views.dashboard.clone()), first);
    }

    #[test]
    fn favorite_toggle_refilters_resources() {
        let mut s = store();
        let today = s.today();
        let mut views = Views::new(s.state(), today);
        assert_eq!(views.resources, ResourceView::NotLoaded);

        views.catalog = CatalogState::Loaded(catalog());
        views.set_resource_query(
            ResourceQuery { favorites_only: true, ..ResourceQuery::default() },
            s.state(),
            today,
        );
        assert_eq!(views.resources, ResourceView::Entries(Vec::new()));

        let (_, affected) = s.toggle_favorite(7).unwrap();
        assert!(!affected.dashboard);
        views.refresh(affected, s.state(), today);
        match &views.resources {
            ResourceView::Entries(e) => assert_eq!(e.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failed_catalog_is_distinct_from_no_results() {
        let s = store();
        let today = s.today();
        let mut views = Views::new(s.state(), today);
        views.catalog = CatalogState::Failed("connection refused".into());
        views.refresh(Affected::RESOURCES, s.state(), today);
        assert_eq!(views.resources, ResourceView::Failed("connection refused".into()));
    }

    #[test]
    fn task_query_change_reprojects() {
        let mut s = store();
        let today = s.today();
        let (id, _) = s.quick_add_task("A", today).unwrap();
        s.toggle_task_completion(id).unwrap();
        s.quick_add_task("B", today).unwrap();
        let mut views = Views::new(s.state(), today);
        views.set_task_query(
            TaskQuery { status: StatusFilter::Active, sort: SortKey::Priority, ..TaskQuery::default() },
            s.state(),
        );
        assert_eq!(views.tasks.len(), 1);
        assert_eq!(views.tasks.tasks[0].title, "B");
    }
}
