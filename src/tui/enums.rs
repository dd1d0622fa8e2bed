//! Enumerations for TUI state management.

/// Top-level screens, in tab order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Section {
    #[default]
    Dashboard,
    Tasks,
    Habits,
    Resources,
    Settings,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Dashboard,
        Section::Tasks,
        Section::Habits,
        Section::Resources,
        Section::Settings,
    ];

    /// Resolve a route name such as `tasks` or `#habits`. Unknown names fall
    /// back to the dashboard.
    pub fn from_route(route: &str) -> Section {
        match route.trim().trim_start_matches('#').to_ascii_lowercase().as_str() {
            "tasks" => Section::Tasks,
            "habits" => Section::Habits,
            "resources" => Section::Resources,
            "settings" => Section::Settings,
            _ => Section::Dashboard,
        }
    }

    pub fn route(self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Tasks => "tasks",
            Section::Habits => "habits",
            Section::Resources => "resources",
            Section::Settings => "settings",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Tasks => "Tasks",
            Section::Habits => "Habits",
            Section::Resources => "Resources",
            Section::Settings => "Settings",
        }
    }

    pub fn index(self) -> usize {
        Section::ALL.iter().position(|&s| s == self).unwrap_or(0)
    }

    pub fn next(self) -> Section {
        Section::ALL[(self.index() + 1) % Section::ALL.len()]
    }

    pub fn prev(self) -> Section {
        Section::ALL[(self.index() + Section::ALL.len() - 1) % Section::ALL.len()]
    }
}

/// Which overlay, if any, has the keyboard.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    Browse,
    AddTask,
    QuickAdd,
    EditTask(u64),
    AddHabit,
    Search,
    Help,
    Confirm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_resolve_with_dashboard_fallback() {
        assert_eq!(Section::from_route("#tasks"), Section::Tasks);
        assert_eq!(Section::from_route("Habits"), Section::Habits);
        assert_eq!(Section::from_route("#nowhere"), Section::Dashboard);
        assert_eq!(Section::from_route(""), Section::Dashboard);
        for s in Section::ALL {
            assert_eq!(Section::from_route(s.route()), s);
        }
    }

    #[test]
    fn tab_order_wraps() {
        assert_eq!(Section::Settings.next(), Section::Dashboard);
        assert_eq!(Section::Dashboard.prev(), Section::Settings);
        assert_eq!(Section::Tasks.index(), 1);
    }
}
