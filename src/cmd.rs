//! Command implementations for the CLI interface.
//!
//! Each handler performs one store operation, prints the result, and exits
//! with status 1 on error. Destructive commands ask for confirmation unless
//! `--yes` is given.

use std::io::{self, Write};

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::catalog::CatalogState;
use crate::config::Config;
use crate::dashboard::aggregate;
use crate::dates::{self, format_due_relative, format_short_date, parse_due_input};
use crate::error::TrackerError;
use crate::fields::*;
use crate::habit::{parse_day, HabitDraft, DAY_LABELS};
use crate::habit_view::project_habits;
use crate::resources::{filter_resources, ResourceQuery};
use crate::storage::FileStore;
use crate::store::Store;
use crate::task::{Task, TaskDraft, DEFAULT_CATEGORY};
use crate::task_view::{project_tasks, task_categories, TaskQuery};
use crate::tui::enums::Section;
use crate::tui::run::run_tui;

pub type Tracker = Store<FileStore>;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive terminal interface.
    Ui {
        /// Section to open: dashboard | tasks | habits | resources | settings.
        #[arg(long)]
        section: Option<String>,
    },

    /// Show the dashboard summary.
    Dashboard,

    /// Add a task. With only a title and due date this is a quick add
    /// (Medium priority, Personal category).
    Add {
        /// Short title for the task.
        title: String,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "in Nd", or a weekday.
        #[arg(long, default_value = "today")]
        due: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Priority: low | medium | high.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Category label, e.g. Personal or Work.
        #[arg(long)]
        category: Option<String>,
    },

    /// List tasks.
    List {
        /// Completion filter.
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,
        /// Category filter: "all" or an exact category name.
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::Date)]
        sort: SortKey,
    },

    /// Edit fields on a task. Omitted fields keep their value.
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long)]
        category: Option<String>,
    },

    /// Toggle a task between open and completed.
    Toggle { id: u64 },

    /// Delete a task.
    Delete {
        id: u64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// List task categories.
    Categories,

    /// Manage weekly habits.
    Habit {
        #[command(subcommand)]
        action: HabitAction,
    },

    /// Check for a new habit week and offer to reset progress.
    Week {
        /// Reset without asking if a new week has started.
        #[arg(long)]
        yes: bool,
    },

    /// Browse the resource catalog.
    Resources {
        /// Case-insensitive search in title and description.
        #[arg(long, default_value = "")]
        search: String,
        /// Category filter: "all" or an exact category name.
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
        /// Only show favorites.
        #[arg(long)]
        favorites: bool,
    },

    /// Add or remove a resource from favorites.
    Fav { id: u64 },

    /// Show, set or (with no argument) toggle the theme.
    Theme {
        #[arg(value_enum)]
        theme: Option<Theme>,
    },

    /// Delete all stored data. Irreversible.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a habit with a weekly goal (days per week).
    Add {
        name: String,
        #[arg(long, default_value_t = 3)]
        goal: u32,
    },
    /// List habits with this week's progress.
    List,
    /// Toggle a day: 0-6 or Sat, Sun, Mon, Tue, Wed, Thu, Fri.
    Toggle { id: u64, day: String },
    /// Delete a habit.
    Delete {
        id: u64,
        #[arg(long)]
        yes: bool,
    },
}

/// Print an error and exit with status 1.
fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("Error: {err}");
    std::process::exit(1);
}

/// Ask a y/N question on stdin. `assume_yes` short-circuits to true.
pub fn confirm(prompt: &str, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }
    print!("{prompt} (y/N): ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut response = String::new();
    io::stdin().read_line(&mut response).is_ok()
        && response.trim().to_lowercase().starts_with('y')
}

fn parse_due_or_fail(s: &str) -> chrono::NaiveDate {
    parse_due_input(s, dates::today()).unwrap_or_else(|| {
        fail(TrackerError::validation(format!(
            "Invalid due date '{s}'. Use YYYY-MM-DD, today, tomorrow, in Nd, or a weekday"
        )))
    })
}

/// Launch the terminal user interface.
pub fn cmd_ui(store: Tracker, config: &Config, section: Option<String>) {
    let section = section.as_deref().map(Section::from_route).unwrap_or_default();
    if let Err(e) = run_tui(store, config.catalog.clone(), section) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Print the dashboard counters and the upcoming list.
pub fn cmd_dashboard(store: &Tracker) {
    let today = dates::today();
    let d = aggregate(store.tasks(), store.habits(), today);
    println!("Completed:   {} / {} ({}%)", d.completed_count, d.total_count, d.progress_percent);
    println!("Due soon:    {}", d.due_soon_count);
    println!("Habit goals: {} / {}", d.habit_goals_met, d.total_habits);
    println!();
    println!("Upcoming:");
    if d.upcoming_tasks.is_empty() {
        println!("  Nothing urgent. Enjoy your time!");
    } else {
        for t in &d.upcoming_tasks {
            println!("  {} ({})", t.title, format_short_date(t.due_date));
        }
    }
}

/// Add a new task.
pub fn cmd_add(
    store: &mut Tracker,
    title: String,
    due: String,
    desc: Option<String>,
    priority: Option<Priority>,
    category: Option<String>,
) {
    let due_date = parse_due_or_fail(&due);
    let result = if desc.is_none() && priority.is_none() && category.is_none() {
        store.quick_add_task(&title, due_date)
    } else {
        store.add_task(TaskDraft {
            title,
            description: desc.unwrap_or_default(),
            due_date,
            priority: priority.unwrap_or_default(),
            category: category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        })
    };
    match result {
        Ok((id, _)) => println!("Added task {id}"),
        Err(e) => fail(e),
    }
}

/// List tasks with the given filters and sort.
pub fn cmd_list(store: &Tracker, status: StatusFilter, category: CategoryFilter, sort: SortKey) {
    let view = project_tasks(store.tasks(), &TaskQuery { status, category, sort });
    if view.is_empty() {
        println!("No tasks here. Start by adding a new one!");
        return;
    }
    let rows: Vec<&Task> = view.tasks.iter().collect();
    print_table(&rows);
    println!("{} of {} task(s)", view.len(), view.total);
}

/// Edit an existing task, keeping omitted fields.
pub fn cmd_edit(
    store: &mut Tracker,
    id: u64,
    title: Option<String>,
    desc: Option<String>,
    due: Option<String>,
    priority: Option<Priority>,
    category: Option<String>,
) {
    let Some(current) = store.task(id).cloned() else {
        fail(TrackerError::task_not_found(id));
    };
    let draft = TaskDraft {
        title: title.unwrap_or(current.title),
        description: desc.unwrap_or(current.description),
        due_date: due.as_deref().map(parse_due_or_fail).unwrap_or(current.due_date),
        priority: priority.unwrap_or(current.priority),
        category: category.unwrap_or(current.category),
    };
    match store.update_task(id, draft) {
        Ok(_) => println!("Updated task {id}"),
        Err(e) => fail(e),
    }
}

/// Toggle a task's completion.
pub fn cmd_toggle(store: &mut Tracker, id: u64) {
    match store.toggle_task_completion(id) {
        Ok((true, _)) => println!("Completed task {id}"),
        Ok((false, _)) => println!("Reopened task {id}"),
        Err(e) => fail(e),
    }
}

/// Delete a task after confirmation.
pub fn cmd_delete(store: &mut Tracker, id: u64, yes: bool) {
    let Some(task) = store.task(id) else {
        fail(TrackerError::task_not_found(id));
    };
    if !confirm(&format!("Delete task {} - {}?", id, task.title), yes) {
        println!("Cancelled.");
        return;
    }
    match store.delete_task(id) {
        Ok(_) => println!("Deleted."),
        Err(e) => fail(e),
    }
}

/// List categories with task counts.
pub fn cmd_categories(store: &Tracker) {
    for cat in task_categories(store.tasks()) {
        let count = store.tasks().iter().filter(|t| t.category == cat).count();
        println!("{:<20} {}", cat, count);
    }
}

/// Habit subcommands.
pub fn cmd_habit(store: &mut Tracker, action: HabitAction) {
    match action {
        HabitAction::Add { name, goal } => match store.add_habit(HabitDraft::new(name, goal)) {
            Ok((id, _)) => println!("Added habit {id}"),
            Err(e) => fail(e),
        },
        HabitAction::List => print_habits(store),
        HabitAction::Toggle { id, day } => {
            let Some(idx) = parse_day(&day) else {
                fail(TrackerError::validation(format!(
                    "Unknown day '{day}'. Use 0-6 or {}",
                    DAY_LABELS.join(", ")
                )));
            };
            match store.toggle_habit_day(id, idx) {
                Ok((checked, _)) => {
                    let label = DAY_LABELS[idx];
                    println!("{} {}", label, if checked { "checked" } else { "unchecked" });
                }
                Err(e) => fail(e),
            }
        }
        HabitAction::Delete { id, yes } => {
            let Some(habit) = store.habit(id) else {
                fail(TrackerError::habit_not_found(id));
            };
            if !confirm(&format!("Delete habit {} - {}?", id, habit.name), yes) {
                println!("Cancelled.");
                return;
            }
            match store.delete_habit(id) {
                Ok(_) => println!("Deleted."),
                Err(e) => fail(e),
            }
        }
    }
}

fn print_habits(store: &Tracker) {
    let view = project_habits(store.habits());
    if view.is_empty() {
        println!("{}", view.summary());
        return;
    }
    println!("{:<15} {:<20} {:<9} {}", "ID", "Habit", "Progress", DAY_LABELS.join(" "));
    for h in &view.habits {
        let days: Vec<String> = h
            .days
            .iter()
            .map(|&d| format!("{:<3}", if d { "x" } else { "." }))
            .collect();
        let marker = if h.is_goal_met { " *" } else { "" };
        println!(
            "{:<15} {:<20} {:<9} {}{}",
            h.id,
            truncate(&h.name, 20),
            format!("{}/{}", h.completed_count, h.goal),
            days.join(" "),
            marker
        );
    }
    println!();
    println!("{}", view.summary());
}

/// Check for weekly rollover and reset habit progress on confirmation.
pub fn cmd_week(store: &mut Tracker, yes: bool) {
    let proposal = match store.propose_week_reset() {
        Ok(Some(p)) => p,
        Ok(None) => {
            println!("The current habit week is still running.");
            return;
        }
        Err(e) => fail(e),
    };
    let prompt = format!(
        "A new week has started ({} days since {}). Reset habit progress?",
        proposal.elapsed_days(),
        proposal.week_start().format("%Y-%m-%d")
    );
    if !confirm(&prompt, yes) {
        println!("Kept last week's progress.");
        return;
    }
    match store.reset_all_habit_weeks(proposal) {
        Ok(_) => println!("Habit progress reset for the new week."),
        Err(e) => fail(e),
    }
}

/// Fetch the catalog and print the filtered entries.
pub fn cmd_resources(store: &Tracker, config: &Config, query: ResourceQuery) {
    let state = CatalogState::load(&config.catalog);
    let catalog = match &state {
        CatalogState::Loaded(c) => c,
        CatalogState::Failed(msg) => fail(format!("Failed to load resources from {}: {msg}", config.catalog)),
        CatalogState::NotLoaded => return,
    };
    let entries = filter_resources(catalog, &query, store.favorites());
    if entries.is_empty() {
        println!("No resources match your search.");
        return;
    }
    for e in entries {
        let star = if e.is_favorite { "*" } else { " " };
        println!("{} {:<5} {:<30} [{}]", star, e.resource.id, truncate(&e.resource.title, 30), e.resource.category);
        if !e.resource.description.is_empty() {
            println!("        {}", e.resource.description);
        }
        if !e.resource.link.is_empty() {
            println!("        {}", e.resource.link);
        }
    }
}

/// Toggle a resource favorite.
pub fn cmd_fav(store: &mut Tracker, id: u64) {
    match store.toggle_favorite(id) {
        Ok((true, _)) => println!("Added {id} to favorites"),
        Ok((false, _)) => println!("Removed {id} from favorites"),
        Err(e) => fail(e),
    }
}

/// Set or toggle the theme.
pub fn cmd_theme(store: &mut Tracker, theme: Option<Theme>) {
    let result = match theme {
        Some(t) => store.set_theme(t).map(|_| t),
        None => store.toggle_theme().map(|(t, _)| t),
    };
    match result {
        Ok(t) => println!("Theme: {}", t.as_str()),
        Err(e) => fail(e),
    }
}

/// Wipe all stored data after confirmation.
pub fn cmd_reset(store: &mut Tracker, yes: bool) {
    if !confirm("Warning: this permanently deletes all data. Are you sure?", yes) {
        println!("Cancelled.");
        return;
    }
    let proposal = store.propose_reset_all();
    match store.reset_all(proposal) {
        Ok(_) => println!("All data cleared."),
        Err(e) => fail(e),
    }
}

/// Generate shell completions.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task]) {
    println!(
        "{:<15} {:<6} {:<8} {:<12} {:<11} {:<12} {}",
        "ID", "Done", "Pri", "Due", "Date", "Category", "Title"
    );
    let today = dates::today();
    for t in tasks {
        println!(
            "{:<15} {:<6} {:<8} {:<12} {:<11} {:<12} {}",
            t.id,
            if t.completed { "[x]" } else { "[ ]" },
            t.priority.label(),
            format_due_relative(t.due_date, today),
            format_short_date(t.due_date),
            truncate(&t.category, 12),
            t.title
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
