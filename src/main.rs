//! # trk - personal productivity tracker
//!
//! A terminal tracker for the small things: to-do tasks with due dates and
//! priorities, weekly habits with day-by-day check-offs, a curated resource
//! directory with favorites, and a dashboard that sums it all up.
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the interactive UI on the dashboard
//! trk
//!
//! # Quick-add a task due tomorrow
//! trk add "Buy milk" --due tomorrow
//!
//! # Weekly habit with a goal of 4 days
//! trk habit add "Stretch" --goal 4
//! trk habit toggle <id> mon
//!
//! # Summary
//! trk dashboard
//! ```
//!
//! ## Storage
//!
//! State lives in `~/.tracker/` (or `--data-dir`), one JSON file per key:
//! `tasks.json`, `habits.json`, `favorites.json`, `theme.json` and
//! `weekStartDate.json`. A corrupt file only resets its own collection.
//! Logs are written to `~/.tracker/logs/`.
//!
//! The resource catalog is read from `~/.tracker/resources.json` by default,
//! or from any path or http(s) URL given with `--catalog`.

use clap::Parser;

pub mod catalog;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod dashboard;
pub mod dates;
pub mod error;
pub mod fields;
pub mod habit;
pub mod habit_view;
pub mod logging;
pub mod resources;
pub mod storage;
pub mod store;
pub mod task;
pub mod task_view;
pub mod views;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod forms;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;
use resources::ResourceQuery;
use storage::FileStore;
use store::Store;

fn main() {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    if let Err(e) = logging::init_logging(&config.log_level, &config.log_dir()) {
        eprintln!("Warning: file logging disabled: {e}");
    }

    let command = cli.command.unwrap_or(Commands::Ui { section: None });

    // Completions need no storage.
    if let Commands::Completions { shell } = command {
        cmd_completions(shell);
        return;
    }

    let backend = match FileStore::open(&config.data_dir) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Failed to open data directory {}: {}", config.data_dir.display(), e);
            std::process::exit(1);
        }
    };
    let mut store: Tracker = Store::open(backend);

    match command {
        Commands::Ui { section } => cmd_ui(store, &config, section),
        Commands::Week { yes } => cmd_week(&mut store, yes),
        Commands::Reset { yes } => cmd_reset(&mut store, yes),
        other => {
            notify_week_rollover(&mut store);
            run_command(&mut store, &config, other);
        }
    }
}

/// Remind the user when a new habit week has begun; the UI asks instead.
fn notify_week_rollover(store: &mut Tracker) {
    match store.propose_week_reset() {
        Ok(Some(_)) => eprintln!("A new week has started. Run `trk week` to reset habit progress."),
        Ok(None) => {}
        Err(e) => eprintln!("Warning: could not check the habit week: {e}"),
    }
}

fn run_command(store: &mut Tracker, config: &Config, command: Commands) {
    match command {
        Commands::Ui { .. } | Commands::Week { .. } | Commands::Reset { .. } => {
            unreachable!("handled in main")
        }
        Commands::Completions { .. } => unreachable!("handled before opening storage"),

        Commands::Dashboard => cmd_dashboard(store),

        Commands::Add { title, due, desc, priority, category } =>
            cmd_add(store, title, due, desc, priority, category),

        Commands::List { status, category, sort } => cmd_list(store, status, category, sort),

        Commands::Edit { id, title, desc, due, priority, category } =>
            cmd_edit(store, id, title, desc, due, priority, category),

        Commands::Toggle { id } => cmd_toggle(store, id),

        Commands::Delete { id, yes } => cmd_delete(store, id, yes),

        Commands::Categories => cmd_categories(store),

        Commands::Habit { action } => cmd_habit(store, action),

        Commands::Resources { search, category, favorites } => cmd_resources(
            store,
            config,
            ResourceQuery { search, category, favorites_only: favorites },
        ),

        Commands::Fav { id } => cmd_fav(store, id),

        Commands::Theme { theme } => cmd_theme(store, theme),
    }
}
