//! TUI entry point and terminal setup.

use std::io;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::catalog::CatalogSource;
use crate::cmd::Tracker;
use crate::tui::app::App;
use crate::tui::enums::Section;

/// Initialise the terminal, run the app opened on `section`, and restore the
/// terminal even when the app returns an error.
pub fn run_tui(store: Tracker, catalog: CatalogSource, section: Section) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("event=ui_open section={}", section.route());
    let mut app = App::new(store, catalog, section);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
