//! Main application logic for the terminal user interface.
//!
//! `App` owns the store and the cached views. Every mutation goes through the
//! store and hands its `Affected` set straight to `Views::refresh`, so what is
//! on screen always matches what was saved.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame, Terminal,
};

use crate::catalog::{CatalogSource, CatalogState};
use crate::dates::{format_due_relative, format_short_date};
use crate::error::Result;
use crate::habit::DAY_LABELS;
use crate::resources::ResourceQuery;
use crate::storage::KeyValueStore;
use crate::store::{Affected, Clock, Store, SystemClock, WeekResetProposal};
use crate::tui::{
    colors::Palette,
    enums::{AppState, Section},
    forms::{
        HabitForm, TaskForm, CATEGORY_FIELD, DESCRIPTION_FIELD, DUE_FIELD, GOAL_FIELD, NAME_FIELD,
        PRIORITY_FIELD, TITLE_FIELD,
    },
    input::InputField,
    utils::centered_rect,
};
use crate::views::{ResourceView, Views};

/// An action waiting on a yes/no answer.
#[derive(Debug)]
enum PendingConfirm {
    DeleteTask(u64),
    DeleteHabit(u64),
    WeekReset(WeekResetProposal),
    ResetAll,
}

pub struct App<S: KeyValueStore, C: Clock = SystemClock> {
    store: Store<S, C>,
    views: Views,
    palette: Palette,
    catalog_source: CatalogSource,
    section: Section,
    state: AppState,
    task_table: TableState,
    habit_table: TableState,
    resource_table: TableState,
    day_cursor: usize,
    task_form: TaskForm,
    habit_form: HabitForm,
    search: InputField,
    pending: Option<PendingConfirm>,
    status_message: String,
}

impl<S: KeyValueStore, C: Clock> App<S, C> {
    /// Build the app on `section`. Asks about a habit week rollover first if
    /// one is due.
    pub fn new(store: Store<S, C>, catalog_source: CatalogSource, section: Section) -> Self {
        let views = Views::new(store.state(), store.today());
        let palette = Palette::for_theme(store.theme());
        let mut app = App {
            store,
            views,
            palette,
            catalog_source,
            section: Section::Dashboard,
            state: AppState::Browse,
            task_table: TableState::default(),
            habit_table: TableState::default(),
            resource_table: TableState::default(),
            day_cursor: 0,
            task_form: TaskForm::new(),
            habit_form: HabitForm::new(),
            search: InputField::new(),
            pending: None,
            status_message: String::new(),
        };
        app.clamp_selections();
        app.check_week_rollover(false);
        app.enter_section(section);
        app
    }

    fn palette(&self) -> Palette {
        self.palette
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Recompute the affected views and keep table selections in range.
    fn refresh(&mut self, affected: Affected) {
        let today = self.store.today();
        self.views.refresh(affected, self.store.state(), today);
        if affected.theme {
            self.palette = Palette::for_theme(self.store.theme());
        }
        self.clamp_selections();
    }

    /// Apply a store result: refresh on success, report the error otherwise.
    fn commit(&mut self, result: Result<Affected>, done: impl Into<String>) -> bool {
        match result {
            Ok(affected) => {
                self.refresh(affected);
                self.set_status_message(done);
                true
            }
            Err(e) => {
                self.set_status_message(format!("Error: {e}"));
                false
            }
        }
    }

    fn clamp_selections(&mut self) {
        let resource_len = match &self.views.resources {
            ResourceView::Entries(entries) => entries.len(),
            _ => 0,
        };
        clamp(&mut self.task_table, self.views.tasks.len());
        clamp(&mut self.habit_table, self.views.habits.habits.len());
        clamp(&mut self.resource_table, resource_len);
    }

    fn enter_section(&mut self, section: Section) {
        self.section = section;
        if section == Section::Resources && self.views.catalog == CatalogState::NotLoaded {
            self.load_catalog();
        }
    }

    fn load_catalog(&mut self) {
        let today = self.store.today();
        self.views.load_catalog(&self.catalog_source, self.store.state(), today);
        self.clamp_selections();
        if let CatalogState::Loaded(resources) = &self.views.catalog {
            let msg = format!("Loaded {} resource(s)", resources.len());
            self.set_status_message(msg);
        }
    }

    /// Ask to reset habit progress when the week has rolled over.
    fn check_week_rollover(&mut self, manual: bool) {
        match self.store.propose_week_reset() {
            Ok(Some(proposal)) => {
                self.pending = Some(PendingConfirm::WeekReset(proposal));
                self.state = AppState::Confirm;
            }
            Ok(None) if manual => self.set_status_message("The current habit week is still running."),
            Ok(None) => {}
            Err(e) => self.set_status_message(format!("Could not check the habit week: {e}")),
        }
    }

    fn selected_task_id(&self) -> Option<u64> {
        let idx = self.task_table.selected()?;
        self.views.tasks.tasks.get(idx).map(|t| t.id)
    }

    fn selected_habit_id(&self) -> Option<u64> {
        let idx = self.habit_table.selected()?;
        self.views.habits.habits.get(idx).map(|h| h.id)
    }

    fn selected_resource_id(&self) -> Option<u64> {
        let idx = self.resource_table.selected()?;
        match &self.views.resources {
            ResourceView::Entries(entries) => entries.get(idx).map(|e| e.resource.id),
            _ => None,
        }
    }

    fn ask(&mut self, pending: PendingConfirm) {
        self.pending = Some(pending);
        self.state = AppState::Confirm;
    }

    fn toggle_theme(&mut self) {
        match self.store.toggle_theme() {
            Ok((theme, affected)) => {
                self.refresh(affected);
                self.set_status_message(format!("Theme: {}", theme.as_str()));
            }
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
    }

    // ---- input -----------------------------------------------------------

    /// Dispatch one key press. Returns true if the application should quit.
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Browse => return self.handle_browse_key(key),
            AppState::AddTask | AppState::QuickAdd | AppState::EditTask(_) => self.handle_task_form_key(key),
            AppState::AddHabit => self.handle_habit_form_key(key),
            AppState::Search => self.handle_search_key(key),
            AppState::Help => {
                if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                    self.state = AppState::Browse;
                }
            }
            AppState::Confirm => self.handle_confirm_key(key),
        }
        false
    }

    fn handle_browse_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c.to_digit(10).unwrap_or(1) as usize - 1;
                self.enter_section(Section::ALL[idx]);
            }
            KeyCode::Tab => self.enter_section(self.section.next()),
            KeyCode::BackTab => self.enter_section(self.section.prev()),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('?') => self.state = AppState::Help,
            KeyCode::Esc => self.status_message.clear(),
            _ => match self.section {
                Section::Dashboard => self.handle_dashboard_key(key),
                Section::Tasks => self.handle_tasks_key(key),
                Section::Habits => self.handle_habits_key(key),
                Section::Resources => self.handle_resources_key(key),
                Section::Settings => self.handle_settings_key(key),
            },
        }
        false
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        if key == KeyCode::Char('a') {
            self.task_form = TaskForm::new_quick();
            self.state = AppState::QuickAdd;
        }
    }

    fn handle_tasks_key(&mut self, key: KeyCode) {
        let len = self.views.tasks.len();
        match key {
            KeyCode::Up | KeyCode::Char('k') => step(&mut self.task_table, len, false),
            KeyCode::Down | KeyCode::Char('j') => step(&mut self.task_table, len, true),
            KeyCode::Char('a') => {
                self.task_form = TaskForm::new();
                self.state = AppState::AddTask;
            }
            KeyCode::Char('e') => {
                if let Some(task) = self.selected_task_id().and_then(|id| self.store.task(id)) {
                    self.task_form = TaskForm::from_task(task);
                    self.state = AppState::EditTask(task.id);
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.selected_task_id() {
                    let result = self.store.toggle_task_completion(id);
                    let msg = match &result {
                        Ok((true, _)) => "Task completed",
                        _ => "Task reopened",
                    };
                    self.commit(result.map(|(_, a)| a), msg);
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_task_id() {
                    self.ask(PendingConfirm::DeleteTask(id));
                }
            }
            KeyCode::Char('f') => {
                let mut query = self.views.task_query.clone();
                query.status = query.status.next();
                self.views.set_task_query(query, self.store.state());
                self.clamp_selections();
            }
            KeyCode::Char('g') => {
                let mut query = self.views.task_query.clone();
                query.category = query.category.cycle(&self.views.task_categories);
                self.views.set_task_query(query, self.store.state());
                self.clamp_selections();
            }
            KeyCode::Char('s') => {
                let mut query = self.views.task_query.clone();
                query.sort = query.sort.toggled();
                self.views.set_task_query(query, self.store.state());
            }
            _ => {}
        }
    }

    fn handle_habits_key(&mut self, key: KeyCode) {
        let len = self.views.habits.habits.len();
        match key {
            KeyCode::Up | KeyCode::Char('k') => step(&mut self.habit_table, len, false),
            KeyCode::Down | KeyCode::Char('j') => step(&mut self.habit_table, len, true),
            KeyCode::Left | KeyCode::Char('h') => {
                self.day_cursor = (self.day_cursor + DAY_LABELS.len() - 1) % DAY_LABELS.len();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.day_cursor = (self.day_cursor + 1) % DAY_LABELS.len();
            }
            KeyCode::Char('a') => {
                self.habit_form = HabitForm::new();
                self.state = AppState::AddHabit;
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.selected_habit_id() {
                    let day = self.day_cursor;
                    let result = self.store.toggle_habit_day(id, day);
                    let msg = match &result {
                        Ok((true, _)) => format!("{} checked", DAY_LABELS[day]),
                        _ => format!("{} unchecked", DAY_LABELS[day]),
                    };
                    self.commit(result.map(|(_, a)| a), msg);
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_habit_id() {
                    self.ask(PendingConfirm::DeleteHabit(id));
                }
            }
            KeyCode::Char('w') => self.check_week_rollover(true),
            _ => {}
        }
    }

    fn handle_resources_key(&mut self, key: KeyCode) {
        let len = match &self.views.resources {
            ResourceView::Entries(entries) => entries.len(),
            _ => 0,
        };
        match key {
            KeyCode::Up | KeyCode::Char('k') => step(&mut self.resource_table, len, false),
            KeyCode::Down | KeyCode::Char('j') => step(&mut self.resource_table, len, true),
            KeyCode::Char('r') => self.load_catalog(),
            KeyCode::Char('/') => {
                self.search = InputField::with_value(&self.views.resource_query.search);
                self.state = AppState::Search;
            }
            KeyCode::Char('g') => {
                let mut query = self.views.resource_query.clone();
                query.category = query.category.cycle(&self.views.catalog.categories());
                self.apply_resource_query(query);
            }
            KeyCode::Char('v') => {
                let mut query = self.views.resource_query.clone();
                query.favorites_only = !query.favorites_only;
                self.apply_resource_query(query);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.selected_resource_id() {
                    let result = self.store.toggle_favorite(id);
                    let msg = match &result {
                        Ok((true, _)) => "Added to favorites",
                        _ => "Removed from favorites",
                    };
                    self.commit(result.map(|(_, a)| a), msg);
                }
            }
            _ => {}
        }
    }

    fn apply_resource_query(&mut self, query: ResourceQuery) {
        let today = self.store.today();
        self.views.set_resource_query(query, self.store.state(), today);
        self.clamp_selections();
    }

    fn handle_settings_key(&mut self, key: KeyCode) {
        if key == KeyCode::Char('R') {
            self.ask(PendingConfirm::ResetAll);
        }
    }

    fn handle_task_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.state = AppState::Browse;
                self.set_status_message("Cancelled");
            }
            KeyCode::Enter => self.submit_task_form(),
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false, &self.views.task_categories),
            KeyCode::Right => self.task_form.handle_left_right(true, &self.views.task_categories),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
    }

    fn submit_task_form(&mut self) {
        let draft = match self.task_form.to_draft(self.store.today()) {
            Ok(draft) => draft,
            Err(e) => {
                self.set_status_message(e.to_string());
                return;
            }
        };
        let saved = match self.state {
            AppState::EditTask(id) => {
                let result = self.store.update_task(id, draft);
                self.commit(result, "Task updated")
            }
            _ => {
                let result = self.store.add_task(draft).map(|(_, a)| a);
                self.commit(result, "Task added")
            }
        };
        if saved {
            self.state = AppState::Browse;
        }
    }

    fn handle_habit_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.state = AppState::Browse;
                self.set_status_message("Cancelled");
            }
            KeyCode::Enter => {
                let draft = match self.habit_form.to_draft() {
                    Ok(draft) => draft,
                    Err(e) => {
                        self.set_status_message(e.to_string());
                        return;
                    }
                };
                let result = self.store.add_habit(draft).map(|(_, a)| a);
                if self.commit(result, "Habit added") {
                    self.state = AppState::Browse;
                }
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.habit_form.toggle_field(),
            KeyCode::Left => self.habit_form.active_input().move_cursor_left(),
            KeyCode::Right => self.habit_form.active_input().move_cursor_right(),
            KeyCode::Backspace => self.habit_form.active_input().handle_backspace(),
            KeyCode::Delete => self.habit_form.active_input().handle_delete(),
            KeyCode::Char(c) => self.habit_form.active_input().handle_char(c),
            _ => {}
        }
    }

    /// The resource list filters as the user types.
    fn handle_search_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                self.state = AppState::Browse;
                return;
            }
            KeyCode::Esc => {
                self.search.clear();
                self.state = AppState::Browse;
            }
            KeyCode::Left => {
                self.search.move_cursor_left();
                return;
            }
            KeyCode::Right => {
                self.search.move_cursor_right();
                return;
            }
            KeyCode::Backspace => self.search.handle_backspace(),
            KeyCode::Delete => self.search.handle_delete(),
            KeyCode::Char(c) => self.search.handle_char(c),
            _ => return,
        }
        let mut query = self.views.resource_query.clone();
        query.search = self.search.value.clone();
        self.apply_resource_query(query);
    }

    fn handle_confirm_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.state = AppState::Browse;
                if let Some(pending) = self.pending.take() {
                    self.confirm(pending);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::Browse;
                if let Some(PendingConfirm::WeekReset(_)) = self.pending.take() {
                    self.set_status_message("Kept last week's progress.");
                }
            }
            _ => {}
        }
    }

    fn confirm(&mut self, pending: PendingConfirm) {
        match pending {
            PendingConfirm::DeleteTask(id) => {
                let result = self.store.delete_task(id);
                self.commit(result, "Task deleted");
            }
            PendingConfirm::DeleteHabit(id) => {
                let result = self.store.delete_habit(id);
                self.commit(result, "Habit deleted");
            }
            PendingConfirm::WeekReset(proposal) => {
                let result = self.store.reset_all_habit_weeks(proposal);
                self.commit(result, "Habit progress reset for the new week.");
            }
            PendingConfirm::ResetAll => {
                let proposal = self.store.propose_reset_all();
                let result = self.store.reset_all(proposal);
                self.commit(result, "All data cleared.");
            }
        }
    }

    /// Poll for and handle keyboard events.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                return Ok(self.handle_key(key.code));
            }
        }
        Ok(false)
    }

    // ---- rendering -------------------------------------------------------

    fn block(&self, title: impl Into<String>) -> Block<'static> {
        let p = self.palette();
        Block::default()
            .borders(Borders::ALL)
            .title(title.into())
            .border_style(Style::default().fg(p.muted))
            .style(Style::default().bg(p.bg).fg(p.fg))
    }

    fn render_tabs(&self, f: &mut Frame, area: Rect) {
        let p = self.palette();
        let titles = Section::ALL
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{} {}", i + 1, s.title()));
        let tabs = Tabs::new(titles)
            .block(self.block("Tracker"))
            .select(self.section.index())
            .style(Style::default().fg(p.muted))
            .highlight_style(Style::default().fg(p.primary).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, area);
    }

    fn render_dashboard(&self, f: &mut Frame, area: Rect) {
        let p = self.palette();
        let d = &self.views.dashboard;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let stats = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(33),
                Constraint::Percentage(33),
            ])
            .split(chunks[0]);
        let cards = [
            ("Tasks done", format!("{} / {}", d.completed_count, d.total_count), p.success),
            ("Due soon", d.due_soon_count.to_string(), p.warning),
            ("Habit goals", format!("{} / {}", d.habit_goals_met, d.total_habits), p.primary),
        ];
        for (i, (title, value, color)) in cards.into_iter().enumerate() {
            let card = Paragraph::new(value)
                .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .block(self.block(title));
            f.render_widget(card, stats[i]);
        }

        let gauge = Gauge::default()
            .block(self.block("Progress"))
            .gauge_style(Style::default().fg(p.success).bg(p.bg))
            .percent(u16::from(d.progress_percent.min(100)));
        f.render_widget(gauge, chunks[1]);

        let today = self.store.today();
        let lines: Vec<Line> = if d.upcoming_tasks.is_empty() {
            vec![Line::from(Span::styled(
                "Nothing urgent. Enjoy your time!",
                Style::default().fg(p.muted),
            ))]
        } else {
            d.upcoming_tasks
                .iter()
                .map(|t| {
                    Line::from(vec![
                        Span::styled("● ", Style::default().fg(p.priority(t.priority))),
                        Span::raw(t.title.clone()),
                        Span::styled(
                            format!("  {} ({})", format_short_date(t.due_date), format_due_relative(t.due_date, today)),
                            Style::default().fg(p.muted),
                        ),
                    ])
                })
                .collect()
        };
        let upcoming = Paragraph::new(lines)
            .block(self.block("Upcoming (press 'a' to quick-add)"))
            .wrap(Wrap { trim: true });
        f.render_widget(upcoming, chunks[2]);
    }

    fn render_tasks(&mut self, f: &mut Frame, area: Rect) {
        let p = self.palette();
        let today = self.store.today();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let q = &self.views.task_query;
        let filters = Paragraph::new(format!(
            " Status: {}  Category: {}  Sort: {}  ({} of {})",
            q.status.label(),
            q.category,
            q.sort.label(),
            self.views.tasks.len(),
            self.views.tasks.total
        ))
        .style(Style::default().fg(p.muted).bg(p.bg));
        f.render_widget(filters, chunks[0]);

        if self.views.tasks.is_empty() {
            let empty = Paragraph::new("No tasks here. Start by adding a new one!")
                .style(Style::default().fg(p.muted))
                .alignment(Alignment::Center)
                .block(self.block("Tasks"));
            f.render_widget(empty, chunks[1]);
            return;
        }

        let header = Row::new(["", "Title", "Priority", "Category", "Due"])
            .style(Style::default().fg(p.highlight_fg).bg(p.primary).add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = self
            .views
            .tasks
            .tasks
            .iter()
            .map(|t| {
                let style = if t.completed {
                    Style::default().fg(p.muted).add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(p.fg)
                };
                Row::new(vec![
                    Cell::from(if t.completed { "[x]" } else { "[ ]" }),
                    Cell::from(t.title.clone()),
                    Cell::from(t.priority.label()).style(Style::default().fg(p.priority(t.priority))),
                    Cell::from(t.category.clone()),
                    Cell::from(format_due_relative(t.due_date, today)),
                ])
                .style(style)
            })
            .collect();
        let widths = [
            Constraint::Length(3),
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(14),
            Constraint::Length(14),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(self.block("Tasks"))
            .row_highlight_style(Style::default().bg(p.highlight_bg).fg(p.highlight_fg))
            .highlight_symbol(">> ");
        f.render_stateful_widget(table, chunks[1], &mut self.task_table);
    }

    fn render_habits(&mut self, f: &mut Frame, area: Rect) {
        let p = self.palette();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let summary = Paragraph::new(self.views.habits.summary())
            .alignment(Alignment::Center)
            .block(self.block("This week"));
        f.render_widget(summary, chunks[1]);

        if self.views.habits.is_empty() {
            let empty = Paragraph::new("No habits yet. Press 'a' to add one.")
                .style(Style::default().fg(p.muted))
                .alignment(Alignment::Center)
                .block(self.block("Habits"));
            f.render_widget(empty, chunks[0]);
            return;
        }

        let mut header_cells = vec![Cell::from("Habit"), Cell::from("Progress")];
        header_cells.extend(DAY_LABELS.iter().enumerate().map(|(i, label)| {
            let style = if i == self.day_cursor {
                Style::default().add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default()
            };
            Cell::from(*label).style(style)
        }));
        let header = Row::new(header_cells)
            .style(Style::default().fg(p.highlight_fg).bg(p.primary).add_modifier(Modifier::BOLD));

        let selected = self.habit_table.selected();
        let rows: Vec<Row> = self
            .views
            .habits
            .habits
            .iter()
            .enumerate()
            .map(|(row, h)| {
                let progress_style = if h.is_goal_met {
                    Style::default().fg(p.success).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(p.fg)
                };
                let mut cells = vec![
                    Cell::from(h.name.clone()),
                    Cell::from(format!("{}/{}", h.completed_count, h.goal)).style(progress_style),
                ];
                cells.extend(h.days.iter().enumerate().map(|(i, &checked)| {
                    let mut style = Style::default().fg(if checked { p.success } else { p.muted });
                    if selected == Some(row) && i == self.day_cursor {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Cell::from(if checked { " ● " } else { " ○ " }).style(style)
                }));
                Row::new(cells)
            })
            .collect();

        let mut widths = vec![Constraint::Min(16), Constraint::Length(9)];
        widths.extend(DAY_LABELS.iter().map(|_| Constraint::Length(4)));
        let table = Table::new(rows, widths)
            .header(header)
            .block(self.block("Habits"))
            .row_highlight_style(Style::default().bg(p.highlight_bg).fg(p.highlight_fg))
            .highlight_symbol(">> ");
        f.render_stateful_widget(table, chunks[0], &mut self.habit_table);
    }

    fn render_resources(&mut self, f: &mut Frame, area: Rect) {
        let p = self.palette();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1), Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let searching = self.state == AppState::Search;
        let search_text = if searching { &self.search.value } else { &self.views.resource_query.search };
        let search_style = if searching { Style::default().fg(p.primary) } else { Style::default().fg(p.muted) };
        let search = Paragraph::new(search_text.as_str())
            .block(self.block("Search ('/')").border_style(search_style));
        f.render_widget(search, chunks[0]);
        if searching {
            f.set_cursor_position((chunks[0].x + self.search.cursor as u16 + 1, chunks[0].y + 1));
        }

        let q = &self.views.resource_query;
        let filters = Paragraph::new(format!(
            " Category: {}  Favorites only: {}",
            q.category,
            if q.favorites_only { "yes" } else { "no" }
        ))
        .style(Style::default().fg(p.muted).bg(p.bg));
        f.render_widget(filters, chunks[1]);

        let entries = match &self.views.resources {
            ResourceView::NotLoaded => {
                let msg = Paragraph::new("Resources not loaded. Press 'r' to load.")
                    .style(Style::default().fg(p.muted))
                    .alignment(Alignment::Center)
                    .block(self.block("Resources"));
                f.render_widget(msg, chunks[2]);
                return;
            }
            ResourceView::Failed(err) => {
                let msg = Paragraph::new(format!("Could not load resources: {err}\nPress 'r' to retry."))
                    .style(Style::default().fg(p.danger))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .block(self.block("Resources"));
                f.render_widget(msg, chunks[2]);
                return;
            }
            ResourceView::Entries(entries) => entries,
        };

        if entries.is_empty() {
            let msg = Paragraph::new("No resources match your search.")
                .style(Style::default().fg(p.muted))
                .alignment(Alignment::Center)
                .block(self.block("Resources"));
            f.render_widget(msg, chunks[2]);
            return;
        }

        let header = Row::new(["", "Title", "Category", "Description"])
            .style(Style::default().fg(p.highlight_fg).bg(p.primary).add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = entries
            .iter()
            .map(|e| {
                Row::new(vec![
                    Cell::from(if e.is_favorite { "★" } else { "☆" }).style(Style::default().fg(p.warning)),
                    Cell::from(e.resource.title.clone()),
                    Cell::from(e.resource.category.clone()),
                    Cell::from(e.resource.description.clone()),
                ])
                .style(Style::default().fg(p.fg))
            })
            .collect();
        let link = self
            .resource_table
            .selected()
            .and_then(|i| entries.get(i))
            .map(|e| e.resource.link.clone())
            .unwrap_or_default();
        let widths = [
            Constraint::Length(2),
            Constraint::Length(28),
            Constraint::Length(16),
            Constraint::Min(20),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(self.block(format!("Resources ({})", entries.len())))
            .row_highlight_style(Style::default().bg(p.highlight_bg).fg(p.highlight_fg))
            .highlight_symbol(">> ");
        f.render_stateful_widget(table, chunks[2], &mut self.resource_table);

        let link = Paragraph::new(link)
            .style(Style::default().fg(p.primary))
            .block(self.block("Link"));
        f.render_widget(link, chunks[3]);
    }

    fn render_settings(&self, f: &mut Frame, area: Rect) {
        let p = self.palette();
        let label = Style::default().add_modifier(Modifier::BOLD);
        let text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Theme:      ", label),
                Span::styled(self.store.theme().as_str(), Style::default().fg(p.primary)),
                Span::styled("   (press 't' to toggle)", Style::default().fg(p.muted)),
            ]),
            Line::from(vec![
                Span::styled("Resources:  ", label),
                Span::raw(self.catalog_source.to_string()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Reset all data", label.fg(p.danger)),
                Span::styled(
                    "   (press 'R'; deletes every task, habit, favorite and setting)",
                    Style::default().fg(p.muted),
                ),
            ]),
        ];
        let settings = Paragraph::new(text).block(self.block("Settings"));
        f.render_widget(settings, area);
    }

    fn render_input(&self, f: &mut Frame, area: Rect, title: &str, field: &InputField, focused: bool) {
        let p = self.palette();
        let style = if focused { Style::default().fg(p.primary) } else { Style::default().fg(p.muted) };
        let input = Paragraph::new(field.value.as_str()).block(self.block(title).border_style(style));
        f.render_widget(input, area);
        if focused {
            f.set_cursor_position((area.x + field.cursor as u16 + 1, area.y + 1));
        }
    }

    fn render_task_form(&self, f: &mut Frame, area: Rect) {
        let p = self.palette();
        let form = &self.task_form;
        let title = match self.state {
            AppState::EditTask(_) => "Edit Task",
            AppState::QuickAdd => "Quick Add",
            _ => "New Task",
        };
        let area = if form.quick { centered_rect(60, 40, area) } else { centered_rect(60, 80, area) };
        f.render_widget(Clear, area);
        f.render_widget(self.block(title), area);

        let mut constraints = vec![Constraint::Length(3); form.fields().len()];
        constraints.push(Constraint::Min(1));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(constraints)
            .split(area);

        for (slot, &field) in form.fields().iter().enumerate() {
            let focused = form.current_field == field;
            match field {
                TITLE_FIELD => self.render_input(f, chunks[slot], "Title *", &form.title, focused),
                DESCRIPTION_FIELD => self.render_input(f, chunks[slot], "Description", &form.description, focused),
                DUE_FIELD => self.render_input(
                    f,
                    chunks[slot],
                    "Due * (YYYY-MM-DD, today, tomorrow, in 3d, fri)",
                    &form.due,
                    focused,
                ),
                CATEGORY_FIELD => self.render_input(f, chunks[slot], "Category (←/→ to cycle)", &form.category, focused),
                PRIORITY_FIELD => {
                    let style = if focused { Style::default().fg(p.primary) } else { Style::default().fg(p.muted) };
                    let value = Paragraph::new(format!("< {} >", form.priority.label()))
                        .style(Style::default().fg(p.priority(form.priority)))
                        .block(self.block("Priority").border_style(style));
                    f.render_widget(value, chunks[slot]);
                }
                _ => {}
            }
        }

        let hint = Paragraph::new("Tab next field | Enter save | Esc cancel")
            .style(Style::default().fg(p.muted))
            .alignment(Alignment::Center);
        f.render_widget(hint, chunks[form.fields().len()]);
    }

    fn render_habit_form(&self, f: &mut Frame, area: Rect) {
        let p = self.palette();
        let area = centered_rect(50, 40, area);
        f.render_widget(Clear, area);
        f.render_widget(self.block("New Habit"), area);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(1)])
            .split(area);
        let form = &self.habit_form;
        self.render_input(f, chunks[0], "Name *", &form.name, form.current_field == NAME_FIELD);
        self.render_input(f, chunks[1], "Days per week *", &form.goal, form.current_field == GOAL_FIELD);
        let hint = Paragraph::new("Tab next field | Enter save | Esc cancel")
            .style(Style::default().fg(p.muted))
            .alignment(Alignment::Center);
        f.render_widget(hint, chunks[2]);
    }

    fn confirm_prompt(&self) -> String {
        match &self.pending {
            Some(PendingConfirm::DeleteTask(id)) => {
                let title = self.store.task(*id).map(|t| t.title.as_str()).unwrap_or("?");
                format!("Delete task \"{title}\"?")
            }
            Some(PendingConfirm::DeleteHabit(id)) => {
                let name = self.store.habit(*id).map(|h| h.name.as_str()).unwrap_or("?");
                format!("Delete habit \"{name}\"?")
            }
            Some(PendingConfirm::WeekReset(p)) => format!(
                "A new week has started ({} days since {}). Reset habit progress?",
                p.elapsed_days(),
                format_short_date(p.week_start().date_naive())
            ),
            Some(PendingConfirm::ResetAll) => {
                "Delete all tasks, habits, favorites and settings?".to_string()
            }
            None => String::new(),
        }
    }

    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let p = self.palette();
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(p.danger).fg(p.highlight_fg));

        let area = centered_rect(50, 25, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(self.confirm_prompt(), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let p = self.palette();
        let key = |k: &'static str| Span::styled(format!("{k:<12}"), Style::default().fg(p.primary));
        let heading = |h: &'static str| Line::from(Span::styled(h, Style::default().add_modifier(Modifier::BOLD)));
        let text = vec![
            heading("Everywhere"),
            Line::from(vec![key("1-5, Tab"), Span::raw("switch section")]),
            Line::from(vec![key("t"), Span::raw("toggle light/dark theme")]),
            Line::from(vec![key("q"), Span::raw("quit")]),
            Line::from(""),
            heading("Dashboard"),
            Line::from(vec![key("a"), Span::raw("quick-add a task")]),
            Line::from(""),
            heading("Tasks"),
            Line::from(vec![key("a / e"), Span::raw("add / edit task")]),
            Line::from(vec![key("space"), Span::raw("complete / reopen")]),
            Line::from(vec![key("d"), Span::raw("delete")]),
            Line::from(vec![key("f / g / s"), Span::raw("status filter / category / sort")]),
            Line::from(""),
            heading("Habits"),
            Line::from(vec![key("a"), Span::raw("add habit")]),
            Line::from(vec![key("←/→ space"), Span::raw("pick a day and check it off")]),
            Line::from(vec![key("d / w"), Span::raw("delete / check for a new week")]),
            Line::from(""),
            heading("Resources"),
            Line::from(vec![key("/"), Span::raw("search")]),
            Line::from(vec![key("g / v"), Span::raw("category / favorites only")]),
            Line::from(vec![key("space"), Span::raw("toggle favorite")]),
            Line::from(vec![key("r"), Span::raw("reload")]),
            Line::from(""),
            heading("Settings"),
            Line::from(vec![key("R"), Span::raw("reset all data")]),
        ];
        let area = centered_rect(60, 80, area);
        f.render_widget(Clear, area);
        f.render_widget(Paragraph::new(text).block(self.block("Help (Esc to close)")), area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let p = self.palette();
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::Search => "Type to search | Enter keep | Esc clear".to_string(),
                AppState::Confirm => "Confirm Action".to_string(),
                _ => format!("{} | Press '?' for help", self.section.title()),
            }
        };
        let status = Paragraph::new(text)
            .style(Style::default().bg(p.primary).fg(p.highlight_fg))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to the section and overlay renderers.
    fn render(&mut self, f: &mut Frame) {
        let p = self.palette();
        f.render_widget(Block::default().style(Style::default().bg(p.bg).fg(p.fg)), f.area());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        self.render_tabs(f, chunks[0]);
        match self.section {
            Section::Dashboard => self.render_dashboard(f, chunks[1]),
            Section::Tasks => self.render_tasks(f, chunks[1]),
            Section::Habits => self.render_habits(f, chunks[1]),
            Section::Resources => self.render_resources(f, chunks[1]),
            Section::Settings => self.render_settings(f, chunks[1]),
        }

        match self.state {
            AppState::AddTask | AppState::QuickAdd | AppState::EditTask(_) => self.render_task_form(f, chunks[1]),
            AppState::AddHabit => self.render_habit_form(f, chunks[1]),
            AppState::Help => self.render_help(f, chunks[1]),
            AppState::Confirm => self.render_confirm(f, chunks[1]),
            AppState::Browse | AppState::Search => {}
        }

        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop for the TUI application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

/// Keep a table selection inside `0..len`, selecting the first row when
/// nothing is selected yet.
fn clamp(state: &mut TableState, len: usize) {
    if len == 0 {
        state.select(None);
    } else {
        let idx = state.selected().unwrap_or(0).min(len - 1);
        state.select(Some(idx));
    }
}

fn step(state: &mut TableState, len: usize, forward: bool) {
    if len == 0 {
        return;
    }
    let current = state.selected().unwrap_or(0);
    let next = if forward { (current + 1) % len } else { (current + len - 1) % len };
    state.select(Some(next));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Theme;
    use crate::habit::HabitDraft;
    use crate::storage::MemoryStore;
    use crate::store::tests::{start, TestClock};
    use chrono::Duration;
    use ratatui::backend::TestBackend;
    use std::io::Write;

    type TestApp = App<MemoryStore, TestClock>;

    fn missing_catalog() -> CatalogSource {
        CatalogSource::File("/nonexistent/trk-resources.json".into())
    }

    fn app_with(store: Store<MemoryStore, TestClock>, section: Section) -> TestApp {
        App::new(store, missing_catalog(), section)
    }

    fn fresh() -> (TestApp, TestClock) {
        let clock = TestClock::at(start());
        let store = Store::with_clock(MemoryStore::new(), clock.clone());
        (app_with(store, Section::Dashboard), clock)
    }

    fn press(app: &mut TestApp, keys: &[KeyCode]) {
        for &k in keys {
            app.handle_key(k);
        }
    }

    fn type_str(app: &mut TestApp, s: &str) {
        for c in s.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn quick_add_from_dashboard_updates_counters() {
        let (mut app, _) = fresh();
        press(&mut app, &[KeyCode::Char('a')]);
        assert_eq!(app.state, AppState::QuickAdd);
        type_str(&mut app, "Buy milk");
        press(&mut app, &[KeyCode::Tab]);
        type_str(&mut app, "today");
        press(&mut app, &[KeyCode::Enter]);

        assert_eq!(app.state, AppState::Browse);
        assert_eq!(app.store.tasks().len(), 1);
        assert_eq!(app.store.tasks()[0].category, "Personal");
        assert_eq!(app.views.dashboard.total_count, 1);
        assert_eq!(app.views.dashboard.due_soon_count, 1);
        assert_eq!(app.views.dashboard.upcoming_tasks.len(), 1);
    }

    #[test]
    fn invalid_form_stays_open() {
        let (mut app, _) = fresh();
        press(&mut app, &[KeyCode::Char('2'), KeyCode::Char('a')]);
        type_str(&mut app, "No due date");
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.state, AppState::AddTask);
        assert!(app.store.tasks().is_empty());
        assert!(!app.status_message.is_empty());
    }

    #[test]
    fn past_due_quick_add_stays_open_with_message() {
        let (mut app, _) = fresh();
        press(&mut app, &[KeyCode::Char('a')]);
        type_str(&mut app, "Too late");
        press(&mut app, &[KeyCode::Tab]);
        type_str(&mut app, "in -2d");
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.state, AppState::QuickAdd);
        assert!(app.store.tasks().is_empty());
        assert_eq!(app.status_message, "Error: Due date cannot be in the past");
    }

    #[test]
    fn delete_waits_for_confirmation() {
        let clock = TestClock::at(start());
        let mut store = Store::with_clock(MemoryStore::new(), clock);
        let today = store.today();
        store.quick_add_task("Keep me", today).unwrap();
        let mut app = app_with(store, Section::Tasks);

        press(&mut app, &[KeyCode::Char('d')]);
        assert_eq!(app.state, AppState::Confirm);
        press(&mut app, &[KeyCode::Char('n')]);
        assert_eq!(app.store.tasks().len(), 1);

        press(&mut app, &[KeyCode::Char('d'), KeyCode::Char('y')]);
        assert!(app.store.tasks().is_empty());
        assert!(app.views.tasks.is_empty());
        assert_eq!(app.task_table.selected(), None);
    }

    #[test]
    fn toggling_completion_refreshes_progress() {
        let clock = TestClock::at(start());
        let mut store = Store::with_clock(MemoryStore::new(), clock);
        let today = store.today();
        store.quick_add_task("One", today).unwrap();
        store.quick_add_task("Two", today).unwrap();
        let mut app = app_with(store, Section::Tasks);

        press(&mut app, &[KeyCode::Char(' ')]);
        assert_eq!(app.views.dashboard.completed_count, 1);
        assert_eq!(app.views.dashboard.progress_percent, 50);

        // Only active tasks remain visible after filtering.
        press(&mut app, &[KeyCode::Char('f')]);
        assert_eq!(app.views.tasks.len(), 1);
        assert!(!app.views.tasks.tasks[0].completed);
    }

    #[test]
    fn habit_day_toggle_uses_day_cursor() {
        let clock = TestClock::at(start());
        let mut store = Store::with_clock(MemoryStore::new(), clock);
        let (id, _) = store.add_habit(HabitDraft::new("Read", 1)).unwrap();
        let mut app = app_with(store, Section::Habits);

        press(&mut app, &[KeyCode::Right, KeyCode::Right, KeyCode::Char(' ')]);
        let habit = app.store.habit(id).unwrap();
        assert!(habit.days[2]);
        assert_eq!(app.views.habits.habits_achieved, 1);
        assert_eq!(app.views.dashboard.habit_goals_met, 1);
    }

    #[test]
    fn week_rollover_is_offered_on_startup() {
        let clock = TestClock::at(start());
        let mut store = Store::with_clock(MemoryStore::new(), clock.clone());
        assert!(store.propose_week_reset().unwrap().is_none());
        let (id, _) = store.add_habit(HabitDraft::new("Run", 3)).unwrap();
        store.toggle_habit_day(id, 0).unwrap();
        clock.advance(Duration::days(8));

        let mut app = app_with(store, Section::Habits);
        assert_eq!(app.state, AppState::Confirm);
        assert!(matches!(app.pending, Some(PendingConfirm::WeekReset(_))));

        press(&mut app, &[KeyCode::Char('y')]);
        assert_eq!(app.store.habit(id).unwrap().completed_count(), 0);
        assert_eq!(app.views.habits.habits[0].completed_count, 0);
    }

    #[test]
    fn declined_week_reset_keeps_progress() {
        let clock = TestClock::at(start());
        let mut store = Store::with_clock(MemoryStore::new(), clock.clone());
        store.propose_week_reset().unwrap();
        let (id, _) = store.add_habit(HabitDraft::new("Run", 3)).unwrap();
        store.toggle_habit_day(id, 0).unwrap();
        clock.advance(Duration::days(9));

        let mut app = app_with(store, Section::Dashboard);
        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.state, AppState::Browse);
        assert_eq!(app.store.habit(id).unwrap().completed_count(), 1);
    }

    #[test]
    fn theme_toggle_persists() {
        let (mut app, _) = fresh();
        press(&mut app, &[KeyCode::Char('t')]);
        assert_eq!(app.store.theme(), Theme::Dark);
        assert_eq!(app.palette(), Palette::for_theme(Theme::Dark));
    }

    #[test]
    fn resources_load_lazily_and_toggle_favorites() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(
            br#"[{"id": 1, "title": "Rust Book", "category": "Programming"},
                 {"id": 2, "title": "Khan Academy", "category": "Learning"}]"#,
        )
        .unwrap();
        let store = Store::with_clock(MemoryStore::new(), TestClock::at(start()));
        let mut app = App::new(store, CatalogSource::File(f.path().to_path_buf()), Section::Dashboard);
        assert_eq!(app.views.resources, ResourceView::NotLoaded);

        press(&mut app, &[KeyCode::Char('4')]);
        assert!(matches!(&app.views.resources, ResourceView::Entries(e) if e.len() == 2));

        press(&mut app, &[KeyCode::Char(' ')]);
        assert!(app.store.favorites().contains(&1));

        press(&mut app, &[KeyCode::Char('v')]);
        assert!(matches!(&app.views.resources, ResourceView::Entries(e) if e.len() == 1));

        press(&mut app, &[KeyCode::Char('v'), KeyCode::Char('/')]);
        type_str(&mut app, "khan");
        assert!(matches!(&app.views.resources, ResourceView::Entries(e) if e[0].resource.id == 2));
        press(&mut app, &[KeyCode::Esc]);
        assert!(matches!(&app.views.resources, ResourceView::Entries(e) if e.len() == 2));
    }

    #[test]
    fn failed_catalog_is_shown_as_failure() {
        let store = Store::with_clock(MemoryStore::new(), TestClock::at(start()));
        let app = app_with(store, Section::Resources);
        assert!(matches!(app.views.resources, ResourceView::Failed(_)));
    }

    #[test]
    fn reset_all_from_settings() {
        let clock = TestClock::at(start());
        let mut store = Store::with_clock(MemoryStore::new(), clock);
        let today = store.today();
        store.quick_add_task("Gone soon", today).unwrap();
        store.set_theme(Theme::Dark).unwrap();
        let mut app = app_with(store, Section::Settings);

        press(&mut app, &[KeyCode::Char('R'), KeyCode::Char('y')]);
        assert!(app.store.tasks().is_empty());
        assert_eq!(app.store.theme(), Theme::Light);
        assert_eq!(app.views.dashboard.total_count, 0);
    }

    #[test]
    fn renders_every_section() {
        let (mut app, _) = fresh();
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        for section in Section::ALL {
            app.enter_section(section);
            terminal.draw(|f| app.render(f)).unwrap();
        }
        press(&mut app, &[KeyCode::Char('?')]);
        terminal.draw(|f| app.render(f)).unwrap();
        press(&mut app, &[KeyCode::Esc, KeyCode::Char('q')]);
    }

    #[test]
    fn quit_only_from_browse() {
        let (mut app, _) = fresh();
        app.handle_key(KeyCode::Char('a'));
        assert!(!app.handle_key(KeyCode::Char('q')));
        app.handle_key(KeyCode::Esc);
        assert!(app.handle_key(KeyCode::Char('q')));
    }
}
