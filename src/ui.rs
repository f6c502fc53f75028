use crossterm::{
    event::{self, Event, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use tracing::error;

use crate::persist::save_tasks;
use crate::store::{Filter, TaskStore};
use crate::task::Task;

pub struct App {
    pub store: TaskStore,
    pub filter: Filter,
    pub data_file: PathBuf,
    pub categories: Vec<String>,
    message: String,
}

impl App {
    pub fn new(store: TaskStore, data_file: PathBuf, categories: Vec<String>) -> Self {
        Self {
            store,
            filter: Filter::default(),
            data_file,
            categories,
            message: String::new(),
        }
    }

    // Called after every mutating action; a failed save is reported in the
    // footer and the session continues.
    fn save(&mut self) {
        if let Err(err) = save_tasks(&self.store, &self.data_file) {
            error!(%err, path = %self.data_file.display(), "save failed");
            self.message = format!("Failed to save tasks: {}", err);
        }
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()), // Quit
                KeyCode::Char('a') => add_task(app),
                KeyCode::Char('e') => edit_task(app),
                KeyCode::Char('c') => complete_task(app),
                KeyCode::Char('d') => delete_task(app),
                KeyCode::Char('f') => filter_category(app),
                KeyCode::Char('s') => {
                    app.filter.status = app.filter.status.next();
                    app.message.clear();
                }
                _ => {}
            }
        }
    }
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(1), Constraint::Length(3)])
        .split(f.area());

    let visible = app.store.filtered(&app.filter);
    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, t)| task_line(i + 1, t))
        .collect();

    let title = match &app.filter.category {
        Some(cat) => format!("Tasks ({} / {})", cat, app.filter.status.label()),
        None => format!("Tasks ({})", app.filter.status.label()),
    };
    let list = List::new(items).block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(list, chunks[0]);

    let footer_text = if app.message.is_empty() {
        "a add  e edit  c complete  d delete  f category  s status  q quit".to_string()
    } else {
        app.message.clone()
    };
    let footer = Paragraph::new(footer_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[1]);
}

fn task_line(ordinal: usize, task: &Task) -> ListItem<'static> {
    let status_style = if task.completed {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let mut spans = vec![
        Span::raw(format!("{:>3}. ", ordinal)),
        Span::styled(
            task.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" [{}] ", task.category)),
        Span::styled(task.status_label().to_string(), status_style),
    ];
    if !task.description.is_empty() {
        spans.push(Span::raw(format!("  {}", task.description)));
    }
    ListItem::new(Line::from(spans))
}

fn add_task(app: &mut App) {
    let Some(title) = prompt("Title") else { return };
    let Some(description) = prompt("Description") else { return };
    let category = prompt_category(&app.categories).unwrap_or_default();
    match app.store.add(&title, &description, &category) {
        Ok(()) => {
            app.message = "Task added.".to_string();
            app.save();
        }
        Err(err) => app.message = err.to_string(),
    }
}

fn edit_task(app: &mut App) {
    let Some(id) = select(app, "edit") else { return };
    let current = match app.store.get(id) {
        Some(task) => task.clone(),
        None => return,
    };
    let new_title = prompt(&format!("New title (blank keeps '{}')", current.title));
    let new_description = prompt("New description (blank keeps current)");
    let change = prompt(&format!("Current category: {}. Change it? (y/N)", current.category))
        .map(|answer| answer.eq_ignore_ascii_case("y"))
        .unwrap_or(false);
    let category = if change {
        // Blank menu input keeps the current category on edit.
        match prompt_category(&app.categories) {
            Some(cat) if !cat.is_empty() => cat,
            _ => current.category.clone(),
        }
    } else {
        current.category.clone()
    };
    match app
        .store
        .edit(id, new_title.as_deref(), new_description.as_deref(), &category)
    {
        Ok(()) => {
            app.message = "Task updated.".to_string();
            app.save();
        }
        Err(err) => app.message = err.to_string(),
    }
}

fn complete_task(app: &mut App) {
    let Some(id) = select(app, "complete") else { return };
    match app.store.complete(id) {
        Ok(()) => {
            app.message = "Task marked as completed.".to_string();
            app.save();
        }
        Err(err) => app.message = err.to_string(),
    }
}

fn delete_task(app: &mut App) {
    let Some(id) = select(app, "delete") else { return };
    match app.store.delete(id) {
        Ok(task) => {
            app.message = format!("Deleted: {}", task.title);
            app.save();
        }
        Err(err) => app.message = err.to_string(),
    }
}

fn filter_category(app: &mut App) {
    let Some(input) = prompt("Category to filter by (blank shows all)") else {
        return;
    };
    app.filter.category = if input.is_empty() { None } else { Some(input) };
    app.message.clear();
}

// Ordinal selection against the currently displayed (filtered) list.
fn select(app: &mut App, what: &str) -> Option<u32> {
    if app.store.filtered(&app.filter).is_empty() {
        app.message = "No tasks to select.".to_string();
        return None;
    }
    let input = prompt(&format!("Task number to {}", what))?;
    match app.store.select_by_ordinal(&input, &app.filter) {
        Ok(id) => Some(id),
        Err(err) => {
            app.message = err.to_string();
            None
        }
    }
}

fn prompt_category(presets: &[String]) -> Option<String> {
    let mut lines = vec!["Select a category:".to_string()];
    for (i, category) in presets.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, category));
    }
    lines.push(format!(
        "Enter choice (1-{}), or type a new category",
        presets.len()
    ));
    let input = prompt(&lines.join("\n"))?;
    if let Ok(n) = input.parse::<usize>() {
        if n >= 1 && n <= presets.len() {
            return Some(presets[n - 1].clone());
        }
    }
    Some(input)
}

fn prompt(message: &str) -> Option<String> {
    disable_raw_mode().ok();
    println!("{}", message);
    let mut input = String::new();
    let result = if io::stdin().read_line(&mut input).is_ok() {
        Some(input.trim().to_string())
    } else {
        None
    };
    enable_raw_mode().ok();
    result
}
