mod error;
mod persist;
mod store;
mod task;
mod ui;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::persist::{load_tasks, save_tasks, DEFAULT_DATA_FILE};
use crate::task::DEFAULT_CATEGORIES;
use crate::ui::App;

/// Personal to-do list with categories and JSON persistence.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path of the task file
    #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
    file: PathBuf,

    /// Preset categories offered when adding or editing a task
    #[arg(long, value_delimiter = ',', default_value = DEFAULT_CATEGORIES)]
    categories: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // A load failure aborts startup: starting empty would clobber the file
    // on the next save.
    let store = load_tasks(&args.file)
        .with_context(|| format!("failed to load tasks from {}", args.file.display()))?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, args.file, args.categories);
    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    save_tasks(&app.store, &app.data_file)
        .with_context(|| format!("failed to save tasks to {}", app.data_file.display()))?;

    result?;
    Ok(())
}
