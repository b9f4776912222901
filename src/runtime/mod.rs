use std::env;
use std::path::PathBuf;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::Action;
use crate::logging;
use crate::playback::RodioOutput;

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();
    let _log_guard = logging::init(&settings)?;
    if let Some(msg) = config_warning {
        warn!("{msg}");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "cadence starting");

    let args: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();

    let output = RodioOutput::open()?;
    let mut app = startup::build_app(&settings, output, &args);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app);

    app.dispatch(Action::SessionEnd);
    app.dispatch(Action::Teardown);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("cadence stopped");
    run_result
}
