//! TUI module for interactive disk usage exploration.

pub mod app;
pub mod event;
pub mod ui;

pub use app::App;

use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::config::Config;
use crate::error::Result;
use crate::explorer::Explorer;

/// Run the interactive explorer rooted at `root`.
pub fn run(root: PathBuf, config: &Config) -> Result<()> {
    let explorer = Arc::new(Explorer::new(config)?);
    let (tx, rx) = mpsc::channel();

    let mut app = App::new(explorer, root.clone(), tx);
    app.enter(root);

    let mut terminal = setup_terminal().map_err(|e| crate::error::SpelunkError::Io {
        path: PathBuf::from("<terminal>"),
        source: e,
    })?;

    let result = run_loop(&mut terminal, &mut app, rx);

    restore_terminal(&mut terminal).ok();
    result.map_err(|e| crate::error::SpelunkError::Io {
        path: PathBuf::from("<terminal>"),
        source: e,
    })
}

fn run_loop(
    terminal: &mut Terminal<impl Backend>,
    app: &mut App,
    rx: mpsc::Receiver<app::Update>,
) -> io::Result<()> {
    while !app.should_quit {
        // Drain anything the workers finished since the last frame
        while let Ok(update) = rx.try_recv() {
            app.apply(update);
        }

        terminal.draw(|frame| ui::render(app, frame))?;

        // Short poll keeps progress sampling live while scans run
        event::handle_events(app, Duration::from_millis(100))?;
    }
    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}
