//! Terminal UI.
//!
//! Elm-style loop in [`app::AppState`]: input and backend events are turned
//! into actions, actions mutate state, state is rendered every frame.

pub mod app;
pub mod events;
pub mod layout;
pub mod services;
pub mod theme;
pub mod views;
pub mod widgets;

use std::io;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::core::pipeline::AnalysisPipeline;
use crate::core::session::SessionState;
use app::AppState;
use services::Services;

/// Set up the terminal, run the app until it quits, restore the terminal.
pub async fn run(
    pipeline: AnalysisPipeline,
    session: SessionState,
    export_dir: std::path::PathBuf,
    initial_pdf: Option<String>,
    tick_rate: Duration,
) -> io::Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let services = Services::new(pipeline, export_dir, event_tx);
    let mut app = AppState::new(event_rx, services, session, initial_pdf);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal, tick_rate).await;

    // Restore even when the loop failed.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
