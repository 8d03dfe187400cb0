use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod app;
mod cli;
mod config;
mod error;
mod feed;
mod models;
mod store;
mod tui;

use app::App;
use cli::Cli;
use config::Config;
use error::Result;
use feed::Aggregator;
use store::RecordStore;
use tui::{draw, handle_key_event, InputMode};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration; a broken file only matters if the store ends up unconfigured
    let (config, config_error) = Config::load();
    let aggregator = Aggregator::from_config(&config).map_err(|e| config_error.unwrap_or(e));

    // Headless: fetch once, print, exit
    if cli.is_headless() {
        let result = match aggregator {
            Ok(aggregator) => cli::run_headless(&cli, &aggregator, &mut io::stdout().lock()).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut app = App::new(&config, aggregator.map_err(|e| e.user_message()));
    app.start_fetch();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app<B, S>(terminal: &mut Terminal<B>, app: &mut App<S>) -> Result<()>
where
    B: Backend,
    S: RecordStore + 'static,
{
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Advance spinner animation
        app.state.tick_spinner();

        // Poll for completed fetches
        app.poll_fetch_result();

        // Poll for events with timeout so background fetches can land
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let mode = InputMode {
                        show_help: app.show_help,
                        search_active: app.search_active,
                        detail_open: app.state.opened().is_some(),
                    };
                    if let Some(action) = handle_key_event(key, mode) {
                        if app.handle_action(action) {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
