mod app;
mod backend;
mod cli;
mod handlers;
mod palette;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use app::App;
use banter::Conversation;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use handlers::handle_key_event;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::EnvFilter;
use ui::ui;

use crate::backend::create_backend;
use crate::cli::Cli;

/// Log file name used when `--log-file` is not given.
const LOG_FILE: &str = "banter.log";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // The terminal belongs to the interface, so logs go to a file
    let log_path = match &cli.log_file {
        Some(path) => path.clone(),
        None => {
            let dir = cli.data_dir();
            std::fs::create_dir_all(&dir)?;
            dir.join(LOG_FILE)
        }
    };
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    let level = if cli.verbose { "banter=debug" } else { "banter=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let store = create_backend(&cli).await?;
    let chat = Conversation::open(store, cli.chat_config()).await;
    tracing::info!(
        entries = chat.entries().await.len(),
        theme = %chat.theme().await,
        "Conversation opened"
    );
    let mut app = App::new(chat.clone()).await;

    // Setup terminal for TUI
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Replies still in flight are dropped rather than written after exit
    chat.close();

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.refresh().await;
        terminal.draw(|f| ui(f, app))?;

        // Handle all available events first, then wait briefly
        let mut handled_event = false;

        // Process all available events without blocking
        while event::poll(std::time::Duration::from_millis(0))? {
            if let Ok(Event::Key(key)) = event::read() {
                handled_event = true;
                if key.kind == KeyEventKind::Press {
                    handle_key_event(app, key.code, key.modifiers).await;
                }
            }
        }

        if app.should_quit {
            break;
        }

        if !handled_event {
            // Small delay to prevent busy waiting; replies land in the background
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }
    }
    Ok(())
}
