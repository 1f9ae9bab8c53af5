use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{bail, Result};
use clap::Parser;
use chatbox_core::{logging, Config, HttpChatBackend};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "chatbox")]
#[command(version, about = "Terminal chat client for a /chat endpoint")]
struct Cli {
    /// Base URL of the chat backend (requests go to <URL>/chat)
    #[arg(short, long, env = "CHATBOX_ENDPOINT")]
    endpoint: Option<String>,

    /// Write diagnostics here instead of the default cache location
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Remember the effective endpoint in the config file
    #[arg(long)]
    save_endpoint: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::new(), Some(e)),
    };

    let log_path = match cli.log_file.or_else(|| config.log_file.clone()) {
        Some(path) => path,
        None => logging::default_log_path()?,
    };
    logging::configure_logging(&log_path)?;
    if let Some(e) = &config_error {
        tracing::warn!(error = %e, "config file unreadable, using defaults");
    }

    let endpoint = config.resolve_endpoint(cli.endpoint.as_deref());
    let backend = HttpChatBackend::new(&endpoint)?;
    tracing::info!(url = %backend.url(), "starting chatbox");

    if cli.save_endpoint {
        if let Some(e) = config_error {
            bail!("not saving endpoint, existing config file is unreadable: {e}");
        }
        Config::save_endpoint(&endpoint)?;
    }

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, Arc::new(backend), endpoint).await;

    tui::restore()?;
    if let Err(e) = &result {
        tracing::error!(error = %e, "chatbox exited with an error");
    }
    result
}

async fn run(terminal: &mut tui::Tui, backend: Arc<HttpChatBackend>, endpoint: String) -> Result<()> {
    let mut events = EventHandler::new();
    let mut app = App::new(backend, endpoint, events.sender());

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(&mut app, event)?,
            None => break,
        }
    }

    Ok(())
}
