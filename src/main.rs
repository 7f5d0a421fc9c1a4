mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use voicedesk::app::App;
use voicedesk::config;
use voicedesk::conversation::scripted::ScriptedClient;
use voicedesk::event::AppEvent;
use voicedesk::io::{Io, STATUS_POLL_INTERVAL};

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    install_panic_hook();
    let cli = Cli::parse();
    voicedesk::logging::init();

    // Without credentials there is nothing to show: fail before touching the terminal.
    let config = config::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!(agent_id = %config.agent_id, "configuration loaded");

    let client = Arc::new(ScriptedClient::new(config.api_key.clone(), cli.script));
    let (app_tx, app_rx) = mpsc::unbounded_channel();
    let mut io = create_live_io(app_rx);
    let app = App::new(&config, client, app_tx, std::io::stdout());
    app.run(&mut io, true).await?;
    Ok(())
}

/// Install a panic hook that restores terminal state before printing the panic.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        crossterm::terminal::disable_raw_mode().ok();
        default_hook(info);
    }));
}

/// Create a live `Io` for production use.
///
/// Spawns a background task that reads crossterm events and forwards them
/// to the terminal event channel.
fn create_live_io(app_rx: mpsc::UnboundedReceiver<AppEvent>) -> Io {
    use crossterm::event::EventStream;
    use futures::StreamExt;

    let (term_tx, term_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut stream = EventStream::new();
        while let Some(Ok(event)) = stream.next().await {
            if term_tx.send(event).is_err() {
                return;
            }
        }
    });

    Io::new(app_rx, term_rx, STATUS_POLL_INTERVAL)
}
