// crates/nim-client/src/main.rs

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use nim_client::{Command, CommandError, ModelProxy, NimView, ViewEvent};
use nim_core::{ModelListener, ViewListener};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "nim-client")]
#[clap(about = "Play Nim against another player over the network")]
struct Cli {
    /// Server host name
    host: String,

    /// Server port
    port: u16,

    /// Name shown to your opponent
    name: String,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let stream = TcpStream::connect((cli.host.as_str(), cli.port))
        .await
        .with_context(|| format!("connecting to {}:{}", cli.host, cli.port))?;
    info!("Connected to {}:{}", cli.host, cli.port);

    let (events_tx, events) = mpsc::unbounded_channel();
    let view = Arc::new(NimView::new(events_tx));
    let (proxy, dispatcher) = ModelProxy::new(stream);

    let listener: Arc<dyn ModelListener> = view.clone();
    let reader = tokio::spawn(dispatcher.run(listener));

    proxy.join(&cli.name);
    play(&view, &proxy, events).await?;

    proxy.close();
    match reader.await? {
        Ok(()) => info!("disconnected"),
        Err(e) => error!("connection ended: {}", e),
    }
    Ok(())
}

/// Feed stdin commands to the server until the session ends.
async fn play(
    view: &NimView,
    proxy: &ModelProxy,
    mut events: mpsc::UnboundedReceiver<ViewEvent>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(ViewEvent::Won) => proxy.quit(),
                Some(ViewEvent::Quit) | None => return Ok(()),
            },

            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => handle_line(&line, view, proxy),
                None => {
                    stdin_open = false;
                    proxy.quit();
                }
            },
        }
    }
}

fn handle_line(line: &str, view: &NimView, proxy: &ModelProxy) {
    match line.parse::<Command>() {
        Ok(Command::Help) => view.print_help(),
        Ok(Command::Quit) => proxy.quit(),
        Ok(Command::NewGame) => proxy.new_game(),
        Ok(Command::Move(mv)) if view.is_my_turn() => {
            view.end_turn();
            proxy.move_request(mv);
        }
        Ok(Command::Move(_)) => view.say("It is not your turn."),
        Err(CommandError::Empty) => {}
        Err(e) => view.say(&e.to_string()),
    }
}
