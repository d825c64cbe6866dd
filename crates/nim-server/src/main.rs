//! Binary TCP server for networked Nim.

use anyhow::Result;
use clap::Parser;
use nim_server::config::Config;
use nim_server::server;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "nim-server")]
#[clap(about = "Pairs incoming players into two-player Nim games")]
struct Cli {
    /// Host or interface to bind (overrides NIM_HOST)
    host: Option<String>,

    /// TCP port to listen on (overrides NIM_PORT)
    port: Option<u16>,

    /// Starting pile sizes, e.g. `3 4 5` (overrides NIM_PILES)
    piles: Vec<u8>,

    /// Log game narration
    #[clap(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(self, mut config: Config) -> Config {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if !self.piles.is_empty() {
            config.piles = self.piles;
        }
        config.verbose |= self.verbose;
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.apply(Config::from_env()?);

    let default_level = if config.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    eprintln!(
        "Starting nim-server on {} (piles = {:?})",
        config.socket_addr_string(),
        config.piles
    );

    server::run(config).await
}
