//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections.
//! - Assigns each connection a `PlayerId`.
//! - Pairs connections two at a time into one `SharedGame`.
//! - Spawns a per-connection task running that player's dispatch loop.
//!
//! A connection that fails only ends its own session; the accept loop
//! keeps going.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use nim_core::{PileSet, PlayerId, SharedGame};
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::view_proxy::ViewProxy;

/// Global-ish counter for assigning unique `PlayerId`s.
static NEXT_PLAYER_ID: AtomicU64 = AtomicU64::new(1);

fn next_player_id() -> PlayerId {
    PlayerId(NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed))
}

/// Sequential pairing of connections into games.
///
/// The first connection creates a game and leaves it pending; the next
/// connection joins that game and clears the slot. A pending game whose
/// lone player already quit is replaced rather than joined.
#[derive(Debug)]
pub struct SessionAcceptor {
    piles: PileSet,
    pending: Option<SharedGame>,
}

impl SessionAcceptor {
    pub fn new(piles: PileSet) -> Self {
        SessionAcceptor {
            piles,
            pending: None,
        }
    }

    /// Game the next connection should be attached to.
    pub fn assign(&mut self) -> SharedGame {
        match self.pending.take() {
            Some(game) if !game.is_finished() => game,
            _ => {
                let game = SharedGame::new(self.piles.clone());
                self.pending = Some(game.clone());
                game
            }
        }
    }
}

/// A bound, not yet running, Nim server.
pub struct NimServer {
    listener: TcpListener,
    acceptor: SessionAcceptor,
}

impl NimServer {
    /// Bind to the configured address.
    pub async fn bind(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;

        let addr = config.socket_addr_string();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("binding {}", addr))?;

        Ok(Self::from_listener(listener, config.pile_set()))
    }

    /// Serve on an already-bound listener.
    pub fn from_listener(listener: TcpListener, piles: PileSet) -> Self {
        NimServer {
            listener,
            acceptor: SessionAcceptor::new(piles),
        }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever.
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("Listening on {}", self.local_addr()?);

        loop {
            match self.listener.accept().await {
                Ok((stream, peer_addr)) => self.admit(stream, peer_addr),
                Err(e) => warn!("accept failed: {}", e),
            }
        }
    }

    fn admit(&mut self, stream: TcpStream, peer_addr: SocketAddr) {
        let id = next_player_id();
        let game = self.acceptor.assign();
        info!(player = %id, %peer_addr, "accepted connection");

        let (proxy, dispatcher) = ViewProxy::new(id, stream);
        let seat = Arc::new(game.seat(id, proxy));

        tokio::spawn(async move {
            match dispatcher.run(seat).await {
                Ok(()) => info!(player = %id, "disconnected"),
                Err(e) => error!(player = %id, "connection ended: {}", e),
            }
        });
    }
}

/// Bind and run the server with the given configuration.
pub async fn run(config: Config) -> anyhow::Result<()> {
    NimServer::bind(&config).await?.run().await
}
