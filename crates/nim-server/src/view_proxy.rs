// crates/nim-server/src/view_proxy.rs
//
// Server side of one player connection.

use std::io;
use std::sync::Arc;

use bytes::{Buf, BytesMut};
use nim_core::{ModelListener, Notification, PlayerId, Request, ViewListener};
use nim_protocol::{decode_request, encode_notification, ConnectionError};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::types::{OutboundRx, OutboundTx, WriterCommand};

/// Remote stand-in for a player's view.
///
/// Engine notifications are queued to this connection's writer task, so
/// calling into a `ViewProxy` never waits on the socket.
#[derive(Debug)]
pub struct ViewProxy {
    id: PlayerId,
    tx: OutboundTx,
}

/// Inbound half of a player connection: decodes requests and hands them
/// to a [`ViewListener`].
///
/// Also stops when the connection's writer reports a failed write.
#[derive(Debug)]
pub struct RequestDispatcher {
    id: PlayerId,
    read_stream: OwnedReadHalf,
    buffer: BytesMut,
    tx: OutboundTx,
    write_failed: oneshot::Receiver<io::Error>,
}

impl ViewProxy {
    /// Take ownership of `stream` and spawn its writer task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(id: PlayerId, stream: TcpStream) -> (Arc<ViewProxy>, RequestDispatcher) {
        if let Err(e) = stream.set_nodelay(true) {
            warn!(player = %id, "could not disable Nagle: {}", e);
        }

        let (read_stream, write_stream) = stream.into_split();
        wire(id, read_stream, write_stream)
    }

    fn send(&self, msg: Notification) {
        if self.tx.send(WriterCommand::Send(msg)).is_err() {
            debug!(player = %self.id, "connection closed, notification dropped");
        }
    }
}

impl ModelListener for ViewProxy {
    fn quit(&self) {
        self.send(Notification::Quit);
    }

    fn move_made(&self, piles: &[u8]) {
        self.send(Notification::MoveMade(piles.to_vec()));
    }

    fn waiting_for_other_player(&self) {
        self.send(Notification::WaitingForOtherPlayer);
    }

    fn my_turn(&self) {
        self.send(Notification::MyTurn);
    }

    fn other_turn(&self, player: &str) {
        self.send(Notification::OtherTurn(player.to_string()));
    }

    fn you_won(&self) {
        self.send(Notification::YouWon);
    }

    fn other_win(&self, player: &str) {
        self.send(Notification::OtherWin(player.to_string()));
    }

    fn new_game(&self, piles: &[u8]) {
        self.send(Notification::NewGame(piles.to_vec()));
    }
}

impl RequestDispatcher {
    /// Run the dispatch loop until the connection ends.
    ///
    /// Whatever the reason the loop stops, `listener` is told the player
    /// quit and the connection is closed before returning. A clean close
    /// by the peer is `Ok(())`.
    pub async fn run(mut self, listener: Arc<dyn ViewListener>) -> Result<(), ConnectionError> {
        let result = self.dispatch(listener.as_ref()).await;

        listener.quit();
        let _ = self.tx.send(WriterCommand::Close);

        result
    }

    async fn dispatch(&mut self, listener: &dyn ViewListener) -> Result<(), ConnectionError> {
        while let Some(request) = self.next_request().await? {
            debug!(player = %self.id, ?request, "request");
            request.deliver(listener);
        }
        Ok(())
    }

    /// Wait for the next complete request; `None` on clean end of stream.
    async fn next_request(&mut self) -> Result<Option<Request>, ConnectionError> {
        loop {
            if let Some((request, used)) = decode_request(&self.buffer)? {
                self.buffer.advance(used);
                return Ok(Some(request));
            }

            let read = tokio::select! {
                read = self.read_stream.read_buf(&mut self.buffer) => read?,
                failed = &mut self.write_failed => {
                    return Err(ConnectionError::Io(failed.unwrap_or_else(|_| {
                        io::Error::new(io::ErrorKind::BrokenPipe, "writer stopped")
                    })));
                }
            };

            if read == 0 {
                return if self.buffer.is_empty() {
                    Ok(None)
                } else {
                    Err(ConnectionError::ClosedMidMessage(self.buffer.len()))
                };
            }
        }
    }
}

/// Connect a read half and a write half into a proxy/dispatcher pair and
/// spawn the writer task.
fn wire<W>(
    id: PlayerId,
    read_stream: OwnedReadHalf,
    write_stream: W,
) -> (Arc<ViewProxy>, RequestDispatcher)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();
    let (failed_tx, write_failed) = oneshot::channel();

    tokio::spawn(run_writer(id, write_stream, rx, failed_tx));

    let proxy = Arc::new(ViewProxy { id, tx: tx.clone() });
    let dispatcher = RequestDispatcher {
        id,
        read_stream,
        buffer: BytesMut::with_capacity(256),
        tx,
        write_failed,
    };
    (proxy, dispatcher)
}

/// Writer task: encode queued notifications and write each with its own flush.
///
/// A failed write is reported to the dispatcher through `failed`.
async fn run_writer<W>(
    id: PlayerId,
    mut write_stream: W,
    rx: OutboundRx,
    failed: oneshot::Sender<io::Error>,
) where
    W: AsyncWrite + Unpin,
{
    if let Err(e) = write_queued(id, &mut write_stream, rx).await {
        warn!(player = %id, "write error: {}", e);
        let _ = failed.send(e);
    }

    if let Err(e) = write_stream.shutdown().await {
        debug!(player = %id, "shutdown: {}", e);
    }
}

async fn write_queued<W>(id: PlayerId, write_stream: &mut W, mut rx: OutboundRx) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut payload = Vec::with_capacity(64);

    while let Some(cmd) = rx.recv().await {
        let msg = match cmd {
            WriterCommand::Send(msg) => msg,
            WriterCommand::Close => break,
        };

        payload.clear();
        if let Err(e) = encode_notification(&msg, &mut payload) {
            error!(player = %id, ?msg, "encode error: {}", e);
            continue;
        }

        write_stream.write_all(&payload).await?;
        write_stream.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use nim_core::Move;
    use tokio::net::TcpListener;
    use tokio::time::timeout;

    use super::*;

    #[derive(Default)]
    struct CountQuits(AtomicUsize);

    impl ViewListener for CountQuits {
        fn join(&self, _name: &str) {}
        fn move_request(&self, _mv: Move) {}
        fn new_game(&self) {}
        fn quit(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn failed_write_ends_dispatch_with_quit() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (peer, accepted) = tokio::join!(TcpStream::connect(addr), listener.accept());
        let _peer = peer.unwrap();
        let (read_stream, _unused_write) = accepted.unwrap().0.into_split();

        // Writes into a duplex whose other end is gone fail with BrokenPipe.
        let (gone, write_stream) = tokio::io::duplex(64);
        drop(gone);

        let (proxy, dispatcher) = wire(PlayerId(7), read_stream, write_stream);
        proxy.my_turn();

        let quits = Arc::new(CountQuits::default());
        let result = timeout(Duration::from_secs(5), dispatcher.run(quits.clone()))
            .await
            .expect("dispatcher kept waiting on a healthy read side");

        assert!(matches!(result, Err(ConnectionError::Io(_))));
        assert_eq!(quits.0.load(Ordering::SeqCst), 1);
    }
}
