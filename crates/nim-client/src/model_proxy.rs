// crates/nim-client/src/model_proxy.rs

use std::io;
use std::sync::Arc;

use bytes::{Buf, BytesMut};
use nim_core::{ModelListener, Move, Notification, Request, ViewListener};
use nim_protocol::{decode_notification, encode_request, ConnectionError};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::types::{OutboundRx, OutboundTx, WriterCommand};

/// Client-side stand-in for the game running on the server.
///
/// Every [`ViewListener`] call becomes one encoded request, written and
/// flushed in call order by a background writer task.
#[derive(Debug)]
pub struct ModelProxy {
    tx: OutboundTx,
}

/// Receive loop for server notifications. Ends on end of stream, a bad
/// message, or a failed write.
#[derive(Debug)]
pub struct NotificationDispatcher {
    read_stream: OwnedReadHalf,
    buffer: BytesMut,
    tx: OutboundTx,
    write_failed: oneshot::Receiver<io::Error>,
}

impl ModelProxy {
    /// Wrap a connected stream. Must be called inside a tokio runtime.
    pub fn new(stream: TcpStream) -> (Arc<ModelProxy>, NotificationDispatcher) {
        if let Err(e) = stream.set_nodelay(true) {
            warn!("could not disable Nagle: {}", e);
        }

        let (read_stream, write_stream) = stream.into_split();
        wire(read_stream, write_stream)
    }

    /// Stop sending; the server sees end of stream once queued requests
    /// are flushed.
    pub fn close(&self) {
        let _ = self.tx.send(WriterCommand::Close);
    }

    fn send(&self, req: Request) {
        if self.tx.send(WriterCommand::Send(req)).is_err() {
            debug!("connection closed, request dropped");
        }
    }
}

impl ViewListener for ModelProxy {
    fn join(&self, name: &str) {
        self.send(Request::Join {
            name: name.to_string(),
        });
    }

    fn move_request(&self, mv: Move) {
        self.send(Request::MoveRequest(mv));
    }

    fn new_game(&self) {
        self.send(Request::NewGame);
    }

    fn quit(&self) {
        self.send(Request::Quit);
    }
}

impl NotificationDispatcher {
    /// Deliver notifications to `listener` until the connection ends.
    ///
    /// `listener.quit()` is always called on the way out, even if the
    /// server already sent QUIT.
    pub async fn run(mut self, listener: Arc<dyn ModelListener>) -> Result<(), ConnectionError> {
        let result = self.dispatch(listener.as_ref()).await;

        listener.quit();
        let _ = self.tx.send(WriterCommand::Close);

        result
    }

    async fn dispatch(&mut self, listener: &dyn ModelListener) -> Result<(), ConnectionError> {
        while let Some(msg) = self.next_notification().await? {
            debug!(?msg, "notification");
            msg.deliver(listener);
        }
        Ok(())
    }

    async fn next_notification(&mut self) -> Result<Option<Notification>, ConnectionError> {
        loop {
            if let Some((msg, used)) = decode_notification(&self.buffer)? {
                self.buffer.advance(used);
                return Ok(Some(msg));
            }

            let read = tokio::select! {
                read = self.read_stream.read_buf(&mut self.buffer) => read?,
                failed = &mut self.write_failed => {
                    let e = failed.unwrap_or_else(|_| io::ErrorKind::BrokenPipe.into());
                    return Err(ConnectionError::Io(e));
                }
            };

            if read == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Err(ConnectionError::ClosedMidMessage(self.buffer.len()));
            }
        }
    }
}

fn wire<W>(
    read_stream: OwnedReadHalf,
    write_stream: W,
) -> (Arc<ModelProxy>, NotificationDispatcher)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();
    let (failed_tx, write_failed) = oneshot::channel();

    tokio::spawn(run_writer(write_stream, rx, failed_tx));

    let proxy = Arc::new(ModelProxy { tx: tx.clone() });
    let dispatcher = NotificationDispatcher {
        read_stream,
        buffer: BytesMut::with_capacity(256),
        tx,
        write_failed,
    };
    (proxy, dispatcher)
}

async fn run_writer<W>(
    mut write_stream: W,
    mut rx: OutboundRx,
    failed: oneshot::Sender<io::Error>,
) where
    W: AsyncWrite + Unpin,
{
    let mut payload = Vec::with_capacity(64);

    while let Some(WriterCommand::Send(req)) = rx.recv().await {
        payload.clear();
        if let Err(e) = encode_request(&req, &mut payload) {
            error!(?req, "encode error: {}", e);
            continue;
        }

        let written = match write_stream.write_all(&payload).await {
            Ok(()) => write_stream.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            warn!("write error: {}", e);
            let _ = failed.send(e);
            break;
        }
    }

    if let Err(e) = write_stream.shutdown().await {
        debug!("shutdown: {}", e);
    }
}
