// crates/nim-client/tests/model_proxy.rs

use std::sync::{Arc, Mutex};

use nim_client::ModelProxy;
use nim_core::{ModelListener, Move, Notification, Request, ViewListener};
use nim_protocol::{decode_request, encode_notification, ConnectionError, ProtocolError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<Notification>>,
}

impl Recorder {
    fn push(&self, n: Notification) {
        self.seen.lock().unwrap().push(n);
    }

    fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.seen.lock().unwrap())
    }
}

impl ModelListener for Recorder {
    fn quit(&self) {
        self.push(Notification::Quit);
    }
    fn move_made(&self, piles: &[u8]) {
        self.push(Notification::MoveMade(piles.to_vec()));
    }
    fn waiting_for_other_player(&self) {
        self.push(Notification::WaitingForOtherPlayer);
    }
    fn my_turn(&self) {
        self.push(Notification::MyTurn);
    }
    fn other_turn(&self, player: &str) {
        self.push(Notification::OtherTurn(player.to_string()));
    }
    fn you_won(&self) {
        self.push(Notification::YouWon);
    }
    fn other_win(&self, player: &str) {
        self.push(Notification::OtherWin(player.to_string()));
    }
    fn new_game(&self, piles: &[u8]) {
        self.push(Notification::NewGame(piles.to_vec()));
    }
}

/// Connected (client, server-side) socket pair over loopback.
async fn socket_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (client, accepted) = tokio::join!(TcpStream::connect(addr), listener.accept());
    (client.unwrap(), accepted.unwrap().0)
}

fn decode_all(mut bytes: &[u8]) -> Vec<Request> {
    let mut out = Vec::new();
    while let Some((req, used)) = decode_request(bytes).unwrap() {
        out.push(req);
        bytes = &bytes[used..];
    }
    assert!(bytes.is_empty(), "trailing bytes: {:?}", bytes);
    out
}

#[tokio::test]
async fn calls_are_written_in_order() {
    let (client, mut server) = socket_pair().await;
    let (proxy, _dispatcher) = ModelProxy::new(client);

    proxy.join("alice");
    proxy.move_request(Move::new(0, 1, 2));
    proxy.new_game();
    proxy.quit();
    proxy.close();

    let mut received = Vec::new();
    server.read_to_end(&mut received).await.unwrap();

    assert_eq!(
        decode_all(&received),
        vec![
            Request::Join {
                name: "alice".to_string()
            },
            Request::MoveRequest(Move::new(0, 1, 2)),
            Request::NewGame,
            Request::Quit,
        ]
    );
}

#[tokio::test]
async fn notifications_reach_listener_then_quit_on_close() {
    let (client, mut server) = socket_pair().await;
    let (_proxy, dispatcher) = ModelProxy::new(client);

    let sent = vec![
        Notification::NewGame(vec![3, 4, 5]),
        Notification::OtherTurn("bob".to_string()),
        Notification::MoveMade(vec![4, 5]),
        Notification::MyTurn,
    ];
    let mut bytes = Vec::new();
    for n in &sent {
        encode_notification(n, &mut bytes).unwrap();
    }
    // One byte at a time exercises partial reads.
    for b in &bytes {
        server.write_all(std::slice::from_ref(b)).await.unwrap();
    }
    server.shutdown().await.unwrap();

    let recorder = Arc::new(Recorder::default());
    let listener: Arc<dyn ModelListener> = recorder.clone();
    dispatcher.run(listener).await.unwrap();

    let mut expected = sent;
    expected.push(Notification::Quit);
    assert_eq!(recorder.take(), expected);
}

#[tokio::test]
async fn unknown_opcode_ends_dispatch_with_quit() {
    let (client, mut server) = socket_pair().await;
    let (_proxy, dispatcher) = ModelProxy::new(client);

    let mut bytes = Vec::new();
    encode_notification(&Notification::WaitingForOtherPlayer, &mut bytes).unwrap();
    bytes.push(b'Z');
    server.write_all(&bytes).await.unwrap();

    let recorder = Arc::new(Recorder::default());
    let listener: Arc<dyn ModelListener> = recorder.clone();
    let result = dispatcher.run(listener).await;

    assert!(matches!(
        result,
        Err(ConnectionError::Protocol(ProtocolError::UnknownOpcode(b'Z')))
    ));
    assert_eq!(
        recorder.take(),
        vec![Notification::WaitingForOtherPlayer, Notification::Quit]
    );

    // The client closes its side once dispatch stops.
    let mut rest = Vec::new();
    server.read_to_end(&mut rest).await.unwrap();
    assert!(rest.is_empty());
}

#[tokio::test]
async fn eof_inside_a_message_is_an_error() {
    let (client, mut server) = socket_pair().await;
    let (_proxy, dispatcher) = ModelProxy::new(client);

    // OTHER_TURN announcing a 5-byte name, but only 2 bytes follow.
    server.write_all(&[b'U', 0, 5, b'b', b'o']).await.unwrap();
    server.shutdown().await.unwrap();

    let recorder = Arc::new(Recorder::default());
    let listener: Arc<dyn ModelListener> = recorder.clone();
    let result = dispatcher.run(listener).await;

    assert!(matches!(result, Err(ConnectionError::ClosedMidMessage(5))));
    assert_eq!(recorder.take(), vec![Notification::Quit]);
}
