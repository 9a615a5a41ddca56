//! Test fixtures: an in-process relay server and a raw TCP chat client.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use bytes::Bytes;
use futures_util::{sink::SinkExt, stream::StreamExt};
use parley_server::{
    Server, ServerConfig,
    domain::{Envelope, PeerRegistry},
    infrastructure::codec::{decode_envelope, encode_text, frame_codec},
    ui::state::AppState,
};
use tokio::{net::TcpStream, sync::oneshot, task::JoinHandle};
use tokio_util::codec::{Framed, LengthDelimitedCodec};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Relay server running on an ephemeral port for the duration of a test.
pub struct TestServer {
    address: SocketAddr,
    state: Arc<AppState>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..ServerConfig::default()
        };
        let server = Server::bind(&config).await.expect("Failed to bind server");
        let address = server.local_addr().expect("Failed to read local address");
        let state = server.state();
        let (shutdown, signal) = oneshot::channel::<()>();
        let task = tokio::spawn(server.serve_until(async {
            let _ = signal.await;
        }));

        Self {
            address,
            state,
            shutdown: Some(shutdown),
            task,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Names currently in the registry, ordered.
    pub async fn peer_names(&self) -> Vec<String> {
        self.state
            .registry
            .snapshot()
            .await
            .into_iter()
            .map(|peer| peer.name.into_string())
            .collect()
    }

    /// Wait until the registry holds exactly `expected`.
    pub async fn wait_for_peers(&self, expected: &[&str]) {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        loop {
            let names = self.peer_names().await;
            if names == expected {
                return;
            }
            if tokio::time::Instant::now() >= deadline {
                panic!("registry holds {names:?}, expected {expected:?}");
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Connect and claim `name`, without waiting for any reply.
    pub async fn connect(&self, name: &str) -> TestClient {
        TestClient::connect(self.address, name).await
    }

    /// Connect, claim `name` and consume the welcome listing.
    pub async fn join(&self, name: &str) -> TestClient {
        let mut client = self.connect(name).await;
        let welcome = client.recv().await;
        assert!(
            welcome.message().starts_with("Connected peers: "),
            "unexpected welcome for {name}: {welcome:?}"
        );
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.task.abort();
    }
}

/// A chat client speaking the raw framed protocol.
pub struct TestClient {
    framed: Framed<TcpStream, LengthDelimitedCodec>,
}

impl TestClient {
    pub async fn connect(address: SocketAddr, name: &str) -> Self {
        let stream = TcpStream::connect(address)
            .await
            .expect("Failed to connect to server");
        let mut framed = Framed::new(stream, frame_codec());
        framed
            .send(encode_text(name))
            .await
            .expect("Failed to send name");
        Self { framed }
    }

    /// Send one line of input.
    pub async fn send_line(&mut self, line: &str) {
        self.framed
            .send(encode_text(line))
            .await
            .expect("Failed to send line");
    }

    /// Send a raw frame payload.
    pub async fn send_raw(&mut self, payload: &'static [u8]) {
        self.framed
            .send(Bytes::from_static(payload))
            .await
            .expect("Failed to send frame");
    }

    /// Next envelope from the server.
    pub async fn recv(&mut self) -> Envelope {
        let frame = tokio::time::timeout(RECV_TIMEOUT, self.framed.next())
            .await
            .expect("Timed out waiting for an envelope")
            .expect("Connection closed while waiting for an envelope")
            .expect("Failed to read frame");
        decode_envelope(&frame).expect("Failed to decode envelope")
    }

    /// Next envelope, expected to be a `server` envelope; returns its text.
    pub async fn recv_server(&mut self) -> String {
        match self.recv().await {
            Envelope::Server { message, .. } => message,
            other => panic!("expected server envelope, got {other:?}"),
        }
    }

    /// Whether the server closed the connection (within the timeout).
    pub async fn is_closed(&mut self) -> bool {
        matches!(
            tokio::time::timeout(RECV_TIMEOUT, self.framed.next()).await,
            Ok(None) | Ok(Some(Err(_)))
        )
    }

    /// No envelope arrives within `wait`.
    pub async fn is_silent(&mut self, wait: Duration) -> bool {
        tokio::time::timeout(wait, self.framed.next()).await.is_err()
    }
}
