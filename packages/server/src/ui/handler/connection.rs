//! Per-connection handler.
//!
//! ```text
//!  socket read half ──frames──> handshake ──> read loop ──> CommandDispatcher
//!  socket write half <──frames── writer task <── PeerOutbound (unbounded queue)
//! ```
//!
//! The handler owns both halves of the socket. The registry only holds the
//! queue's sending side, so dropping the last sender closes the socket.

use std::{net::SocketAddr, sync::Arc};

use bytes::Bytes;
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::{
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::mpsc,
};
use tokio_util::codec::{FramedRead, FramedWrite, LengthDelimitedCodec};

use crate::{
    domain::{Command, Envelope, Peer, PeerName, PeerOutbound},
    infrastructure::codec::{decode_text, encode_envelope, frame_codec},
    ui::state::AppState,
    usecase::{ConnectError, Flow},
};

type FrameReader = FramedRead<OwnedReadHalf, LengthDelimitedCodec>;
type FrameWriter = FramedWrite<OwnedWriteHalf, LengthDelimitedCodec>;

/// Run one client connection from handshake to teardown.
pub async fn handle_connection(stream: TcpStream, address: SocketAddr, state: Arc<AppState>) {
    let (read_half, write_half) = stream.into_split();
    let mut reader = FramedRead::new(read_half, frame_codec());
    let mut writer = FramedWrite::new(write_half, frame_codec());

    // The first frame is the proposed display name, outside the envelope protocol
    let proposed = match reader.next().await {
        Some(Ok(frame)) if !frame.is_empty() => frame,
        Some(Ok(_)) | None => {
            tracing::debug!("{} left before choosing a name", address);
            return;
        }
        Some(Err(e)) => {
            tracing::warn!("Failed to read name from {}: {}", address, e);
            return;
        }
    };
    let name = match decode_text(&proposed) {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Unreadable name from {}: {}", address, e);
            refuse(&mut writer, address, "Name must be valid UTF-8 text.".to_string()).await;
            return;
        }
    };

    let (tx, rx) = mpsc::unbounded_channel();
    let peer = match PeerName::new(name) {
        Ok(name) => Peer::new(name, address, PeerOutbound::new(tx)),
        Err(e) => {
            tracing::info!("Refusing {}: invalid name '{}'", address, name);
            refuse(&mut writer, address, ConnectError::from(e).to_string()).await;
            return;
        }
    };

    match state.connect_usecase().execute(peer.clone()).await {
        Ok(()) => {}
        Err(e) => match e.refusal_message() {
            Some(message) => {
                tracing::info!("Refusing {} ({}): {}", address, peer.name, e);
                refuse(&mut writer, address, message).await;
                return;
            }
            // Registered; only a notification failed
            None => tracing::warn!("Failed to welcome {}: {}", peer.name, e),
        },
    }

    let writer_task = tokio::spawn(write_frames(writer, rx, peer.name.clone()));

    read_loop(&mut reader, &peer, &state).await;

    if let Err(e) = state.disconnect_usecase().execute(&peer).await {
        tracing::warn!("Failed to announce departure of {}: {}", peer.name, e);
    }

    // Drop our sender so the writer drains its queue and closes the socket
    let name = peer.name.clone();
    drop(peer);
    if let Err(e) = writer_task.await {
        tracing::error!("Writer task for {} panicked: {}", name, e);
    }
}

/// Read frames until the peer leaves or the connection breaks.
async fn read_loop(reader: &mut FrameReader, peer: &Peer, state: &AppState) {
    let dispatcher = state.dispatcher();

    loop {
        tokio::select! {
            frame = reader.next() => {
                let frame = match frame {
                    Some(Ok(frame)) if frame.is_empty() => {
                        tracing::info!("{} sent an empty frame, disconnecting", peer.name);
                        return;
                    }
                    Some(Ok(frame)) => frame,
                    Some(Err(e)) => {
                        tracing::warn!("Failed to read from {}: {}", peer.name, e);
                        return;
                    }
                    None => {
                        tracing::info!("{} closed the connection", peer.name);
                        return;
                    }
                };

                let line = match decode_text(&frame) {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::warn!("Ignoring frame from {}: {}", peer.name, e);
                        continue;
                    }
                };
                // Blank lines are not commands
                let Ok(command) = Command::parse(line) else {
                    continue;
                };

                match dispatcher.dispatch(peer, command).await {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Disconnect) => return,
                    Err(e) => tracing::warn!("Command from {} failed: {}", peer.name, e),
                }
            }
            _ = peer.outbound().closed() => {
                tracing::warn!("Connection to {} is no longer writable", peer.name);
                return;
            }
        }
    }
}

/// Drain the peer's queue into the socket.
///
/// Stops at the first write error, which closes the queue and signals the
/// read loop. Once every sender is gone the socket is shut down.
async fn write_frames(
    mut writer: FrameWriter,
    mut rx: mpsc::UnboundedReceiver<Bytes>,
    name: PeerName,
) {
    while let Some(frame) = rx.recv().await {
        if let Err(e) = writer.send(frame).await {
            tracing::warn!("Failed to write to {}: {}", name, e);
            return;
        }
    }
    if let Err(e) = SinkExt::<Bytes>::close(&mut writer).await {
        tracing::debug!("Failed to close connection to {}: {}", name, e);
    }
}

/// Send a single `error` envelope and close the connection.
async fn refuse(writer: &mut FrameWriter, address: SocketAddr, message: String) {
    let frame = match encode_envelope(&Envelope::error(message)) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::error!("Failed to encode refusal for {}: {}", address, e);
            return;
        }
    };
    if let Err(e) = writer.send(frame).await {
        tracing::debug!("Failed to send refusal to {}: {}", address, e);
    }
    if let Err(e) = SinkExt::<Bytes>::close(writer).await {
        tracing::debug!("Failed to close connection to {}: {}", address, e);
    }
}
