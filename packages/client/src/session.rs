//! A chat session with the relay.

use std::io::Write;

use futures_util::{sink::SinkExt, stream::StreamExt};
use parley_server::{
    domain::{Command, CommandKind},
    infrastructure::codec::{decode_envelope, encode_text, frame_codec},
};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::{io::AsyncWriteExt, net::TcpStream, sync::mpsc};
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use crate::{
    config::ClientConfig,
    error::ClientError,
    render::{Rendered, render},
};

/// Shown once the connection is up.
pub const BANNER: &str = "\
Welcome to the group chat!
You can use the following commands:
\tlist -> list all connected users on the chat
\tsend -all <message> -> send a message to all users
\tsend -user <username> <message> -> send a message to a specific user
\tbye -> disconnect from the chat";

/// Why a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The user sent `bye`
    Bye,
    /// The server closed the connection
    ServerClosed,
    /// The user closed their input (Ctrl+D / Ctrl+C)
    InputClosed,
}

/// An open connection plus the sink envelopes are rendered to.
pub struct Session<W> {
    framed: Framed<TcpStream, LengthDelimitedCodec>,
    out: W,
}

impl<W: Write> Session<W> {
    /// Connect to the relay and claim `config.name`.
    ///
    /// The server answers asynchronously; a refusal arrives later as an
    /// `error` envelope.
    pub async fn connect(config: &ClientConfig, out: W) -> Result<Self, ClientError> {
        let address = config.address();
        let stream = TcpStream::connect(&address)
            .await
            .map_err(|source| ClientError::Connect {
                address: address.clone(),
                source,
            })?;
        tracing::debug!("Connected to {}", address);

        let mut framed = Framed::new(stream, frame_codec());
        framed.send(encode_text(&config.name)).await?;

        Ok(Self { framed, out })
    }

    /// Relay `input` lines to the server and render its envelopes until one
    /// side ends the session.
    pub async fn run(&mut self, mut input: mpsc::UnboundedReceiver<String>) -> Result<Exit, ClientError> {
        loop {
            tokio::select! {
                frame = self.framed.next() => {
                    let frame = match frame {
                        Some(Ok(frame)) => frame,
                        Some(Err(e)) => return Err(e.into()),
                        None => return Ok(Exit::ServerClosed),
                    };
                    let envelope = match decode_envelope(&frame) {
                        Ok(envelope) => envelope,
                        Err(e) => {
                            tracing::warn!("Ignoring unreadable envelope: {}", e);
                            continue;
                        }
                    };
                    match render(&envelope) {
                        Rendered::Line(line) => writeln!(self.out, "{}", line)?,
                        Rendered::Fatal(line) => {
                            writeln!(self.out, "{}", line)?;
                            return Err(ClientError::Refused(line));
                        }
                    }
                    self.out.flush()?;
                }
                line = input.recv() => {
                    let Some(line) = line else {
                        self.close().await;
                        return Ok(Exit::InputClosed);
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    self.framed.send(encode_text(&line)).await?;
                    if is_bye(&line) {
                        self.close().await;
                        return Ok(Exit::Bye);
                    }
                }
            }
        }
    }
}

impl<W> Session<W> {
    /// Shut down our side of the connection.
    ///
    /// `send` already flushed every frame, so only the socket is left.
    async fn close(&mut self) {
        if let Err(e) = self.framed.get_mut().shutdown().await {
            tracing::debug!("Failed to close connection: {}", e);
        }
    }
}

/// Whether `line` asks to leave. Only the command word matters.
pub fn is_bye(line: &str) -> bool {
    Command::parse(line).is_ok_and(|command| matches!(command.name.parse(), Ok(CommandKind::Bye)))
}

/// Read terminal lines on a dedicated thread.
///
/// The channel closes on end of input, on Ctrl+C, or once the receiver is
/// dropped.
fn spawn_input() -> Result<mpsc::UnboundedReceiver<String>, ClientError> {
    let mut editor = DefaultEditor::new()?;
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::Builder::new()
        .name("parley-input".to_string())
        .spawn(move || {
            loop {
                match editor.readline("") {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            let _ = editor.add_history_entry(line.as_str());
                        }
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                    Err(e) => {
                        tracing::warn!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
        })?;

    Ok(rx)
}

/// Run an interactive session on the terminal.
pub async fn run(config: ClientConfig) -> Result<Exit, ClientError> {
    let mut session = Session::connect(&config, std::io::stdout()).await?;
    println!("{}", BANNER);

    let input = spawn_input()?;
    let exit = session.run(input).await?;
    tracing::debug!("Session ended: {:?}", exit);
    Ok(exit)
}
