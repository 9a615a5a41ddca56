//! Listener setup and accept loop.

use std::{future::Future, io, net::SocketAddr, sync::Arc, time::Duration};

use thiserror::Error;
use tokio::net::{TcpListener, TcpSocket};

use crate::config::ServerConfig;

use super::{handler::handle_connection, signal::shutdown_signal, state::AppState};

/// Pause after a failed accept, so a persistent error (e.g. out of file
/// descriptors) does not spin the loop.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Startup errors of the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured host could not be resolved
    #[error("failed to resolve '{address}': {source}")]
    Resolve {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The configured host resolved to nothing
    #[error("no address found for '{0}'")]
    NoAddress(String),

    /// The listening socket could not be created
    #[error("failed to listen on {address}: {source}")]
    Listen {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// A bound relay server, ready to accept connections.
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Resolve the configured address and start listening on it.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        let address = config.address();
        // The resolved iterator would otherwise borrow `address`
        let resolved = tokio::net::lookup_host(address.clone())
            .await
            .map_err(|source| ServerError::Resolve {
                address: address.clone(),
                source,
            })?
            .next()
            .ok_or(ServerError::NoAddress(address))?;

        let listener = listen(resolved, config.backlog).map_err(|source| ServerError::Listen {
            address: resolved,
            source,
        })?;

        Ok(Self {
            listener,
            state: Arc::new(AppState::default()),
        })
    }

    /// The address the listener is actually bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Shared state, for inspection.
    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// Every connection runs in its own task; a failing connection never
    /// stops the loop.
    pub async fn serve_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        match self.listener.local_addr() {
            Ok(address) => tracing::info!("Starting server {}", address),
            Err(_) => tracing::info!("Starting server"),
        }

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutting down, no longer accepting connections");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, address)) => {
                        tracing::debug!("Accepted connection from {}", address);
                        tokio::spawn(handle_connection(stream, address, self.state.clone()));
                    }
                    Err(e) => {
                        tracing::warn!("Failed to accept connection: {}", e);
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                },
            }
        }
    }
}

/// Bind and run the relay until SIGINT/SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let server = Server::bind(&config).await?;
    server.serve_until(shutdown_signal()).await;
    Ok(())
}

fn listen(address: SocketAddr, backlog: u32) -> io::Result<TcpListener> {
    let socket = if address.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(address)?;
    socket.listen(backlog)
}
