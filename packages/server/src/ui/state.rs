//! Server state shared by every connection.

use std::sync::Arc;

use crate::{
    domain::PeerRegistry,
    infrastructure::InMemoryPeerRegistry,
    usecase::{CommandDispatcher, ConnectPeerUseCase, Delivery, DisconnectPeerUseCase},
};

/// Shared application state
pub struct AppState {
    /// Registry of connected peers
    pub registry: Arc<dyn PeerRegistry>,
    /// Delivery engine over the registry
    pub delivery: Delivery,
}

impl AppState {
    /// Build the state around a registry implementation
    pub fn new(registry: Arc<dyn PeerRegistry>) -> Self {
        let delivery = Delivery::new(registry.clone());
        Self { registry, delivery }
    }

    pub fn connect_usecase(&self) -> ConnectPeerUseCase {
        ConnectPeerUseCase::new(self.registry.clone(), self.delivery.clone())
    }

    pub fn disconnect_usecase(&self) -> DisconnectPeerUseCase {
        DisconnectPeerUseCase::new(self.registry.clone(), self.delivery.clone())
    }

    pub fn dispatcher(&self) -> CommandDispatcher {
        CommandDispatcher::new(self.registry.clone(), self.delivery.clone())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryPeerRegistry::new()))
    }
}
