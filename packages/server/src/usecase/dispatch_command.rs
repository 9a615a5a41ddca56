//! UseCase: コマンドの検証と実行
//!
//! 1行の入力から作られた Command を Action に解決し、対応するユースケースを
//! 実行します。不正なコマンドには "Invalid command" を返すだけで、
//! Registry には触れません。

use std::sync::Arc;

use crate::domain::{Action, Command, Envelope, Peer, PeerRegistry};

use super::{
    delivery::Delivery, disconnect_peer::DisconnectPeerUseCase, error::DeliveryError,
    list_peers::ListPeersUseCase, send_message::SendMessageUseCase,
};

/// Reply to a command that failed validation.
pub const INVALID_COMMAND: &str = "Invalid command";

/// What the connection should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading input
    Continue,
    /// The peer left; close the connection
    Disconnect,
}

/// コマンドディスパッチャ
#[derive(Clone)]
pub struct CommandDispatcher {
    /// Repository（データアクセス層の抽象化）
    registry: Arc<dyn PeerRegistry>,
    /// 配信エンジン
    delivery: Delivery,
}

impl CommandDispatcher {
    /// 新しい CommandDispatcher を作成
    pub fn new(registry: Arc<dyn PeerRegistry>, delivery: Delivery) -> Self {
        Self { registry, delivery }
    }

    /// `requester` が送った `command` を実行
    pub async fn dispatch(&self, requester: &Peer, command: Command) -> Result<Flow, DeliveryError> {
        tracing::debug!(
            "{} sent '{}' flags={:?} args={:?} at {}",
            requester.name,
            command.name,
            command.flags,
            command.args,
            command.sent_at
        );

        let action = match command.resolve() {
            Ok(action) => action,
            Err(e) => {
                tracing::debug!("Rejected command from {}: {}", requester.name, e);
                self.delivery
                    .deliver(requester, &Envelope::server(INVALID_COMMAND))
                    .await?;
                return Ok(Flow::Continue);
            }
        };

        match action {
            Action::List => {
                let listing = ListPeersUseCase::new(self.registry.clone()).execute().await;
                self.delivery
                    .deliver(requester, &Envelope::server(listing))
                    .await?;
                Ok(Flow::Continue)
            }
            Action::Bye => {
                DisconnectPeerUseCase::new(self.registry.clone(), self.delivery.clone())
                    .execute(requester)
                    .await?;
                Ok(Flow::Disconnect)
            }
            Action::SendAll { message } => {
                self.send_usecase().send_all(requester, message).await?;
                Ok(Flow::Continue)
            }
            Action::SendUser { target, message } => {
                self.send_usecase()
                    .send_to(requester, &target, message)
                    .await?;
                Ok(Flow::Continue)
            }
        }
    }

    fn send_usecase(&self) -> SendMessageUseCase {
        SendMessageUseCase::new(self.registry.clone(), self.delivery.clone())
    }
}
