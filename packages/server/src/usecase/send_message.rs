//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::send_all() / send_to() メソッド
//!
//! ### なぜこのテストが必要か
//! - send -all は送信者を含む全員に届くこと
//! - send -user は宛先だけに届き、宛先がいなければ送信者に通知されること
//!
//! ### どのような状況を想定しているか
//! - 正常系：全員への送信、特定ピアへの送信
//! - 異常系：存在しない宛先（text エンベロープはどこにも送られない）

use std::sync::Arc;

use crate::domain::{Envelope, Peer, PeerName, PeerRegistry};

use super::{
    delivery::{BroadcastReport, Delivery},
    error::DeliveryError,
};

/// Reply sent to the sender when the target of `send -user` is absent.
pub const PEER_NOT_CONNECTED: &str = "Peer isn't connected.";

/// Result of a direct message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The text envelope was handed to the target
    Delivered(BroadcastReport),
    /// No such peer; the sender was told so
    PeerNotConnected,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    registry: Arc<dyn PeerRegistry>,
    /// 配信エンジン
    delivery: Delivery,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(registry: Arc<dyn PeerRegistry>, delivery: Delivery) -> Self {
        Self { registry, delivery }
    }

    /// 全員（送信者を含む）にメッセージを送信
    pub async fn send_all(
        &self,
        sender: &Peer,
        message: String,
    ) -> Result<BroadcastReport, DeliveryError> {
        let envelope = Envelope::text(sender, message);
        tracing::info!(?envelope, "relaying message to all peers");
        self.delivery.broadcast(&envelope).await
    }

    /// 指定したピアだけにメッセージを送信
    pub async fn send_to(
        &self,
        sender: &Peer,
        target: &str,
        message: String,
    ) -> Result<SendOutcome, DeliveryError> {
        let receiver = match PeerName::new(target) {
            Ok(name) => self.registry.lookup(&name).await,
            // An invalid name can never be registered
            Err(_) => None,
        };

        match receiver {
            Some(receiver) => {
                let envelope = Envelope::text(sender, message);
                tracing::info!(to = %receiver.name, ?envelope, "relaying direct message");
                let report = self.delivery.deliver(&receiver, &envelope).await?;
                Ok(SendOutcome::Delivered(report))
            }
            None => {
                tracing::info!("{} tried to reach absent peer '{}'", sender.name, target);
                self.delivery
                    .deliver(sender, &Envelope::server(PEER_NOT_CONNECTED))
                    .await?;
                Ok(SendOutcome::PeerNotConnected)
            }
        }
    }
}
