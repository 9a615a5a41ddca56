//! UseCase: ピア接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectPeerUseCase::execute() メソッド
//! - 名前の登録、他のピアへの参加通知、本人への一覧送信
//!
//! ### なぜこのテストが必要か
//! - 同名の接続を防ぐ（Registry の状態を変えずに拒否する）
//! - 新しいピア自身には参加通知ではなく一覧が届くことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ピアの接続
//! - 異常系：使用中の名前での接続試行

use std::sync::Arc;

use crate::domain::{Envelope, Peer, PeerRegistry};

use super::{
    delivery::{Delivery, arrival_notice},
    error::ConnectError,
    list_peers::ListPeersUseCase,
};

/// ピア接続のユースケース
pub struct ConnectPeerUseCase {
    /// Repository（データアクセス層の抽象化）
    registry: Arc<dyn PeerRegistry>,
    /// 配信エンジン
    delivery: Delivery,
}

impl ConnectPeerUseCase {
    /// 新しい ConnectPeerUseCase を作成
    pub fn new(registry: Arc<dyn PeerRegistry>, delivery: Delivery) -> Self {
        Self { registry, delivery }
    }

    /// ピア接続を実行
    ///
    /// 1. Registry に登録（名前が使用中なら `ConnectError::NameConflict`）
    /// 2. 他の全ピアに "<name> has connected" を通知
    /// 3. 本人に "Connected peers: ..." を送信
    pub async fn execute(&self, peer: Peer) -> Result<(), ConnectError> {
        self.registry.try_register(peer.clone()).await?;
        tracing::info!("{} has connected from {}", peer.name, peer.address);

        let arrival = Envelope::server(arrival_notice(&peer.name));
        self.delivery.broadcast_except(&arrival, &peer.name).await?;

        let welcome = ListPeersUseCase::new(self.registry.clone()).execute().await;
        self.delivery
            .deliver(&peer, &Envelope::server(welcome))
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{PeerName, PeerOutbound},
        infrastructure::{codec::decode_envelope, repository::InMemoryPeerRegistry},
    };
    use bytes::Bytes;
    use tokio::sync::mpsc;

    fn create_peer(name: &str) -> (Peer, mpsc::UnboundedReceiver<Bytes>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let peer = Peer::new(
            PeerName::new(name).unwrap(),
            "127.0.0.1:40000".parse().unwrap(),
            PeerOutbound::new(tx),
        );
        (peer, rx)
    }

    fn messages(rx: &mut mpsc::UnboundedReceiver<Bytes>) -> Vec<String> {
        let mut messages = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            messages.push(decode_envelope(&frame).unwrap().message().to_string());
        }
        messages
    }

    fn create_usecase(registry: &Arc<InMemoryPeerRegistry>) -> ConnectPeerUseCase {
        ConnectPeerUseCase::new(registry.clone(), Delivery::new(registry.clone()))
    }

    #[tokio::test]
    async fn test_connect_peer_success() {
        // テスト項目: 新規ピアが登録され、本人に一覧が届く
        // given (前提条件):
        let registry = Arc::new(InMemoryPeerRegistry::new());
        let usecase = create_usecase(&registry);
        let (alice, mut rx) = create_peer("alice");

        // when (操作):
        let result = usecase.execute(alice).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(registry.count().await, 1);
        assert_eq!(messages(&mut rx), vec!["Connected peers: alice"]);
    }

    #[tokio::test]
    async fn test_connect_peer_announces_arrival_to_others() {
        // テスト項目: 既存のピアに参加通知が届き、新規ピアには一覧だけが届く
        // given (前提条件):
        let registry = Arc::new(InMemoryPeerRegistry::new());
        let usecase = create_usecase(&registry);
        let (alice, mut rx_alice) = create_peer("alice");
        usecase.execute(alice).await.unwrap();
        messages(&mut rx_alice);

        // when (操作):
        let (bob, mut rx_bob) = create_peer("bob");
        usecase.execute(bob).await.unwrap();

        // then (期待する結果):
        assert_eq!(messages(&mut rx_alice), vec!["bob has connected"]);
        assert_eq!(messages(&mut rx_bob), vec!["Connected peers: alice, bob"]);
    }

    #[tokio::test]
    async fn test_connect_peer_name_conflict() {
        // テスト項目: 使用中の名前での接続は拒否され、誰にも通知されない
        // given (前提条件):
        let registry = Arc::new(InMemoryPeerRegistry::new());
        let usecase = create_usecase(&registry);
        let (first, mut rx_first) = create_peer("alice");
        usecase.execute(first).await.unwrap();
        messages(&mut rx_first);

        // when (操作):
        let (second, mut rx_second) = create_peer("alice");
        let result = usecase.execute(second).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ConnectError::NameConflict(name)) if name == "alice"));
        assert_eq!(registry.count().await, 1);
        assert!(messages(&mut rx_first).is_empty());
        assert!(messages(&mut rx_second).is_empty());
    }
}
