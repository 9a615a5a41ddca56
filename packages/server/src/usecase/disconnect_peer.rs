//! UseCase: ピア切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectPeerUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - bye・EOF・読み込みエラーの後始末が同じ経路を通るため、
//!   2回呼ばれても退出通知が1回だけであることを保証する
//!
//! - bye の後に同じ名前で再接続したピアを、古いコネクションの後始末で
//!   消してしまわないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：ピアの切断と通知
//! - エッジケース：既に削除済みのピアの切断（何もしない）
//! - エッジケース：名前が新しいコネクションに引き継がれた後の切断（何もしない）

use std::sync::Arc;

use crate::domain::{Peer, PeerRegistry};

use super::{
    delivery::{BroadcastReport, Delivery},
    error::DeliveryError,
};

/// ピア切断のユースケース
pub struct DisconnectPeerUseCase {
    /// Repository（データアクセス層の抽象化）
    registry: Arc<dyn PeerRegistry>,
    /// 配信エンジン
    delivery: Delivery,
}

impl DisconnectPeerUseCase {
    /// 新しい DisconnectPeerUseCase を作成
    pub fn new(registry: Arc<dyn PeerRegistry>, delivery: Delivery) -> Self {
        Self { registry, delivery }
    }

    /// ピア切断を実行
    ///
    /// 削除するのは `peer` 自身のコネクションだけで、同じ名前で後から
    /// 登録された別のコネクションには触れません。
    ///
    /// # Returns
    ///
    /// * `Ok(Some(report))` - 削除して残りのピアに退出を通知した
    /// * `Ok(None)` - 既に削除済みだった（通知なし）
    pub async fn execute(&self, peer: &Peer) -> Result<Option<BroadcastReport>, DeliveryError> {
        if self.registry.remove_peer(peer).await.is_none() {
            return Ok(None);
        }
        let report = self.delivery.announce_departure(&peer.name).await?;
        Ok(Some(report))
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

    async fn register(
        registry: &InMemoryPeerRegistry,
        name: &str,
    ) -> (Peer, mpsc::UnboundedReceiver<Bytes>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let peer = Peer::new(
            PeerName::new(name).unwrap(),
            "127.0.0.1:40000".parse().unwrap(),
            PeerOutbound::new(tx),
        );
        registry.try_register(peer.clone()).await.unwrap();
        (peer, rx)
    }

    #[tokio::test]
    async fn test_disconnect_peer_success() {
        // テスト項目: ピアが削除され、残りのピアに退出が通知される
        // given (前提条件):
        let registry = Arc::new(InMemoryPeerRegistry::new());
        let usecase = DisconnectPeerUseCase::new(registry.clone(), Delivery::new(registry.clone()));
        let (alice, mut rx_alice) = register(&registry, "alice").await;
        let (_bob, mut rx_bob) = register(&registry, "bob").await;

        // when (操作):
        let result = usecase.execute(&alice).await;

        // then (期待する結果):
        let report = result.unwrap().unwrap();
        assert_eq!(report.delivered, vec![PeerName::new("bob").unwrap()]);
        assert_eq!(registry.count().await, 1);

        let frame = rx_bob.try_recv().unwrap();
        assert_eq!(
            decode_envelope(&frame).unwrap().message(),
            "alice has disconnected"
        );
        // 切断したピア自身には通知されない
        assert!(rx_alice.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_disconnect_peer_twice_announces_once() {
        // テスト項目: 2回目の切断は何もしない（通知も1回だけ）
        // given (前提条件):
        let registry = Arc::new(InMemoryPeerRegistry::new());
        let usecase = DisconnectPeerUseCase::new(registry.clone(), Delivery::new(registry.clone()));
        let (alice, _rx_alice) = register(&registry, "alice").await;
        let (_bob, mut rx_bob) = register(&registry, "bob").await;

        // when (操作):
        let first = usecase.execute(&alice).await.unwrap();
        let second = usecase.execute(&alice).await.unwrap();

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
        assert!(rx_bob.try_recv().is_ok());
        assert!(rx_bob.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stale_teardown_keeps_reconnected_peer() {
        // テスト項目: bye で退出した後に同じ名前で再接続したピアは、古いコネクションの後始末で削除されない
        // given (前提条件):
        let registry = Arc::new(InMemoryPeerRegistry::new());
        let usecase = DisconnectPeerUseCase::new(registry.clone(), Delivery::new(registry.clone()));
        let (old, _rx_old) = register(&registry, "alice").await;
        let (_bob, mut rx_bob) = register(&registry, "bob").await;
        usecase.execute(&old).await.unwrap();
        let (newer, _rx_newer) = register(&registry, "alice").await;
        while rx_bob.try_recv().is_ok() {}

        // when (操作): 古いコネクションの後始末
        let result = usecase.execute(&old).await.unwrap();

        // then (期待する結果):
        assert!(result.is_none());
        let current = registry.lookup(&newer.name).await.unwrap();
        assert!(current.is_same_connection(&newer));
        assert_eq!(registry.count().await, 2);
        // 誤った退出通知は送られない
        assert!(rx_bob.try_recv().is_err());
    }
}
