//! UseCase: 接続中ピア一覧

use std::sync::Arc;

use crate::domain::PeerRegistry;

/// 接続中ピア一覧のユースケース
pub struct ListPeersUseCase {
    /// Repository（データアクセス層の抽象化）
    registry: Arc<dyn PeerRegistry>,
}

impl ListPeersUseCase {
    /// 新しい ListPeersUseCase を作成
    pub fn new(registry: Arc<dyn PeerRegistry>) -> Self {
        Self { registry }
    }

    /// "Connected peers: alice, bob" 形式の一覧を構築（名前順）
    pub async fn execute(&self) -> String {
        let names: Vec<String> = self
            .registry
            .snapshot()
            .await
            .into_iter()
            .map(|peer| peer.name.into_string())
            .collect();
        format!("Connected peers: {}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Peer, PeerName, PeerOutbound},
        infrastructure::repository::InMemoryPeerRegistry,
    };
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_list_peers_sorted() {
        // テスト項目: 接続中のピアが名前順にカンマ区切りで並ぶ
        // given (前提条件):
        let registry = Arc::new(InMemoryPeerRegistry::new());
        let (tx, _rx) = mpsc::unbounded_channel();
        for name in ["charlie", "alice", "bob"] {
            let peer = Peer::new(
                PeerName::new(name).unwrap(),
                "127.0.0.1:40000".parse().unwrap(),
                PeerOutbound::new(tx.clone()),
            );
            registry.try_register(peer).await.unwrap();
        }
        let usecase = ListPeersUseCase::new(registry);

        // when (操作):
        let listing = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(listing, "Connected peers: alice, bob, charlie");
    }

    #[tokio::test]
    async fn test_list_peers_empty() {
        // テスト項目: 誰も接続していなければ一覧は空
        let usecase = ListPeersUseCase::new(Arc::new(InMemoryPeerRegistry::new()));
        assert_eq!(usecase.execute().await, "Connected peers: ");
    }
}
