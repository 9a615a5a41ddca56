//! InMemory Peer Registry 実装
//!
//! ドメイン層が定義する PeerRegistry trait の具体的な実装。
//! 単一の Mutex で保護した HashMap をインメモリ DB として使用します。
//!
//! ロックは各操作の間だけ保持し、ソケットへの書き込み中には保持しません。
//! 送信は PeerOutbound（チャンネル）経由で行われるため、
//! スナップショットを取ってからロックの外で配信します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Peer, PeerName, PeerRegistry, RegistryError};

/// インメモリ Peer Registry 実装
#[derive(Debug, Default)]
pub struct InMemoryPeerRegistry {
    /// 接続中のピア（表示名 → Peer）
    peers: Mutex<HashMap<PeerName, Peer>>,
}

impl InMemoryPeerRegistry {
    /// 新しい InMemoryPeerRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PeerRegistry for InMemoryPeerRegistry {
    async fn try_register(&self, peer: Peer) -> Result<(), RegistryError> {
        let mut peers = self.peers.lock().await;
        if peers.contains_key(&peer.name) {
            return Err(RegistryError::NameConflict(peer.name.into_string()));
        }
        peers.insert(peer.name.clone(), peer);
        Ok(())
    }

    async fn remove(&self, name: &PeerName) -> Option<Peer> {
        let mut peers = self.peers.lock().await;
        peers.remove(name)
    }

    async fn remove_peer(&self, peer: &Peer) -> Option<Peer> {
        let mut peers = self.peers.lock().await;
        let owned = peers
            .get(&peer.name)
            .is_some_and(|current| current.is_same_connection(peer));
        if owned { peers.remove(&peer.name) } else { None }
    }

    async fn lookup(&self, name: &PeerName) -> Option<Peer> {
        let peers = self.peers.lock().await;
        peers.get(name).cloned()
    }

    async fn snapshot(&self) -> Vec<Peer> {
        let mut snapshot: Vec<Peer> = {
            let peers = self.peers.lock().await;
            peers.values().cloned().collect()
        };
        // Sort by name for consistent ordering
        snapshot.sort_by(|a, b| a.name.cmp(&b.name));
        snapshot
    }

    async fn count(&self) -> usize {
        let peers = self.peers.lock().await;
        peers.len()
    }
}
