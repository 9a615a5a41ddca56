//! UseCase: 配信（ユニキャスト / ブロードキャスト）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - Delivery::unicast / deliver / broadcast / broadcast_except
//!
//! ### なぜこのテストが必要か
//! - 1つのピアへの送信失敗が他のピアへの配信を止めないこと
//! - 送信に失敗したピアが Registry から除去され、退出が通知されること
//!
//! ### どのような状況を想定しているか
//! - 正常系：全員への配信、特定ピアを除いた配信
//! - 異常系：途中のピアの送信失敗、退出通知の配信中に見つかる別の失敗

use std::sync::Arc;

use bytes::Bytes;

use crate::{
    domain::{Envelope, Peer, PeerName, PeerRegistry},
    infrastructure::codec::encode_envelope,
};

use super::error::DeliveryError;

/// Text announcing that `name` joined.
pub fn arrival_notice(name: &PeerName) -> String {
    format!("{name} has connected")
}

/// Text announcing that `name` left.
pub fn departure_notice(name: &PeerName) -> String {
    format!("{name} has disconnected")
}

/// Outcome of a broadcast
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Peers the envelope was handed to
    pub delivered: Vec<PeerName>,
    /// Peers removed because they could not be reached
    pub evicted: Vec<PeerName>,
}

/// 配信エンジン
///
/// 送信はピアのコネクションへのキューイングで、ソケットへの書き込みは
/// コネクションごとの writer タスクが行います。キューは上限なしのため、
/// 遅い受信者がいても他のピアへの配信は止まりませんが、その受信者の
/// キューは際限なく伸びます（バックプレッシャーなし）。
#[derive(Clone)]
pub struct Delivery {
    /// Repository（データアクセス層の抽象化）
    registry: Arc<dyn PeerRegistry>,
}

impl Delivery {
    /// 新しい Delivery を作成
    pub fn new(registry: Arc<dyn PeerRegistry>) -> Self {
        Self { registry }
    }

    /// Encode `envelope` and hand it to one peer's connection.
    ///
    /// Fails with [`DeliveryError::DeliveryFailed`] when the connection is
    /// gone. The registry is left untouched.
    pub fn unicast(&self, peer: &Peer, envelope: &Envelope) -> Result<(), DeliveryError> {
        let frame = encode_envelope(envelope)?;
        send_frame(peer, frame)
    }

    /// Like [`Delivery::unicast`], but an unreachable peer is evicted and its
    /// departure announced. Only codec errors are returned.
    pub async fn deliver(
        &self,
        peer: &Peer,
        envelope: &Envelope,
    ) -> Result<BroadcastReport, DeliveryError> {
        let mut report = BroadcastReport::default();
        match self.unicast(peer, envelope) {
            Ok(()) => report.delivered.push(peer.name.clone()),
            Err(DeliveryError::DeliveryFailed(_)) => {
                self.evict(vec![peer.clone()], &mut report).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(report)
    }

    /// Best-effort delivery to every registered peer.
    pub async fn broadcast(&self, envelope: &Envelope) -> Result<BroadcastReport, DeliveryError> {
        self.fan_out(envelope, None).await
    }

    /// Best-effort delivery to every registered peer except `exclude`.
    pub async fn broadcast_except(
        &self,
        envelope: &Envelope,
        exclude: &PeerName,
    ) -> Result<BroadcastReport, DeliveryError> {
        self.fan_out(envelope, Some(exclude)).await
    }

    /// Tell every remaining peer that `name` left.
    pub async fn announce_departure(
        &self,
        name: &PeerName,
    ) -> Result<BroadcastReport, DeliveryError> {
        let notice = departure_notice(name);
        tracing::info!("{}", notice);
        self.broadcast(&Envelope::server(notice)).await
    }

    async fn fan_out(
        &self,
        envelope: &Envelope,
        exclude: Option<&PeerName>,
    ) -> Result<BroadcastReport, DeliveryError> {
        let frame = encode_envelope(envelope)?;
        let mut report = BroadcastReport::default();
        let unreachable = self
            .send_to_snapshot(frame, exclude, Some(&mut report.delivered))
            .await;
        self.evict(unreachable, &mut report).await?;
        Ok(report)
    }

    /// Send `frame` to a snapshot of the registry, returning the peers that
    /// could not be reached.
    async fn send_to_snapshot(
        &self,
        frame: Bytes,
        exclude: Option<&PeerName>,
        mut delivered: Option<&mut Vec<PeerName>>,
    ) -> Vec<Peer> {
        let mut unreachable = Vec::new();
        for peer in self.registry.snapshot().await {
            if exclude == Some(&peer.name) {
                continue;
            }
            match send_frame(&peer, frame.clone()) {
                Ok(()) => {
                    if let Some(delivered) = delivered.as_deref_mut() {
                        delivered.push(peer.name);
                    }
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    unreachable.push(peer);
                }
            }
        }
        unreachable
    }

    /// Remove unreachable peers and announce each departure.
    ///
    /// Announcing can uncover more unreachable peers; they are queued here
    /// instead of recursing. A peer already removed by someone else was
    /// already announced, so it is skipped, as is a name that a newer
    /// connection has taken over since.
    async fn evict(
        &self,
        mut pending: Vec<Peer>,
        report: &mut BroadcastReport,
    ) -> Result<(), DeliveryError> {
        while let Some(peer) = pending.pop() {
            if self.registry.remove_peer(&peer).await.is_none() {
                continue;
            }
            let name = peer.name;
            tracing::warn!("Evicted unreachable peer '{}'", name);

            let notice = Envelope::server(departure_notice(&name));
            report.evicted.push(name);
            let frame = encode_envelope(&notice)?;
            pending.extend(self.send_to_snapshot(frame, None, None).await);
        }
        Ok(())
    }
}

fn send_frame(peer: &Peer, frame: Bytes) -> Result<(), DeliveryError> {
    peer.outbound()
        .send(frame)
        .map_err(|_| DeliveryError::DeliveryFailed(peer.name.as_str().to_string()))
}
