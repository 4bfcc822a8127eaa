//! ブロードキャストディスパッチャ
//!
//! ## 責務
//!
//! - イベントを 1 回だけシリアライズし、スナップショット上の全接続へ
//!   同一バイト列を配送する
//! - 配送中に書き込み不能と判明した接続をレジストリから除去する
//!   （遅延検出された切断として leave アナウンスを送る）
//! - 特定の接続への送信（send_to）。対象がいなければ黙って no-op
//!
//! 配送順序は接続間で保証しない。1 回のブロードキャストのペイロードは
//! それ自体で完結しており、部分的な書き込みは発生しない。

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::Timestamp;
use crate::infrastructure::dto::websocket::ServerEvent;
use crate::infrastructure::registry::{ConnectionId, Session, SessionRegistry};

/// 全接続へのイベント配送を担うディスパッチャ
pub struct Broadcaster {
    registry: Arc<SessionRegistry>,
    clock: Arc<dyn Clock>,
}

impl Broadcaster {
    pub fn new(registry: Arc<SessionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// イベントを全接続へ配送する
    ///
    /// 配送中に検出された切断はレジストリから除去し、残りの接続へ
    /// leave アナウンスを送る。アナウンス自体がさらに切断を検出する
    /// 場合に備え、再帰ではなくキューで処理する。
    pub async fn broadcast(&self, event: &ServerEvent) {
        let mut pending = vec![event.to_json()];
        while let Some(payload) = pending.pop() {
            for session in self.deliver(&payload).await {
                let announcement = ServerEvent::system(
                    format!("{} left the chat", session.username),
                    Timestamp::new(self.clock.now_millis()),
                );
                pending.push(announcement.to_json());
            }
        }
    }

    /// 特定の接続にのみイベントを送る
    ///
    /// 対象が存在しない・書き込み不能な場合は黙って no-op（ベスト
    /// エフォート送信であり、呼び出し側にエラーを返さない）。
    pub async fn send_to(&self, id: ConnectionId, event: &ServerEvent) {
        if let Some(sender) = self.registry.sender(id).await
            && sender.send(event.to_json()).is_err()
        {
            tracing::debug!("send_to '{}' failed, connection is gone", id);
        }
    }

    /// ペイロードをスナップショット上の全接続へ送り、切断済みの
    /// セッションを除去して返す
    async fn deliver(&self, payload: &str) -> Vec<Session> {
        let snapshot = self.registry.snapshot().await;
        let mut dead = Vec::new();
        for (id, sender) in snapshot {
            if sender.send(payload.to_string()).is_err() {
                tracing::warn!("connection '{}' is no longer writable, pruning", id);
                dead.push(id);
            }
        }

        let mut pruned = Vec::new();
        for id in dead {
            if let Some(session) = self.registry.unregister(id).await {
                pruned.push(session);
            }
        }
        pruned
    }
}
