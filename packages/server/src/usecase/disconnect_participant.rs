//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - セッションの削除と leave アナウンスのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 切断ごとにちょうど 1 回だけ leave アナウンスが出ることを保証
//!   （明示的な close と配送中の遅延検出が競合しても二重にならない）
//! - 最後に知られていた表示名がアナウンスに使われることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: join 済みセッションの切断
//! - エッジケース: join しないまま切断（"Anonymous" で通知される）
//! - 異常系: 二重切断（2 回目は no-op）

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{Timestamp, Username};
use crate::infrastructure::broadcast::Broadcaster;
use crate::infrastructure::dto::websocket::ServerEvent;
use crate::infrastructure::registry::{ConnectionId, SessionRegistry};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// 接続レジストリ
    registry: Arc<SessionRegistry>,
    /// ブロードキャストディスパッチャ
    broadcaster: Arc<Broadcaster>,
    /// 時刻の抽象化
    clock: Arc<dyn Clock>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        registry: Arc<SessionRegistry>,
        broadcaster: Arc<Broadcaster>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            clock,
        }
    }

    /// 参加者切断を実行
    ///
    /// セッションをレジストリから削除した上で、残りの接続へ leave
    /// アナウンスをブロードキャストする。削除は冪等であり、既に削除済み
    /// （配送中の遅延検出で除去された場合など）は何もしない。
    ///
    /// # Returns
    ///
    /// * `Some(Username)` - この呼び出しで削除されたセッションの表示名
    /// * `None` - セッションは既に削除されていた
    pub async fn execute(&self, id: ConnectionId) -> Option<Username> {
        let session = self.registry.unregister(id).await?;

        let announcement = ServerEvent::system(
            format!("{} left the chat", session.username),
            Timestamp::new(self.clock.now_millis()),
        );
        self.broadcaster.broadcast(&announcement).await;

        Some(session.username)
    }
}
