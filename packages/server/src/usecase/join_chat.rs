//! UseCase: join 処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinChatUseCase::execute() メソッド
//! - 表示名の設定（空文字のフォールバック含む）と履歴のソース選択
//!
//! ### なぜこのテストが必要か
//! - 履歴の取得元（ストア / インメモリログ）の切り替えはこのシステムの
//!   中核的なフォールバック動作であり、ストア障害時の継続性を保証する
//! - join アナウンスが join 本人を含む全接続に届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: 有効な表示名での join、ストアからの履歴取得
//! - 異常系: 長すぎる表示名、ストア到達不能、クエリ失敗
//! - エッジケース: 空文字・空白のみの表示名（Anonymous フォールバック）

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{ChatMessage, MessageStore, Timestamp, Username};
use crate::infrastructure::broadcast::Broadcaster;
use crate::infrastructure::dto::websocket::ServerEvent;
use crate::infrastructure::history::MessageLog;
use crate::infrastructure::registry::{ConnectionId, SessionRegistry};

use super::error::JoinError;

/// join した接続に送る履歴の最大件数
pub const HISTORY_PAGE_SIZE: usize = 50;

/// join のユースケース
pub struct JoinChatUseCase {
    /// 接続レジストリ
    registry: Arc<SessionRegistry>,
    /// ブロードキャストディスパッチャ
    broadcaster: Arc<Broadcaster>,
    /// 永続化ストア（データアクセス層の抽象化）
    store: Arc<dyn MessageStore>,
    /// インメモリ履歴ログ（ストア到達不能時のフォールバック）
    history: Arc<MessageLog>,
    /// 時刻の抽象化
    clock: Arc<dyn Clock>,
}

impl JoinChatUseCase {
    pub fn new(
        registry: Arc<SessionRegistry>,
        broadcaster: Arc<Broadcaster>,
        store: Arc<dyn MessageStore>,
        history: Arc<MessageLog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            store,
            history,
            clock,
        }
    }

    /// join を実行
    ///
    /// 1. 表示名を検証して設定（空文字・空白のみは "Anonymous" に
    ///    フォールバック、再 join は名前の付け替え）
    /// 2. 履歴を取得（ストア接続時はストアから、それ以外はインメモリログ）
    /// 3. join した接続にのみ history イベントを送信
    /// 4. join 本人を含む全接続へ join アナウンスをブロードキャスト
    ///
    /// # Returns
    ///
    /// * `Ok(Username)` - 設定された表示名
    /// * `Err(JoinError)` - 表示名が不正、またはセッションが存在しない
    pub async fn execute(
        &self,
        id: ConnectionId,
        raw_username: &str,
    ) -> Result<Username, JoinError> {
        let username = if raw_username.trim().is_empty() {
            Username::anonymous()
        } else {
            Username::new(raw_username)?
        };

        self.registry
            .update_name(id, username.clone())
            .await
            .map_err(|_| JoinError::SessionNotFound)?;

        let messages = self.source_history().await;
        self.broadcaster
            .send_to(id, &ServerEvent::history(messages))
            .await;

        let announcement = ServerEvent::system(
            format!("{} joined the chat", username),
            Timestamp::new(self.clock.now_millis()),
        );
        self.broadcaster.broadcast(&announcement).await;

        Ok(username)
    }

    /// 履歴のソースを選択して直近メッセージを取得する
    ///
    /// ストア接続時はストアから取得し、取得に失敗した場合・切断時は
    /// インメモリログにフォールバックする。ストアのエラーはここで
    /// 捕捉・ログ出力され、クライアントには露出しない。
    async fn source_history(&self) -> Vec<ChatMessage> {
        if self.store.is_connected() {
            match self.store.fetch_recent(HISTORY_PAGE_SIZE).await {
                Ok(messages) => return messages,
                Err(e) => {
                    tracing::warn!("history fetch failed, falling back to in-memory log: {}", e);
                }
            }
        }
        self.history.recent(HISTORY_PAGE_SIZE).await
    }
}
