//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 本文のバリデーション、インメモリログへの追記、ブロードキャスト、
//!   ベストエフォートの永続化
//!
//! ### なぜこのテストが必要か
//! - 不正な本文がログ・ブロードキャストに一切現れないことを保証
//! - ストア障害がメッセージ配送をブロックしないことを保証
//! - 全接続が同一タイムスタンプの同一メッセージを受け取ることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: メッセージ送信とファンアウト、ストアへの永続化
//! - 異常系: 空・空白のみ・長すぎる本文、ストア書き込み失敗
//! - エッジケース: フレームの username がセッションの表示名を上書きする

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{ChatMessage, MessageBody, MessageStore, Timestamp, Username};
use crate::infrastructure::broadcast::Broadcaster;
use crate::infrastructure::dto::websocket::ServerEvent;
use crate::infrastructure::history::MessageLog;
use crate::infrastructure::registry::{ConnectionId, SessionRegistry};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// 接続レジストリ
    registry: Arc<SessionRegistry>,
    /// ブロードキャストディスパッチャ
    broadcaster: Arc<Broadcaster>,
    /// 永続化ストア（データアクセス層の抽象化）
    store: Arc<dyn MessageStore>,
    /// インメモリ履歴ログ
    history: Arc<MessageLog>,
    /// 時刻の抽象化
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
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

    /// メッセージ送信を実行
    ///
    /// 1. 送信者の表示名を解決（フレームの username が有効ならこの
    ///    メッセージに限りセッションの表示名を上書きする）
    /// 2. 本文を検証（失敗時は副作用なしで即エラー）
    /// 3. サーバ時刻で ChatMessage を構築し、インメモリログに追記
    /// 4. ストア接続時のみ、切り離されたタスクで永続化を試みる
    ///    （失敗はログ出力のみで、ブロードキャストを妨げない）
    /// 5. 全接続へ message イベントをブロードキャスト
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - ブロードキャストされたメッセージ
    /// * `Err(SendMessageError)` - 本文が不正（送信者にのみ報告される）
    pub async fn execute(
        &self,
        id: ConnectionId,
        frame_username: &str,
        raw_body: &str,
    ) -> Result<ChatMessage, SendMessageError> {
        let username = match Username::new(frame_username) {
            Ok(name) => name,
            Err(_) => self
                .registry
                .username(id)
                .await
                .unwrap_or_else(Username::anonymous),
        };

        let body = MessageBody::new(raw_body)?;
        let message = ChatMessage::new(username, body, Timestamp::new(self.clock.now_millis()));

        self.history.append(message.clone()).await;

        if self.store.is_connected() {
            let store = Arc::clone(&self.store);
            let record = message.clone();
            tokio::spawn(async move {
                if let Err(e) = store.append(record).await {
                    tracing::warn!("failed to persist message: {}", e);
                }
            });
        }

        self.broadcaster.broadcast(&ServerEvent::from(&message)).await;

        Ok(message)
    }
}
