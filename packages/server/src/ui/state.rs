//! Server state shared across request handlers.

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::MessageStore;
use crate::infrastructure::broadcast::Broadcaster;
use crate::infrastructure::registry::SessionRegistry;
use crate::usecase::{DisconnectParticipantUseCase, JoinChatUseCase, SendMessageUseCase};

/// Shared application state
pub struct AppState {
    /// JoinChatUseCase（join 処理のユースケース）
    pub join_chat_usecase: Arc<JoinChatUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// 接続レジストリ（接続受付とステータス表示で使用）
    pub registry: Arc<SessionRegistry>,
    /// ブロードキャストディスパッチャ
    pub broadcaster: Arc<Broadcaster>,
    /// 永続化ストア（ステータス表示で使用）
    pub store: Arc<dyn MessageStore>,
    /// 時刻の抽象化
    pub clock: Arc<dyn Clock>,
}
