//! MessageStore trait 定義
//!
//! ドメイン層が必要とする永続化ストアへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//! ストアは到達不能な場合があり、呼び出し側はそれを許容しなければならない。

use async_trait::async_trait;

use super::entity::ChatMessage;
use super::error::StoreError;

/// 永続化ストアへのインターフェース
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には
/// 依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// ストアへの接続状態を返す
    ///
    /// 非ブロッキングな状態確認であり、このメソッド自体が接続を
    /// 試みてはならない。
    fn is_connected(&self) -> bool;

    /// 直近のメッセージを古い順で取得
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError>;

    /// メッセージを永続化し、永続化されたレコードを返す
    ///
    /// タイムスタンプはストア側で再割り当てされる場合がある。
    async fn append(&self, message: ChatMessage) -> Result<ChatMessage, StoreError>;
}
