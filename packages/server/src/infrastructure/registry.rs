//! 接続レジストリ
//!
//! 接続中の全セッションを管理する唯一の情報源。
//! 登録・削除・名前の更新・スナップショット取得を提供します。
//!
//! ## 並行性
//!
//! レジストリへの変更はすべて Mutex 経由で排他される。ブロードキャスト中の
//! イテレーションは `snapshot()` で取得したコピーに対して行い、同時の切断が
//! イテレーションを壊さないようにする。

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use crate::domain::{Timestamp, Username};

/// セッションへのメッセージ送信チャンネル
pub type SessionSender = mpsc::UnboundedSender<String>;

/// 接続ハンドル
///
/// 接続ごとに一意。レジストリのキーとして使用される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 接続ごとのセッション状態
#[derive(Debug)]
pub struct Session {
    /// 表示名（join まではデフォルトの "Anonymous"）
    pub username: Username,
    /// 接続時刻
    pub connected_at: Timestamp,
    /// このセッションへの送信チャンネル
    pub sender: SessionSender,
}

/// レジストリ操作のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// 対象のセッションが存在しない（既に削除済み）
    #[error("session '{0}' not found")]
    SessionNotFound(ConnectionId),
}

/// 接続レジストリ
pub struct SessionRegistry {
    sessions: Mutex<HashMap<ConnectionId, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// 新しい接続を Anonymous セッションとして登録する。失敗しない。
    pub async fn register(&self, sender: SessionSender, connected_at: Timestamp) -> ConnectionId {
        let id = ConnectionId::generate();
        let session = Session {
            username: Username::anonymous(),
            connected_at,
            sender,
        };
        self.sessions.lock().await.insert(id, session);
        id
    }

    /// 既存セッションの表示名を更新する
    pub async fn update_name(
        &self,
        id: ConnectionId,
        username: Username,
    ) -> Result<(), RegistryError> {
        match self.sessions.lock().await.get_mut(&id) {
            Some(session) => {
                session.username = username;
                Ok(())
            }
            None => Err(RegistryError::SessionNotFound(id)),
        }
    }

    /// セッションの現在の表示名を取得する
    pub async fn username(&self, id: ConnectionId) -> Option<Username> {
        self.sessions
            .lock()
            .await
            .get(&id)
            .map(|session| session.username.clone())
    }

    /// セッションの送信チャンネルを取得する
    pub async fn sender(&self, id: ConnectionId) -> Option<SessionSender> {
        self.sessions
            .lock()
            .await
            .get(&id)
            .map(|session| session.sender.clone())
    }

    /// セッションを削除し、削除したセッションを返す
    ///
    /// 既に削除済みの場合は `None`（二重 unregister は安全）。
    pub async fn unregister(&self, id: ConnectionId) -> Option<Session> {
        self.sessions.lock().await.remove(&id)
    }

    /// 全セッションのある時点のコピーを取得する
    ///
    /// レジストリのロックを保持せずにイテレーションできる。
    pub async fn snapshot(&self) -> Vec<(ConnectionId, SessionSender)> {
        self.sessions
            .lock()
            .await
            .iter()
            .map(|(id, session)| (*id, session.sender.clone()))
            .collect()
    }

    /// 接続中のセッション数を返す
    pub async fn count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_sender() -> (SessionSender, mpsc::UnboundedReceiver<String>) {
        mpsc::unbounded_channel()
    }

    #[tokio::test]
    async fn test_register_creates_anonymous_session() {
        // テスト項目: 登録直後のセッションは Anonymous である
        // given (前提条件):
        let registry = SessionRegistry::new();
        let (sender, _receiver) = create_test_sender();

        // when (操作):
        let id = registry.register(sender, Timestamp::new(1000)).await;

        // then (期待する結果):
        assert_eq!(registry.count().await, 1);
        assert_eq!(
            registry.username(id).await.unwrap().as_str(),
            "Anonymous"
        );
    }

    #[tokio::test]
    async fn test_register_assigns_unique_ids() {
        // テスト項目: 登録ごとに一意な接続ハンドルが割り当てられる
        // given (前提条件):
        let registry = SessionRegistry::new();
        let (sender1, _receiver1) = create_test_sender();
        let (sender2, _receiver2) = create_test_sender();

        // when (操作):
        let id1 = registry.register(sender1, Timestamp::new(1000)).await;
        let id2 = registry.register(sender2, Timestamp::new(2000)).await;

        // then (期待する結果):
        assert_ne!(id1, id2);
        assert_eq!(registry.count().await, 2);
    }

    #[tokio::test]
    async fn test_update_name_success() {
        // テスト項目: 表示名を更新できる
        // given (前提条件):
        let registry = SessionRegistry::new();
        let (sender, _receiver) = create_test_sender();
        let id = registry.register(sender, Timestamp::new(1000)).await;

        // when (操作):
        let result = registry
            .update_name(id, Username::new("alice").unwrap())
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(registry.username(id).await.unwrap().as_str(), "alice");
    }

    #[tokio::test]
    async fn test_update_name_for_unknown_session() {
        // テスト項目: 存在しないセッションの名前更新は SessionNotFound になる
        // given (前提条件):
        let registry = SessionRegistry::new();
        let (sender, _receiver) = create_test_sender();
        let id = registry.register(sender, Timestamp::new(1000)).await;
        registry.unregister(id).await;

        // when (操作):
        let result = registry
            .update_name(id, Username::new("alice").unwrap())
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), RegistryError::SessionNotFound(id));
    }

    #[tokio::test]
    async fn test_unregister_returns_prior_session() {
        // テスト項目: 削除時に直前のセッション状態が返される
        // given (前提条件):
        let registry = SessionRegistry::new();
        let (sender, _receiver) = create_test_sender();
        let id = registry.register(sender, Timestamp::new(1000)).await;
        registry
            .update_name(id, Username::new("alice").unwrap())
            .await
            .unwrap();

        // when (操作):
        let session = registry.unregister(id).await;

        // then (期待する結果):
        let session = session.unwrap();
        assert_eq!(session.username.as_str(), "alice");
        assert_eq!(session.connected_at, Timestamp::new(1000));
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_double_unregister_is_idempotent() {
        // テスト項目: 二重 unregister はクラッシュせず None を返す（冪等性）
        // given (前提条件):
        let registry = SessionRegistry::new();
        let (sender, _receiver) = create_test_sender();
        let id = registry.register(sender, Timestamp::new(1000)).await;
        registry.unregister(id).await;

        // when (操作):
        let second = registry.unregister(id).await;

        // then (期待する結果):
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_is_point_in_time_copy() {
        // テスト項目: スナップショットは取得時点のコピーであり、その後の変更に影響されない
        // given (前提条件):
        let registry = SessionRegistry::new();
        let (sender1, _receiver1) = create_test_sender();
        let (sender2, _receiver2) = create_test_sender();
        let id1 = registry.register(sender1, Timestamp::new(1000)).await;
        let _id2 = registry.register(sender2, Timestamp::new(2000)).await;

        // when (操作):
        let snapshot = registry.snapshot().await;
        registry.unregister(id1).await;

        // then (期待する結果):
        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.count().await, 1);
    }
}
