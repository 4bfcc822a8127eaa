//! InMemory MessageStore 実装
//!
//! ドメイン層が定義する MessageStore trait の具体的な実装。
//! Vec をインメモリ DB として使用します。
//!
//! 接続状態をフラグで切り替えられるため、ストア停止時のフォールバック
//! 経路を単体テスト・結合テストで再現できます。

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, MessageStore, StoreError};

/// インメモリ MessageStore 実装
pub struct InMemoryMessageStore {
    messages: Mutex<Vec<ChatMessage>>,
    connected: AtomicBool,
}

impl InMemoryMessageStore {
    /// 接続済み状態のストアを作成
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            connected: AtomicBool::new(true),
        }
    }

    /// 切断状態のストアを作成
    pub fn disconnected() -> Self {
        let store = Self::new();
        store.set_connected(false);
        store
    }

    /// 接続状態を切り替える
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    async fn fetch_recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        if !self.is_connected() {
            return Err(StoreError::Unavailable);
        }
        let messages = self.messages.lock().await;
        let skip = messages.len().saturating_sub(limit);
        Ok(messages[skip..].to_vec())
    }

    async fn append(&self, message: ChatMessage) -> Result<ChatMessage, StoreError> {
        if !self.is_connected() {
            return Err(StoreError::Unavailable);
        }
        let mut messages = self.messages.lock().await;
        messages.push(message.clone());
        Ok(message)
    }
}
