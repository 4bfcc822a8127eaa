//! インメモリ履歴ログ（リングバッファ）
//!
//! 直近メッセージの有界な追記専用バッファ。ストア到達不能時の履歴ソース
//! であり、ストアの可用性に関係なく受理された全メッセージを受け取る。
//!
//! ## 並行性
//!
//! 追記と上限超過分の切り詰めは 1 回のロック内で行われ、直近 N 件を
//! 読み出す並行リーダーに対して単一の原子的ステップとなる。

use std::collections::VecDeque;

use tokio::sync::Mutex;

use crate::domain::ChatMessage;

/// 保持する直近メッセージ数
pub const MESSAGE_LOG_CAPACITY: usize = 100;

/// 有界なインメモリメッセージログ
///
/// 挿入順を保持し、上限を超えた場合は最も古いものから破棄する（FIFO）。
pub struct MessageLog {
    entries: Mutex<VecDeque<ChatMessage>>,
    capacity: usize,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::with_capacity(MESSAGE_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// メッセージを追記する
    ///
    /// 上限を超えた場合、最も古いエントリを同一ロック内で破棄する。
    pub async fn append(&self, message: ChatMessage) {
        let mut entries = self.entries.lock().await;
        entries.push_back(message);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// 直近 `limit` 件を古い順で返す
    pub async fn recent(&self, limit: usize) -> Vec<ChatMessage> {
        let entries = self.entries.lock().await;
        let skip = entries.len().saturating_sub(limit);
        entries.iter().skip(skip).cloned().collect()
    }

    /// 保持しているメッセージ数を返す
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}
