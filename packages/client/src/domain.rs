//! Domain logic for client-side operations.
//!
//! This module contains the connection lifecycle state machine and the local
//! message log, implemented without side effects to make them easy to test.

use std::time::Duration;

use hiroba_server::infrastructure::dto::websocket::ChatMessageDto;

/// Maximum number of automatic reconnect attempts before giving up
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

const BASE_RECONNECT_DELAY_MS: u64 = 1000;
const MAX_RECONNECT_DELAY_MS: u64 = 10_000;

/// Connection lifecycle states for a single client session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Idle,
    Connecting,
    Open,
    Closed,
    /// Terminal state after all reconnect attempts are exhausted
    GaveUp,
}

/// Delay before reconnect attempt `attempt` (1-based).
///
/// Exponential backoff with a ceiling: 1000, 2000, 4000, 8000, 10000 ms.
pub fn reconnect_delay(attempt: u32) -> Duration {
    let exp = 2u64.saturating_pow(attempt.saturating_sub(1));
    let millis = BASE_RECONNECT_DELAY_MS
        .saturating_mul(exp)
        .min(MAX_RECONNECT_DELAY_MS);
    Duration::from_millis(millis)
}

/// Tracks one logical session's lifecycle and reconnect budget.
///
/// At most one live channel and one pending reconnect delay exist per
/// session; the runner drives this state machine from a single loop, which
/// enforces that invariant structurally.
#[derive(Debug)]
pub struct ReconnectState {
    status: ConnectionStatus,
    attempts: u32,
}

impl ReconnectState {
    pub fn new() -> Self {
        Self {
            status: ConnectionStatus::Idle,
            attempts: 0,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// A connect attempt is starting
    pub fn on_connecting(&mut self) {
        self.status = ConnectionStatus::Connecting;
    }

    /// The connection reached Open: the reconnect budget starts over
    pub fn on_open(&mut self) {
        self.status = ConnectionStatus::Open;
        self.attempts = 0;
    }

    /// A user-initiated close: never auto-reconnect
    pub fn on_clean_close(&mut self) {
        self.status = ConnectionStatus::Closed;
    }

    /// An unclean close (transport failure, connect timeout).
    ///
    /// Returns the delay before the next reconnect attempt, or `None` when
    /// the budget is exhausted (the state becomes `GaveUp`).
    pub fn on_unclean_close(&mut self) -> Option<Duration> {
        if self.attempts >= MAX_RECONNECT_ATTEMPTS {
            self.status = ConnectionStatus::GaveUp;
            return None;
        }
        self.status = ConnectionStatus::Closed;
        self.attempts += 1;
        Some(reconnect_delay(self.attempts))
    }

    /// Manual retry after `GaveUp`: re-enter with a fresh budget
    pub fn reset(&mut self) {
        self.status = ConnectionStatus::Idle;
        self.attempts = 0;
    }
}

impl Default for ReconnectState {
    fn default() -> Self {
        Self::new()
    }
}

/// Local message list with wholesale history replacement and echo dedup.
#[derive(Debug, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessageDto>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// An inbound history event replaces the list wholesale, never merges
    pub fn replace_history(&mut self, messages: Vec<ChatMessageDto>) {
        self.messages = messages;
    }

    /// Append an inbound message unless an identical (timestamp, username,
    /// body) entry already exists.
    ///
    /// Returns `false` when the message was discarded as a duplicate.
    pub fn append(&mut self, message: ChatMessageDto) -> bool {
        let duplicate = self.messages.iter().any(|m| {
            m.timestamp == message.timestamp
                && m.username == message.username
                && m.message == message.message
        });
        if duplicate {
            return false;
        }
        self.messages.push(message);
        true
    }

    pub fn messages(&self) -> &[ChatMessageDto] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_dto(username: &str, message: &str, timestamp: i64) -> ChatMessageDto {
        ChatMessageDto {
            username: username.to_string(),
            message: message.to_string(),
            timestamp,
        }
    }

    #[test]
    fn test_reconnect_delays_follow_exponential_backoff_with_ceiling() {
        // テスト項目: 5 回連続の異常切断で遅延が 1000, 2000, 4000, 8000,
        //             10000 ms（上限で頭打ち）になる
        // given (前提条件):
        let mut state = ReconnectState::new();

        // when (操作):
        let delays: Vec<Option<Duration>> =
            (0..5).map(|_| state.on_unclean_close()).collect();

        // then (期待する結果):
        assert_eq!(
            delays,
            vec![
                Some(Duration::from_millis(1000)),
                Some(Duration::from_millis(2000)),
                Some(Duration::from_millis(4000)),
                Some(Duration::from_millis(8000)),
                Some(Duration::from_millis(10000)),
            ]
        );
    }

    #[test]
    fn test_no_sixth_reconnect_attempt() {
        // テスト項目: 5 回の試行を使い切ると 6 回目はスケジュールされず
        //             GaveUp になる
        // given (前提条件):
        let mut state = ReconnectState::new();
        for _ in 0..5 {
            state.on_unclean_close();
        }

        // when (操作):
        let sixth = state.on_unclean_close();

        // then (期待する結果):
        assert!(sixth.is_none());
        assert_eq!(state.status(), ConnectionStatus::GaveUp);
    }

    #[test]
    fn test_open_resets_reconnect_budget() {
        // テスト項目: 接続が Open に達すると試行カウンタが 0 に戻る
        // given (前提条件):
        let mut state = ReconnectState::new();
        state.on_unclean_close();
        state.on_unclean_close();
        assert_eq!(state.attempts(), 2);

        // when (操作):
        state.on_open();

        // then (期待する結果):
        assert_eq!(state.attempts(), 0);
        assert_eq!(state.status(), ConnectionStatus::Open);
        // 次の異常切断は再び初回の遅延から始まる
        assert_eq!(
            state.on_unclean_close(),
            Some(Duration::from_millis(1000))
        );
    }

    #[test]
    fn test_clean_close_schedules_no_reconnect() {
        // テスト項目: ユーザ起因のクリーンな切断では再接続がスケジュール
        //             されない
        // given (前提条件):
        let mut state = ReconnectState::new();
        state.on_connecting();
        state.on_open();

        // when (操作):
        state.on_clean_close();

        // then (期待する結果):
        assert_eq!(state.status(), ConnectionStatus::Closed);
        assert_eq!(state.attempts(), 0);
    }

    #[test]
    fn test_reset_after_gave_up() {
        // テスト項目: GaveUp 後の手動リトライで状態と試行カウンタが
        //             リセットされる
        // given (前提条件):
        let mut state = ReconnectState::new();
        for _ in 0..6 {
            state.on_unclean_close();
        }
        assert_eq!(state.status(), ConnectionStatus::GaveUp);

        // when (操作):
        state.reset();

        // then (期待する結果):
        assert_eq!(state.status(), ConnectionStatus::Idle);
        assert_eq!(state.attempts(), 0);
        assert_eq!(
            state.on_unclean_close(),
            Some(Duration::from_millis(1000))
        );
    }

    #[test]
    fn test_reconnect_delay_is_capped() {
        // テスト項目: 遅延は 10000 ms で頭打ちになる
        // given (前提条件):

        // when (操作):
        let delay = reconnect_delay(30);

        // then (期待する結果):
        assert_eq!(delay, Duration::from_millis(10000));
    }

    #[test]
    fn test_chat_log_replace_history_is_wholesale() {
        // テスト項目: history はローカルのメッセージリストを丸ごと
        //             置き換える（マージしない）
        // given (前提条件):
        let mut log = ChatLog::new();
        log.append(create_test_dto("alice", "old", 1));

        // when (操作):
        log.replace_history(vec![
            create_test_dto("bob", "new-1", 2),
            create_test_dto("bob", "new-2", 3),
        ]);

        // then (期待する結果):
        assert_eq!(log.len(), 2);
        assert_eq!(log.messages()[0].message, "new-1");
        assert_eq!(log.messages()[1].message, "new-2");
    }

    #[test]
    fn test_chat_log_discards_duplicate_echo() {
        // テスト項目: (timestamp, username, body) が三重一致するメッセージは
        //             重複として破棄される
        // given (前提条件):
        let mut log = ChatLog::new();
        log.append(create_test_dto("alice", "hi", 1000));

        // when (操作):
        let appended = log.append(create_test_dto("alice", "hi", 1000));

        // then (期待する結果):
        assert!(!appended);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_chat_log_keeps_messages_differing_in_one_field() {
        // テスト項目: 三重一致しないメッセージは重複扱いにならない
        // given (前提条件):
        let mut log = ChatLog::new();
        log.append(create_test_dto("alice", "hi", 1000));

        // when (操作):
        let same_text_later = log.append(create_test_dto("alice", "hi", 2000));
        let other_sender = log.append(create_test_dto("bob", "hi", 1000));
        let other_body = log.append(create_test_dto("alice", "yo", 1000));

        // then (期待する結果):
        assert!(same_text_later);
        assert!(other_sender);
        assert!(other_body);
        assert_eq!(log.len(), 4);
    }
}
