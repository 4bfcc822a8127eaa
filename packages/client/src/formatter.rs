//! Message formatting utilities for client display.

use hiroba_server::infrastructure::dto::websocket::ChatMessageDto;
use hiroba_shared::time::timestamp_to_rfc3339;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the server greeting sent on connection accept
    pub fn format_connected(message: &str) -> String {
        format!("\n* {}\n", message)
    }

    /// Format the replayed message history shown after joining
    pub fn format_history(messages: &[ChatMessageDto]) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str("Recent messages:\n");

        if messages.is_empty() {
            output.push_str("(No messages yet)\n");
        } else {
            for message in messages {
                let timestamp_str = timestamp_to_rfc3339(message.timestamp);
                output.push_str(&format!(
                    "@{}: {} ({})\n",
                    message.username, message.message, timestamp_str
                ));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a broadcast chat message
    pub fn format_chat_message(from: &str, content: &str, sent_at: i64) -> String {
        let timestamp_str = timestamp_to_rfc3339(sent_at);
        format!("\n@{}: {} ({})\n", from, content, timestamp_str)
    }

    /// Format a join/leave announcement
    pub fn format_system(message: &str, timestamp: i64) -> String {
        let timestamp_str = timestamp_to_rfc3339(timestamp);
        format!("\n* {} ({})\n", message, timestamp_str)
    }

    /// Format a server-side error report
    pub fn format_error(message: &str) -> String {
        format!("\n! error: {}\n", message)
    }

    /// Format an unparseable server frame as raw text
    pub fn format_raw_message(text: &str) -> String {
        format!("\n{}\n", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_history_with_empty_list() {
        // テスト項目: 履歴が空の場合、プレースホルダが表示される
        // given (前提条件):
        let messages = vec![];

        // when (操作):
        let output = MessageFormatter::format_history(&messages);

        // then (期待する結果):
        assert!(output.contains("Recent messages:"));
        assert!(output.contains("(No messages yet)"));
    }

    #[test]
    fn test_format_history_lists_messages_in_order() {
        // テスト項目: 履歴が与えられた順（古い順）で整形される
        // given (前提条件):
        let messages = vec![
            ChatMessageDto {
                username: "alice".to_string(),
                message: "first".to_string(),
                timestamp: 1672531200000,
            },
            ChatMessageDto {
                username: "bob".to_string(),
                message: "second".to_string(),
                timestamp: 1672531201000,
            },
        ];

        // when (操作):
        let output = MessageFormatter::format_history(&messages);

        // then (期待する結果):
        let first = output.find("@alice: first").unwrap();
        let second = output.find("@bob: second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_format_chat_message() {
        // テスト項目: チャットメッセージが送信者・本文・時刻つきで整形される
        // given (前提条件):

        // when (操作):
        let output = MessageFormatter::format_chat_message("alice", "hi", 1672531200000);

        // then (期待する結果):
        assert!(output.contains("@alice: hi"));
        assert!(output.contains("2023-01-01T00:00:00"));
    }

    #[test]
    fn test_format_system() {
        // テスト項目: system アナウンスが時刻つきで整形される
        // given (前提条件):

        // when (操作):
        let output = MessageFormatter::format_system("alice joined the chat", 1672531200000);

        // then (期待する結果):
        assert!(output.contains("* alice joined the chat"));
        assert!(output.contains("2023-01-01T00:00:00"));
    }

    #[test]
    fn test_format_error() {
        // テスト項目: error イベントがエラー表示として整形される
        // given (前提条件):

        // when (操作):
        let output = MessageFormatter::format_error("Invalid message format");

        // then (期待する結果):
        assert!(output.contains("! error: Invalid message format"));
    }
}
