//! ドメインエンティティ定義

use super::value_object::{MessageBody, Timestamp, Username};

/// チャットメッセージのエンティティ
///
/// 構築後は不変。タイムスタンプは受信時にサーバ側で割り当てられ、
/// クライアントから与えられることはない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// 送信者の表示名
    pub username: Username,
    /// メッセージ本文
    pub body: MessageBody,
    /// サーバ側で割り当てた受信時刻
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// 新しい ChatMessage を作成
    pub fn new(username: Username, body: MessageBody, timestamp: Timestamp) -> Self {
        Self {
            username,
            body,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_new() {
        // テスト項目: ChatMessage が与えたフィールドを保持する
        // given (前提条件):
        let username = Username::new("alice").unwrap();
        let body = MessageBody::new("Hello!").unwrap();
        let timestamp = Timestamp::new(1000);

        // when (操作):
        let message = ChatMessage::new(username.clone(), body.clone(), timestamp);

        // then (期待する結果):
        assert_eq!(message.username, username);
        assert_eq!(message.body, body);
        assert_eq!(message.timestamp, timestamp);
    }
}
