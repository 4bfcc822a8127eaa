//! WebSocket ワイヤプロトコルの DTO 定義
//!
//! `type` フィールドで判別される JSON テキストフレーム。
//! フレーム種別は tagged enum としてモデル化し、網羅的にマッチする
//! （実行時のフィールド探りは行わない）。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ChatMessage, Timestamp};

/// 履歴・メッセージイベントに載るチャットメッセージの DTO
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessageDto {
    pub username: String,
    pub message: String,
    pub timestamp: i64,
}

/// Client → Server フレーム
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientFrame {
    /// 表示名の宣言（再 join は名前の付け替え）
    Join {
        #[serde(default)]
        username: String,
    },
    /// チャットメッセージの送信
    Message {
        #[serde(default)]
        username: String,
        message: String,
    },
}

/// 受信フレームの解析エラー
///
/// Display 文字列がそのまま error イベントとして送信者に返される。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameParseError {
    /// JSON として解析できない、または必須フィールドが欠けている
    #[error("Invalid message format")]
    InvalidFormat,

    /// `type` が join / message のいずれでもない
    #[error("Unknown message type")]
    UnknownType,
}

impl ClientFrame {
    /// 受信テキストをフレームに解析する
    ///
    /// 非 JSON 入力と未知の `type` を区別して報告する。
    pub fn parse(text: &str) -> Result<Self, FrameParseError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|_| FrameParseError::InvalidFormat)?;
        match value.get("type").and_then(serde_json::Value::as_str) {
            Some("join") | Some("message") => {
                serde_json::from_value(value).map_err(|_| FrameParseError::InvalidFormat)
            }
            Some(_) => Err(FrameParseError::UnknownType),
            None => Err(FrameParseError::InvalidFormat),
        }
    }
}

/// Server → Client イベント
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerEvent {
    /// 接続受付直後に一度だけ送られる
    Connection { message: String },
    /// join した接続にのみ送られる直近履歴（古い順）
    History { messages: Vec<ChatMessageDto> },
    /// 全接続にファンアウトされるチャットメッセージ
    Message {
        username: String,
        message: String,
        timestamp: i64,
    },
    /// join / leave などのアナウンス
    System { message: String, timestamp: i64 },
    /// 送信者にのみ返されるエラー通知
    Error { message: String },
}

impl ServerEvent {
    /// system イベントを作成
    pub fn system(message: impl Into<String>, timestamp: Timestamp) -> Self {
        Self::System {
            message: message.into(),
            timestamp: timestamp.value(),
        }
    }

    /// error イベントを作成
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// history イベントを作成（古い順を保つ）
    pub fn history(messages: Vec<ChatMessage>) -> Self {
        Self::History {
            messages: messages.into_iter().map(ChatMessageDto::from).collect(),
        }
    }

    /// JSON 文字列にシリアライズする
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("ServerEvent serialization never fails")
    }
}
