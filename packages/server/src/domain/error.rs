//! ドメイン層のエラー型定義

use thiserror::Error;

/// 値オブジェクトのバリデーションエラー
///
/// 送信者にのみ error イベントとして報告され、接続は維持される。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username must be {max} characters or fewer")]
    UsernameTooLong { max: usize },

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Message must be {max} characters or fewer")]
    MessageTooLong { max: usize },
}

/// 永続化ストアのエラー
///
/// Session Protocol Handler の境界で捕捉・ログ出力され、
/// クライアントには一切露出しない。
#[derive(Debug, Error)]
pub enum StoreError {
    /// ストアに到達できない
    #[error("message store is unavailable")]
    Unavailable,

    /// 読み出しクエリの失敗
    #[error("message store query failed: {0}")]
    Query(String),

    /// 書き込みの失敗
    #[error("message store write failed: {0}")]
    Write(String),
}
