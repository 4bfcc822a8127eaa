//! UseCase 層のエラー型定義

use thiserror::Error;

use crate::domain::ValidationError;

/// join 処理のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinError {
    /// 表示名のバリデーション失敗（送信者にのみ報告される）
    #[error(transparent)]
    InvalidUsername(#[from] ValidationError),

    /// 対象のセッションが既に存在しない（no-op として扱う）
    #[error("session not found")]
    SessionNotFound,
}

/// メッセージ送信処理のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendMessageError {
    /// 本文のバリデーション失敗（送信者にのみ報告される）
    #[error(transparent)]
    InvalidBody(#[from] ValidationError),
}
