//! 値オブジェクト定義
//!
//! 表示名・メッセージ本文・タイムスタンプの値オブジェクト。
//! コンストラクタでバリデーションを行い、不正な値を持つインスタンスが
//! 存在しないことを保証します。

use std::fmt;

use super::error::ValidationError;

/// 表示名の最大文字数（トリム後）
pub const MAX_USERNAME_CHARS: usize = 50;

/// メッセージ本文の最大文字数（トリム後）
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// join 前のセッション、および空の表示名のフォールバック
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// 表示名の値オブジェクト
///
/// トリム後 1〜50 文字であることを保証します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// 新しい Username を作成（前後の空白はトリムされる）
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let trimmed = raw.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > MAX_USERNAME_CHARS {
            return Err(ValidationError::UsernameTooLong {
                max: MAX_USERNAME_CHARS,
            });
        }
        Ok(Self(trimmed))
    }

    /// 未 join セッション用のデフォルト表示名
    pub fn anonymous() -> Self {
        Self(ANONYMOUS_NAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// メッセージ本文の値オブジェクト
///
/// トリム後 1〜1000 文字であることを保証します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    /// 新しい MessageBody を作成（前後の空白はトリムされる）
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let trimmed = raw.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        if trimmed.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ValidationError::MessageTooLong {
                max: MAX_MESSAGE_CHARS,
            });
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix タイムスタンプ（ミリ秒、UTC）の値オブジェクト
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
