//! UseCase 層
//!
//! 接続ごとのプロトコル振る舞い（join・メッセージ送信・切断）を実装します。

mod disconnect_participant;
mod error;
mod join_chat;
mod send_message;

pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{JoinError, SendMessageError};
pub use join_chat::{HISTORY_PAGE_SIZE, JoinChatUseCase};
pub use send_message::SendMessageUseCase;
