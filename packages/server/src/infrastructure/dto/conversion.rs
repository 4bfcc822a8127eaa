//! Conversion logic between DTOs and domain entities.

use crate::domain::ChatMessage;
use crate::infrastructure::dto::websocket::{ChatMessageDto, ServerEvent};

impl From<ChatMessage> for ChatMessageDto {
    fn from(entity: ChatMessage) -> Self {
        Self {
            timestamp: entity.timestamp.value(),
            username: entity.username.into_string(),
            message: entity.body.into_string(),
        }
    }
}

impl From<&ChatMessage> for ServerEvent {
    fn from(entity: &ChatMessage) -> Self {
        Self::Message {
            username: entity.username.as_str().to_string(),
            message: entity.body.as_str().to_string(),
            timestamp: entity.timestamp.value(),
        }
    }
}
