use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Chat,
    Whisper,
}

/// A message delivered by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub user: String,
    pub kind: MessageKind,
    pub text: String,
}

impl InboundMessage {
    pub fn chat(user: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            kind: MessageKind::Chat,
            text: text.into(),
        }
    }

    pub fn is_chat_message(&self) -> bool {
        self.kind == MessageKind::Chat
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{InboundMessage, MessageKind};

    #[test]
    fn message_kind_is_snake_case() {
        let message = InboundMessage {
            user: "viewer".to_string(),
            kind: MessageKind::Whisper,
            text: "!quota".to_string(),
        };

        let serialized = match serde_json::to_value(&message) {
            Ok(value) => value,
            Err(error) => panic!("serialization failed: {error}"),
        };

        assert_eq!(
            serialized,
            json!({"user": "viewer", "kind": "whisper", "text": "!quota"})
        );
        assert!(!message.is_chat_message());
    }
}
