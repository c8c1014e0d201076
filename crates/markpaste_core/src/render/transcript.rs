//! Detection of chat transcripts stored as JSON.

use serde::{Deserialize, Serialize};

/// One turn of a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TranscriptShape {
    Bare(Vec<ChatMessage>),
    Wrapped { messages: Vec<ChatMessage> },
}

/// Parse `content` as a non-empty chat transcript.
///
/// Accepts either a JSON array of `{ "role", "content" }` objects or an
/// object with such an array under `messages`.
pub fn parse_transcript(content: &str) -> Option<Vec<ChatMessage>> {
    let trimmed = content.trim_start();
    if !trimmed.starts_with('[') && !trimmed.starts_with('{') {
        return None;
    }
    let messages = match serde_json::from_str::<TranscriptShape>(content).ok()? {
        TranscriptShape::Bare(messages) | TranscriptShape::Wrapped { messages } => messages,
    };
    (!messages.is_empty()).then_some(messages)
}
