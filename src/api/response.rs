//! Response Model
//!
//! Decoded API responses. The same shape serves completions, edits and chat,
//! buffered or streamed; [`Choice`] absorbs the differences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A decoded API response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Response ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Object type tag, e.g. `text_completion` or `chat.completion.chunk`
    pub object: String,

    /// Creation timestamp in unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,

    /// Model used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Candidate outputs
    pub choices: Vec<Choice>,

    /// Token usage, only present on buffered responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl Response {
    /// Text of the first choice
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(Choice::text)
    }

    /// Creation time, if the server sent a valid timestamp
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }
}

/// One candidate output.
///
/// Serializes back to the wire shape it was read from: `text`, `delta` or
/// `message` according to [`ChoiceContent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawChoice", into = "RawChoice")]
pub struct Choice {
    /// Choice index
    pub index: u32,

    /// Where the text came from, resolved at decode time
    pub content: ChoiceContent,

    /// Finish reason (set on the final chunk when streaming)
    pub finish_reason: Option<String>,
}

impl Choice {
    /// Candidate text, empty when the payload carried none
    pub fn text(&self) -> &str {
        self.content.as_str()
    }
}

/// Source of a choice's text.
///
/// Resolution order is fixed: a direct `text` field, then `delta.content`
/// (streamed chat), then `message.content` (buffered chat). The first one
/// present wins, even if it is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChoiceContent {
    /// Completion and edit responses
    Text(String),

    /// Streamed chat fragment
    Delta(String),

    /// Buffered chat message
    Message(String),

    /// None of the above were present
    #[default]
    Empty,
}

impl ChoiceContent {
    fn resolve(
        text: Option<String>,
        delta: Option<RawMessage>,
        message: Option<RawMessage>,
    ) -> Self {
        if let Some(text) = text {
            return ChoiceContent::Text(text);
        }
        if let Some(content) = delta.and_then(|d| d.content) {
            return ChoiceContent::Delta(content);
        }
        if let Some(content) = message.and_then(|m| m.content) {
            return ChoiceContent::Message(content);
        }
        ChoiceContent::Empty
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChoiceContent::Text(s) | ChoiceContent::Delta(s) | ChoiceContent::Message(s) => s,
            ChoiceContent::Empty => "",
        }
    }

    /// Append a streamed fragment.
    ///
    /// The first fragment with a source fixes the variant; later fragments
    /// only contribute their text.
    pub fn append(&mut self, fragment: &ChoiceContent) {
        match self {
            ChoiceContent::Empty => *self = fragment.clone(),
            ChoiceContent::Text(s) | ChoiceContent::Delta(s) | ChoiceContent::Message(s) => {
                s.push_str(fragment.as_str())
            }
        }
    }
}

/// Wire shape of a choice before resolution
#[derive(Serialize, Deserialize)]
struct RawChoice {
    #[serde(default)]
    index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delta: Option<RawMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<RawMessage>,
    finish_reason: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct RawMessage {
    content: Option<String>,
}

impl RawMessage {
    fn with_content(content: String) -> Option<Self> {
        Some(Self {
            content: Some(content),
        })
    }
}

impl From<RawChoice> for Choice {
    fn from(raw: RawChoice) -> Self {
        Self {
            index: raw.index,
            content: ChoiceContent::resolve(raw.text, raw.delta, raw.message),
            finish_reason: raw.finish_reason,
        }
    }
}

impl From<Choice> for RawChoice {
    fn from(choice: Choice) -> Self {
        let mut raw = RawChoice {
            index: choice.index,
            text: None,
            delta: None,
            message: None,
            finish_reason: choice.finish_reason,
        };
        match choice.content {
            ChoiceContent::Text(text) => raw.text = Some(text),
            ChoiceContent::Delta(content) => raw.delta = RawMessage::with_content(content),
            ChoiceContent::Message(content) => raw.message = RawMessage::with_content(content),
            ChoiceContent::Empty => {}
        }
        raw
    }
}

/// Token usage information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt tokens
    pub prompt_tokens: u32,

    /// Completion tokens
    pub completion_tokens: u32,

    /// Total tokens
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(json: &str) -> Choice {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_completion_response_deserialization() {
        let json = r#"{
            "object": "text_completion",
            "model": "text-davinci-003",
            "choices": [{"text": " time", "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 4, "completion_tokens": 1, "total_tokens": 5}
        }"#;

        let response: Response = serde_json::from_str(json).unwrap();
        assert_eq!(response.object, "text_completion");
        assert_eq!(response.model.as_deref(), Some("text-davinci-003"));
        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.choices[0].text(), " time");
        assert_eq!(response.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(
            response.usage,
            Some(Usage {
                prompt_tokens: 4,
                completion_tokens: 1,
                total_tokens: 5
            })
        );
        assert_eq!(response.id, None);
    }

    #[test]
    fn test_text_wins_over_delta_and_message() {
        let c = choice(
            r#"{"text": "direct", "delta": {"content": "d"}, "message": {"content": "m"}}"#,
        );
        assert_eq!(c.content, ChoiceContent::Text("direct".to_string()));
        assert_eq!(c.text(), "direct");
    }

    #[test]
    fn test_delta_wins_over_message() {
        let c = choice(
            r#"{"delta": {"role": "assistant", "content": "d"}, "message": {"content": "m"}}"#,
        );
        assert_eq!(c.content, ChoiceContent::Delta("d".to_string()));
    }

    #[test]
    fn test_message_content() {
        let c = choice(r#"{"index": 2, "message": {"role": "assistant", "content": "Hello!"}, "finish_reason": "stop"}"#);
        assert_eq!(c.content, ChoiceContent::Message("Hello!".to_string()));
        assert_eq!(c.index, 2);
    }

    #[test]
    fn test_no_source_is_empty() {
        let c = choice(r#"{"index": 0, "finish_reason": null}"#);
        assert_eq!(c.content, ChoiceContent::Empty);
        assert_eq!(c.text(), "");

        // A role-only delta carries no content and falls through
        let c = choice(r#"{"delta": {"role": "assistant"}}"#);
        assert_eq!(c.content, ChoiceContent::Empty);
    }

    #[test]
    fn test_empty_text_still_wins() {
        let c = choice(r#"{"text": "", "message": {"content": "m"}}"#);
        assert_eq!(c.content, ChoiceContent::Text(String::new()));
    }

    #[test]
    fn test_missing_choices_fails() {
        let err = serde_json::from_str::<Response>(r#"{"error": {"message": "bad key"}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_created_at() {
        let json = r#"{"id": "cmpl-1", "object": "text_completion", "created": 1673775462, "choices": []}"#;
        let response: Response = serde_json::from_str(json).unwrap();

        let created = response.created_at().unwrap();
        assert_eq!(created.timestamp(), 1673775462);
        assert_eq!(response.text(), None);
    }

    #[test]
    fn test_choice_serializes_to_its_source_field() {
        let delta = Choice {
            index: 1,
            content: ChoiceContent::Delta("Hel".to_string()),
            finish_reason: None,
        };
        assert_eq!(
            serde_json::to_value(&delta).unwrap(),
            serde_json::json!({"index": 1, "delta": {"content": "Hel"}, "finish_reason": null})
        );

        let empty = Choice {
            index: 0,
            content: ChoiceContent::Empty,
            finish_reason: Some("stop".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&empty).unwrap(),
            serde_json::json!({"index": 0, "finish_reason": "stop"})
        );
    }

    #[test]
    fn test_response_serialization_decodes_back() {
        let json = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1677652288,
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hi"}, "finish_reason": "stop"},
                {"index": 1, "text": "", "finish_reason": "length"}
            ],
            "usage": {"prompt_tokens": 9, "completion_tokens": 1, "total_tokens": 10}
        }"#;
        let response: Response = serde_json::from_str(json).unwrap();

        let encoded = serde_json::to_string(&response).unwrap();
        let decoded: Response = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, response);
        assert_eq!(decoded.choices[0].content, ChoiceContent::Message("Hi".to_string()));
        assert_eq!(decoded.choices[1].content, ChoiceContent::Text(String::new()));
        assert!(!encoded.contains("\"model\""));
    }

    #[test]
    fn test_append_keeps_first_source() {
        let mut content = ChoiceContent::Empty;
        content.append(&ChoiceContent::Empty);
        content.append(&ChoiceContent::Delta("Hel".to_string()));
        content.append(&ChoiceContent::Text("lo".to_string()));
        assert_eq!(content, ChoiceContent::Delta("Hello".to_string()));
    }
}
