//! Request Bodies
//!
//! JSON bodies for the completion, edit and chat endpoints.

use crate::api::model::ModelType;
use serde::{Deserialize, Serialize};

/// Token limit used when the caller does not pick one
pub const DEFAULT_MAX_TOKENS: u32 = 16;

/// Text completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Text to continue
    pub prompt: String,

    /// Model identifier
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Deliver the result as a stream of data events
    pub stream: bool,

    /// Stop sequences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,

    /// End-user identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl CompletionRequest {
    /// Create a new non-streaming completion request
    pub fn new(prompt: impl Into<String>, model: impl Into<ModelType>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into().model_name().to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            stream: false,
            stop: None,
            user: None,
        }
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Enable or disable streaming
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Set stop sequences
    pub fn with_stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = Some(stop.into_iter().map(Into::into).collect());
        self
    }

    /// Set the end-user identifier
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

/// Edit request: rewrite `input` following `instruction`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRequest {
    pub instruction: String,
    pub model: String,
    pub input: String,
}

impl EditRequest {
    pub fn new(
        instruction: impl Into<String>,
        model: impl Into<ModelType>,
        input: impl Into<String>,
    ) -> Self {
        Self {
            instruction: instruction.into(),
            model: model.into().model_name().to_string(),
            input: input.into(),
        }
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Sets the behavior of the assistant
    System,

    /// Instructs the assistant
    User,

    /// Prior assistant responses
    Assistant,
}

/// A message in a chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation history, oldest first
    pub messages: Vec<ChatMessage>,

    /// Model identifier
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Deliver the result as a stream of data events
    pub stream: bool,

    /// Stop sequences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,

    /// End-user identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ChatRequest {
    /// Create a new non-streaming chat request
    pub fn new(messages: Vec<ChatMessage>, model: impl Into<ModelType>) -> Self {
        Self {
            messages,
            model: model.into().model_name().to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            stream: false,
            stop: None,
            user: None,
        }
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Enable or disable streaming
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Set stop sequences
    pub fn with_stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = Some(stop.into_iter().map(Into::into).collect());
        self
    }

    /// Set the end-user identifier
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::Chat;

    #[test]
    fn test_completion_request_serialization() {
        let request = CompletionRequest::new("Once upon a", "text-davinci-003").with_max_tokens(16);

        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"prompt":"Once upon a","model":"text-davinci-003","max_tokens":16,"stream":false}"#
        );
    }

    #[test]
    fn test_completion_request_optional_fields() {
        let request = CompletionRequest::new("Hi", ModelType::default())
            .with_stream(true)
            .with_stop(["\n", "END"])
            .with_user("user-42");

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["max_tokens"], 16);
        assert_eq!(value["stream"], true);
        assert_eq!(value["stop"], serde_json::json!(["\n", "END"]));
        assert_eq!(value["user"], "user-42");
        assert!(value.get("maxTokens").is_none());
    }

    #[test]
    fn test_edit_request_serialization() {
        let request = EditRequest::new(
            "Fix the spelling mistake",
            ModelType::edit_default(),
            "My nam is Adam",
        );

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "instruction": "Fix the spelling mistake",
                "model": "text-davinci-edit-001",
                "input": "My nam is Adam"
            })
        );
    }

    #[test]
    fn test_chat_request_preserves_order_and_roles() {
        let request = ChatRequest::new(
            vec![
                ChatMessage::system("You are terse."),
                ChatMessage::user("Hello"),
                ChatMessage::assistant("Hi."),
                ChatMessage::user("Bye"),
            ],
            Chat::ChatGpt,
        )
        .with_max_tokens(64);

        let value = serde_json::to_value(&request).unwrap();
        let roles: Vec<_> = value["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap().to_string())
            .collect();

        assert_eq!(roles, ["system", "user", "assistant", "user"]);
        assert_eq!(value["messages"][3]["content"], "Bye");
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["max_tokens"], 64);
        assert!(value.get("stop").is_none());
    }
}
