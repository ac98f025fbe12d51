//! Model Identifiers
//!
//! Well-known model families and their wire names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A model to run a request against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelType {
    /// GPT-3 completion models
    Gpt3(Gpt3),

    /// Code completion models
    Codex(Codex),

    /// Feature-specific models such as edits
    Feature(Feature),

    /// Chat models
    Chat(Chat),

    /// Any other model, passed through verbatim
    Custom(String),
}

/// GPT-3 completion models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gpt3 {
    /// Most capable GPT-3 model
    Davinci,
    Curie,
    Babbage,
    /// Fastest GPT-3 model
    Ada,
}

/// Code completion models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codex {
    Davinci,
    Cushman,
}

/// Feature-specific models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// The edit endpoint model
    Davinci,
}

/// Chat models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chat {
    ChatGpt,
    ChatGpt0301,
}

impl ModelType {
    /// Wire name sent in the `model` field
    pub fn model_name(&self) -> &str {
        match self {
            ModelType::Gpt3(Gpt3::Davinci) => "text-davinci-003",
            ModelType::Gpt3(Gpt3::Curie) => "text-curie-001",
            ModelType::Gpt3(Gpt3::Babbage) => "text-babbage-001",
            ModelType::Gpt3(Gpt3::Ada) => "text-ada-001",
            ModelType::Codex(Codex::Davinci) => "code-davinci-002",
            ModelType::Codex(Codex::Cushman) => "code-cushman-001",
            ModelType::Feature(Feature::Davinci) => "text-davinci-edit-001",
            ModelType::Chat(Chat::ChatGpt) => "gpt-3.5-turbo",
            ModelType::Chat(Chat::ChatGpt0301) => "gpt-3.5-turbo-0301",
            ModelType::Custom(name) => name,
        }
    }

    /// Default model for the edit endpoint
    pub fn edit_default() -> Self {
        ModelType::Feature(Feature::Davinci)
    }

    /// Default model for chat completions
    pub fn chat_default() -> Self {
        ModelType::Chat(Chat::ChatGpt)
    }
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::Gpt3(Gpt3::Davinci)
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model_name())
    }
}

impl From<&str> for ModelType {
    fn from(name: &str) -> Self {
        ModelType::Custom(name.to_string())
    }
}

impl From<String> for ModelType {
    fn from(name: String) -> Self {
        ModelType::Custom(name)
    }
}

impl From<Gpt3> for ModelType {
    fn from(model: Gpt3) -> Self {
        ModelType::Gpt3(model)
    }
}

impl From<Codex> for ModelType {
    fn from(model: Codex) -> Self {
        ModelType::Codex(model)
    }
}

impl From<Feature> for ModelType {
    fn from(model: Feature) -> Self {
        ModelType::Feature(model)
    }
}

impl From<Chat> for ModelType {
    fn from(model: Chat) -> Self {
        ModelType::Chat(model)
    }
}

impl Serialize for ModelType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.model_name())
    }
}

impl<'de> Deserialize<'de> for ModelType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ModelType::Custom)
    }
}
