//! API Module
//!
//! Request and response types plus streaming support.

pub mod model;
pub mod request;
pub mod response;
pub mod streaming;

pub use model::{Chat, Codex, Feature, Gpt3, ModelType};
pub use request::{
    ChatMessage, ChatRequest, ChatRole, CompletionRequest, EditRequest, DEFAULT_MAX_TOKENS,
};
pub use response::{Choice, ChoiceContent, Response, Usage};
pub use streaming::{parse_line, ChoiceAccumulator, StreamAccumulator, DATA_PREFIX};
