//! openai-lite - Lightweight OpenAI Client
//!
//! Completions, edits and chat over a thin async HTTP layer, with streamed
//! completions parsed line by line as they arrive.
//!
//! Every operation is an `async fn`. The `spawn_*` variants run the same
//! operation on the current tokio runtime and report through a handler that
//! is called exactly once.
//!
//! ```no_run
//! use openai_lite::OpenAiClient;
//!
//! # async fn run() -> openai_lite::error::Result<()> {
//! let client = OpenAiClient::new("sk-...")?;
//! let response = client.send_completion("Once upon a", "text-davinci-003", 16).await?;
//! println!("{}", response.text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub mod api;
pub mod client;
pub mod config;
pub mod error;

pub use api::{
    parse_line, ChatMessage, ChatRequest, ChatRole, Choice, ChoiceContent, CompletionRequest,
    EditRequest, ModelType, Response, StreamAccumulator, Usage, DEFAULT_MAX_TOKENS,
};
pub use client::{Endpoint, HttpTransport, LineStream, PreparedRequest, RequestBuilder, Transport};
pub use config::{ClientConfig, ConfigLoader};
pub use error::{OpenAiError, Result};

/// Responses decoded from a streamed body, in arrival order
pub type ResponseStream = Pin<Box<dyn Stream<Item = Result<Response>> + Send>>;

/// The main API client
pub struct OpenAiClient<T = HttpTransport> {
    /// Builds outbound requests
    builder: RequestBuilder,

    /// Sends them
    transport: Arc<T>,
}

impl<T> Clone for OpenAiClient<T> {
    fn clone(&self) -> Self {
        Self {
            builder: self.builder.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl OpenAiClient<HttpTransport> {
    /// Create a client authenticated with `api_key`
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Create a client from an explicit configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, transport)
    }

    /// Create a client from config files and environment variables
    pub fn from_env() -> Result<Self> {
        let config = ConfigLoader::new()?.into_config();
        if config.api_key.is_none() {
            return Err(OpenAiError::Config(format!(
                "No API key configured. Set {} or add api_key to a config file",
                config::API_KEY_ENV
            )));
        }
        Self::with_config(config)
    }
}

impl<T: Transport> OpenAiClient<T> {
    /// Create a client sending through a custom transport
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        Ok(Self {
            builder: RequestBuilder::new(&config)?,
            transport: Arc::new(transport),
        })
    }

    /// Send a completion for `prompt`
    pub async fn send_completion(
        &self,
        prompt: impl Into<String>,
        model: impl Into<ModelType>,
        max_tokens: u32,
    ) -> Result<Response> {
        let request = CompletionRequest::new(prompt, model).with_max_tokens(max_tokens);
        self.create_completion(request).await
    }

    /// Send a fully specified completion request; `stream` is forced off
    pub async fn create_completion(&self, request: CompletionRequest) -> Result<Response> {
        self.execute(Endpoint::Completions, &request.with_stream(false)).await
    }

    /// Ask for `input` to be rewritten following `instruction`
    pub async fn send_edit(
        &self,
        instruction: impl Into<String>,
        model: impl Into<ModelType>,
        input: impl Into<String>,
    ) -> Result<Response> {
        let request = EditRequest::new(instruction, model, input);
        self.execute(Endpoint::Edits, &request).await
    }

    /// Send a chat conversation
    pub async fn send_chat(
        &self,
        messages: Vec<ChatMessage>,
        model: impl Into<ModelType>,
        max_tokens: u32,
    ) -> Result<Response> {
        let request = ChatRequest::new(messages, model).with_max_tokens(max_tokens);
        self.create_chat(request).await
    }

    /// Send a fully specified chat request; `stream` is forced off
    pub async fn create_chat(&self, request: ChatRequest) -> Result<Response> {
        self.execute(Endpoint::ChatCompletions, &request.with_stream(false)).await
    }

    /// Stream a completion and collect every response
    pub async fn stream_completion(
        &self,
        prompt: impl Into<String>,
        model: impl Into<ModelType>,
        max_tokens: u32,
    ) -> Result<Vec<Response>> {
        self.stream_completion_with(prompt, model, max_tokens, |_| {}).await
    }

    /// Stream a completion, calling `on_data` for each response as it arrives.
    ///
    /// Returns everything received once the stream ends. On error nothing
    /// collected so far is returned.
    pub async fn stream_completion_with<F>(
        &self,
        prompt: impl Into<String>,
        model: impl Into<ModelType>,
        max_tokens: u32,
        on_data: F,
    ) -> Result<Vec<Response>>
    where
        F: FnMut(&Response),
    {
        let request = CompletionRequest::new(prompt, model).with_max_tokens(max_tokens);
        let stream = self.completion_stream(request).await?;
        collect_stream(stream, on_data).await
    }

    /// Stream a chat conversation and collect every response
    pub async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        model: impl Into<ModelType>,
        max_tokens: u32,
    ) -> Result<Vec<Response>> {
        self.stream_chat_with(messages, model, max_tokens, |_| {}).await
    }

    /// Stream a chat conversation, calling `on_data` for each response
    pub async fn stream_chat_with<F>(
        &self,
        messages: Vec<ChatMessage>,
        model: impl Into<ModelType>,
        max_tokens: u32,
        on_data: F,
    ) -> Result<Vec<Response>>
    where
        F: FnMut(&Response),
    {
        let request = ChatRequest::new(messages, model).with_max_tokens(max_tokens);
        let stream = self.chat_stream(request).await?;
        collect_stream(stream, on_data).await
    }

    /// Open a streamed completion; `stream` is forced on
    pub async fn completion_stream(&self, request: CompletionRequest) -> Result<ResponseStream> {
        self.open_stream(Endpoint::Completions, &request.with_stream(true)).await
    }

    /// Open a streamed chat completion; `stream` is forced on
    pub async fn chat_stream(&self, request: ChatRequest) -> Result<ResponseStream> {
        self.open_stream(Endpoint::ChatCompletions, &request.with_stream(true)).await
    }

    async fn execute<B: serde::Serialize>(&self, endpoint: Endpoint, body: &B) -> Result<Response> {
        let request = self.builder.build(endpoint, body)?;
        let bytes = self.transport.send(request).await?;

        serde_json::from_slice(&bytes).map_err(|e| OpenAiError::decoding(e, &bytes))
    }

    async fn open_stream<B: serde::Serialize>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> Result<ResponseStream> {
        let request = self.builder.build(endpoint, body)?;
        let lines = self.transport.send_streaming(request).await?;
        Ok(decode_lines(lines))
    }
}

impl<T: Transport + 'static> OpenAiClient<T> {
    /// Callback form of [`send_completion`](Self::send_completion)
    pub fn spawn_completion<H>(
        &self,
        prompt: impl Into<String>,
        model: impl Into<ModelType>,
        max_tokens: u32,
        handler: H,
    ) -> JoinHandle<()>
    where
        H: FnOnce(Result<Response>) + Send + 'static,
    {
        let client = self.clone();
        let request = CompletionRequest::new(prompt, model).with_max_tokens(max_tokens);
        tokio::spawn(async move { handler(client.create_completion(request).await) })
    }

    /// Callback form of [`send_edit`](Self::send_edit)
    pub fn spawn_edit<H>(
        &self,
        instruction: impl Into<String>,
        model: impl Into<ModelType>,
        input: impl Into<String>,
        handler: H,
    ) -> JoinHandle<()>
    where
        H: FnOnce(Result<Response>) + Send + 'static,
    {
        let client = self.clone();
        let (instruction, model, input) = (instruction.into(), model.into(), input.into());
        tokio::spawn(async move { handler(client.send_edit(instruction, model, input).await) })
    }

    /// Callback form of [`send_chat`](Self::send_chat)
    pub fn spawn_chat<H>(
        &self,
        messages: Vec<ChatMessage>,
        model: impl Into<ModelType>,
        max_tokens: u32,
        handler: H,
    ) -> JoinHandle<()>
    where
        H: FnOnce(Result<Response>) + Send + 'static,
    {
        let client = self.clone();
        let request = ChatRequest::new(messages, model).with_max_tokens(max_tokens);
        tokio::spawn(async move { handler(client.create_chat(request).await) })
    }

    /// Callback form of [`stream_completion_with`](Self::stream_completion_with)
    pub fn spawn_stream_completion<F, H>(
        &self,
        prompt: impl Into<String>,
        model: impl Into<ModelType>,
        max_tokens: u32,
        on_data: F,
        handler: H,
    ) -> JoinHandle<()>
    where
        F: FnMut(&Response) + Send + 'static,
        H: FnOnce(Result<Vec<Response>>) + Send + 'static,
    {
        let client = self.clone();
        let request = CompletionRequest::new(prompt, model).with_max_tokens(max_tokens);
        tokio::spawn(async move {
            let result = match client.completion_stream(request).await {
                Ok(stream) => collect_stream(stream, on_data).await,
                Err(e) => Err(e),
            };
            handler(result)
        })
    }
}

fn decode_lines(mut lines: LineStream) -> ResponseStream {
    Box::pin(async_stream::stream! {
        while let Some(line) = lines.next().await {
            match line {
                Ok(line) => {
                    if let Some(response) = parse_line(&line) {
                        yield Ok(response);
                    }
                }
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    })
}

async fn collect_stream<F>(mut stream: ResponseStream, mut on_data: F) -> Result<Vec<Response>>
where
    F: FnMut(&Response),
{
    let mut results = Vec::new();
    while let Some(response) = stream.next().await {
        let response = response?;
        on_data(&response);
        results.push(response);
    }
    Ok(results)
}
