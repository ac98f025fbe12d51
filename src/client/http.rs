//! HTTP Transport
//!
//! Issues prepared requests, either buffered or as a stream of lines.

use crate::client::endpoint::PreparedRequest;
use crate::client::lines::Lines;
use crate::config::ClientConfig;
use crate::error::{OpenAiError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use reqwest::{Client, StatusCode};
use std::pin::Pin;

/// Lines of a streamed response body, in arrival order
pub type LineStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Sends prepared requests over the wire
#[async_trait]
pub trait Transport: Send + Sync {
    /// One round trip; returns the full body whatever the status code
    async fn send(&self, request: PreparedRequest) -> Result<Bytes>;

    /// Open a streamed response; fails unless the status is 200
    async fn send_streaming(&self, request: PreparedRequest) -> Result<LineStream>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Inner reqwest client
    client: Client,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| OpenAiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn request(&self, request: PreparedRequest) -> reqwest::RequestBuilder {
        tracing::debug!(endpoint = %request.endpoint, url = %request.url, "sending request");

        self.client
            .request(request.method, &request.url)
            .headers(request.headers)
            .body(request.body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: PreparedRequest) -> Result<Bytes> {
        let response = self.request(request).send().await?;
        tracing::debug!(status = %response.status(), "received response");

        Ok(response.bytes().await?)
    }

    async fn send_streaming(&self, request: PreparedRequest) -> Result<LineStream> {
        let response = self.request(request).send().await?;
        let status = response.status();
        tracing::debug!(status = %status, "opened response stream");

        if status != StatusCode::OK {
            return Err(OpenAiError::InvalidStatusCode {
                code: Some(status.as_u16()),
            });
        }

        Ok(Box::pin(Lines::new(response.bytes_stream())))
    }
}
