//! Request Construction
//!
//! Resolves an endpoint and a body into a ready-to-send HTTP request.

use crate::config::ClientConfig;
use crate::error::{OpenAiError, Result};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use std::fmt;

/// Logical API endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Completions,
    Edits,
    ChatCompletions,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Completions => "/v1/completions",
            Endpoint::Edits => "/v1/edits",
            Endpoint::ChatCompletions => "/v1/chat/completions",
        }
    }

    pub fn method(&self) -> Method {
        Method::POST
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::Completions => "completions",
            Endpoint::Edits => "edits",
            Endpoint::ChatCompletions => "chat_completions",
        };
        f.write_str(name)
    }
}

/// A fully-formed outbound request
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub endpoint: Endpoint,
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Builds [`PreparedRequest`]s for one base URL and credential
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: String,
    authorization: Option<HeaderValue>,
}

impl RequestBuilder {
    /// Create a builder from a client configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let authorization = config
            .api_key
            .as_deref()
            .map(|key| {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", key))
                    .map_err(|e| OpenAiError::Config(format!("Invalid API key format: {}", e)))?;
                value.set_sensitive(true);
                Ok::<_, OpenAiError>(value)
            })
            .transpose()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request for `endpoint` carrying `body` as JSON.
    ///
    /// Field values are passed through unchecked.
    pub fn build<B: Serialize>(&self, endpoint: Endpoint, body: &B) -> Result<PreparedRequest> {
        let body = serde_json::to_vec(body).map_err(|e| OpenAiError::Generic(Box::new(e)))?;

        let mut headers = HeaderMap::new();
        if let Some(authorization) = &self.authorization {
            headers.insert(AUTHORIZATION, authorization.clone());
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(PreparedRequest {
            endpoint,
            method: endpoint.method(),
            url: format!("{}{}", self.base_url, endpoint.path()),
            headers,
            body: Bytes::from(body),
        })
    }
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("base_url", &self.base_url)
            .field("authorized", &self.authorization.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CompletionRequest, EditRequest, ModelType};

    #[test]
    fn test_build_completion_request() {
        let builder = RequestBuilder::new(&ClientConfig::new("sk-test")).unwrap();
        let body = CompletionRequest::new("Once upon a", "text-davinci-003").with_max_tokens(16);

        let request = builder.build(Endpoint::Completions, &body).unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "https://api.openai.com/v1/completions");
        assert_eq!(request.headers[AUTHORIZATION], "Bearer sk-test");
        assert!(request.headers[AUTHORIZATION].is_sensitive());
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        assert_eq!(
            &request.body[..],
            br#"{"prompt":"Once upon a","model":"text-davinci-003","max_tokens":16,"stream":false}"#
        );
    }

    #[test]
    fn test_no_token_no_authorization() {
        let builder = RequestBuilder::new(&ClientConfig::default()).unwrap();
        let body = EditRequest::new("Fix it", ModelType::edit_default(), "");

        let request = builder.build(Endpoint::Edits, &body).unwrap();
        assert!(request.headers.get(AUTHORIZATION).is_none());
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        assert_eq!(request.url, "https://api.openai.com/v1/edits");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ClientConfig::new("k").with_base_url("http://127.0.0.1:1234/");
        let builder = RequestBuilder::new(&config).unwrap();

        let request = builder.build(Endpoint::ChatCompletions, &serde_json::json!({})).unwrap();
        assert_eq!(request.url, "http://127.0.0.1:1234/v1/chat/completions");
    }

    #[test]
    fn test_invalid_token_is_config_error() {
        let err = RequestBuilder::new(&ClientConfig::new("bad\nkey")).unwrap_err();
        assert!(matches!(err, OpenAiError::Config(_)));
    }

    #[test]
    fn test_values_pass_through_unchecked() {
        let builder = RequestBuilder::new(&ClientConfig::default()).unwrap();
        let body = CompletionRequest::new("", "not a real model!").with_max_tokens(0);

        let request = builder.build(Endpoint::Completions, &body).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(value["prompt"], "");
        assert_eq!(value["model"], "not a real model!");
        assert_eq!(value["max_tokens"], 0);
    }
}
