use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ChatError, Result};

/// Path of the chat route, relative to the endpoint base URL.
pub const CHAT_PATH: &str = "chat";

/// Request body sent to the chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Success body returned by the chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Something that turns a user message into an assistant reply.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<String>;
}

/// `POST {base}/chat` over HTTP.
///
/// No timeout is configured: a request waits until the endpoint answers or the
/// connection fails.
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    client: Client,
    url: Url,
}

impl HttpChatBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let url = chat_url(base_url)?;
        Ok(Self { client, url })
    }

    /// Full URL requests are posted to.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send(&self, request: &ChatRequest) -> Result<String> {
        let response = self
            .client
            .post(self.url.clone())
            .json(request)
            .send()
            .await
            .map_err(ChatError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status(status));
        }

        let body: ChatResponse = response.json().await.map_err(ChatError::Decode)?;
        Ok(body.response)
    }
}

/// Resolve the chat route against a base URL, tolerating a trailing slash or
/// a base that already ends in `/chat`.
pub fn chat_url(base_url: &str) -> Result<Url> {
    let invalid = |source| ChatError::InvalidEndpoint {
        url: base_url.to_string(),
        source,
    };

    let trimmed = base_url.trim().trim_end_matches('/');
    let base = Url::parse(&format!("{}/", trimmed)).map_err(invalid)?;
    if base
        .path()
        .trim_end_matches('/')
        .ends_with(&format!("/{}", CHAT_PATH))
    {
        return Url::parse(trimmed).map_err(invalid);
    }
    base.join(CHAT_PATH).map_err(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_url_appends_route() {
        let url = chat_url("http://127.0.0.1:5000").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/chat");
    }

    #[test]
    fn test_chat_url_with_trailing_slash_and_prefix() {
        let url = chat_url("https://example.com/widget/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/widget/chat");
    }

    #[test]
    fn test_chat_url_already_pointing_at_route() {
        let url = chat_url("http://localhost:8080/chat").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/chat");
    }

    #[test]
    fn test_chat_url_only_matches_whole_segment() {
        let url = chat_url("http://localhost:8080/wechat").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/wechat/chat");
    }

    #[test]
    fn test_chat_url_rejects_garbage() {
        let err = chat_url("not a url").unwrap_err();
        assert!(matches!(err, ChatError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_request_wire_shape() {
        let body = serde_json::to_string(&ChatRequest {
            message: "Hello".to_string(),
        })
        .unwrap();
        assert_eq!(body, r#"{"message":"Hello"}"#);
    }
}
