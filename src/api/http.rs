use super::{
    ApiError, ApiResult, ChatReply, ChatRequest, ChefBackend, OrderRequest, parse_chat_body,
    parse_success_body,
};
use crate::config::ClientConfig;
use crate::types::MenuEntry;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use tracing::debug;

pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
}

impl HttpBackend {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    // The browser's fetch owns timeouts on wasm.
    #[cfg(target_arch = "wasm32")]
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn send(&self, request: RequestBuilder, path: &str) -> ApiResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(path, %status, bytes = body.len(), "chef backend responded");
        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::Application(format!("{path} returned {status}: {body}")))
        }
    }

    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> ApiResult<String> {
        let request = self.client.post(self.config.endpoint(path)).json(payload);
        self.send(request, path).await
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ChefBackend for HttpBackend {
    async fn login(&self, username: &str) -> ApiResult<()> {
        self.post_json("/login", &LoginRequest { username }).await?;
        Ok(())
    }

    async fn chat(&self, request: &ChatRequest) -> ApiResult<ChatReply> {
        debug!(history = request.history.len(), "sending chat turn");
        let body = self.post_json("/chat", request).await?;
        parse_chat_body(&body)
    }

    async fn reset_chat(&self) -> ApiResult<()> {
        let request = self.client.post(self.config.endpoint("/reset_chat"));
        let body = self.send(request, "/reset_chat").await?;
        parse_success_body(&body, "reset")
    }

    async fn order(&self, request: &OrderRequest) -> ApiResult<()> {
        let body = self.post_json("/order", request).await?;
        parse_success_body(&body, "order")
    }

    async fn menu(&self) -> ApiResult<Vec<MenuEntry>> {
        let request = self.client.get(self.config.endpoint("/menu-data"));
        let body = self.send(request, "/menu-data").await?;
        Ok(serde_json::from_str(&body)?)
    }
}
