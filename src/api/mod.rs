/// Backend module for chefchat
///
/// The chef's recommendations, orders and menu live behind a small set of HTTP
/// endpoints. This module defines the wire types and the [`ChefBackend`] trait the
/// session controller talks to.
///
/// # Architecture
///
/// - `http` - reqwest implementation against the real endpoints
///
/// # Usage
///
/// ```rust,no_run
/// use chefchat::api::{ChatRequest, ChefBackend, HttpBackend};
/// use chefchat::config::ClientConfig;
///
/// # async fn example() -> anyhow::Result<()> {
/// let backend = HttpBackend::new(&ClientConfig::from_env()?)?;
/// let reply = backend
///     .chat(&ChatRequest {
///         message: "Recommend me some spicy dishes".into(),
///         history: Vec::new(),
///         use_weather_time: false,
///     })
///     .await?;
/// println!("{}", reply.text);
/// # Ok(())
/// # }
/// ```
mod http;

pub use http::HttpBackend;

use crate::types::{ChatMessage, FoodId, FoodItem, MenuEntry, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a readable response.
    #[error("network failure: {0}")]
    Network(String),

    /// The backend answered, but the answer says the operation failed.
    #[error("backend error: {0}")]
    Application(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Application(format!("malformed response: {err}"))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// One prior message as the backend sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl From<&ChatMessage> for HistoryEntry {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<HistoryEntry>,
    pub use_weather_time: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatReply {
    pub text: String,
    pub foods: Vec<FoodItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderRequest {
    pub food_id: FoodId,
    pub quantity: u32,
}

impl OrderRequest {
    pub fn new(food_id: FoodId, quantity: u32) -> Self {
        Self { food_id, quantity }
    }
}

/// The chef's endpoints. `HttpBackend` is the production implementation; tests
/// plug in fakes.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait ChefBackend: Send + Sync {
    async fn login(&self, username: &str) -> ApiResult<()>;

    async fn chat(&self, request: &ChatRequest) -> ApiResult<ChatReply>;

    async fn reset_chat(&self) -> ApiResult<()>;

    async fn order(&self, request: &OrderRequest) -> ApiResult<()>;

    async fn menu(&self) -> ApiResult<Vec<MenuEntry>>;
}

// ---------------
// Response bodies
// ---------------

#[derive(Deserialize)]
struct ChatResponseBody {
    response: Option<String>,
    #[serde(default)]
    foods: Option<Vec<FoodItem>>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct SuccessBody {
    #[serde(default)]
    success: bool,
    error: Option<String>,
}

pub(crate) fn parse_chat_body(body: &str) -> ApiResult<ChatReply> {
    let parsed: ChatResponseBody = serde_json::from_str(body)?;
    if let Some(error) = parsed.error {
        return Err(ApiError::Application(error));
    }
    let text = parsed
        .response
        .ok_or_else(|| ApiError::Application("response missing from chat reply".into()))?;
    Ok(ChatReply {
        text,
        foods: parsed.foods.unwrap_or_default(),
    })
}

pub(crate) fn parse_success_body(body: &str, operation: &str) -> ApiResult<()> {
    let parsed: SuccessBody = serde_json::from_str(body)?;
    if parsed.success {
        Ok(())
    } else {
        Err(ApiError::Application(
            parsed
                .error
                .unwrap_or_else(|| format!("{operation} was not successful")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_body_with_foods() {
        let reply =
            parse_chat_body(r#"{"response":"Try these!","foods":[{"id":1,"name":"Hot Wings"}]}"#)
                .unwrap();
        assert_eq!(reply.text, "Try these!");
        assert_eq!(reply.foods.len(), 1);
        assert_eq!(reply.foods[0].name, "Hot Wings");
    }

    #[test]
    fn chat_body_with_null_foods() {
        let reply = parse_chat_body(r#"{"response":"Hello","foods":null}"#).unwrap();
        assert!(reply.foods.is_empty());
    }

    #[test]
    fn chat_body_error_field_is_application_error() {
        let err = parse_chat_body(r#"{"error":"index unavailable"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Application(msg) if msg == "index unavailable"));
    }

    #[test]
    fn chat_body_must_carry_response() {
        assert!(matches!(
            parse_chat_body("{}"),
            Err(ApiError::Application(_))
        ));
        assert!(matches!(
            parse_chat_body("<html>502</html>"),
            Err(ApiError::Application(_))
        ));
    }

    #[test]
    fn success_body() {
        assert!(parse_success_body(r#"{"success":true}"#, "order").is_ok());
        let err = parse_success_body(r#"{"success":false}"#, "order").unwrap_err();
        assert_eq!(err.to_string(), "backend error: order was not successful");
        let err = parse_success_body(r#"{"success":false,"error":"no session"}"#, "reset")
            .unwrap_err();
        assert_eq!(err.to_string(), "backend error: no session");
    }

    #[test]
    fn chat_request_wire_shape() {
        let request = ChatRequest {
            message: "spicy".into(),
            history: vec![HistoryEntry {
                role: Role::Assistant,
                content: "Hi".into(),
            }],
            use_weather_time: true,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "message": "spicy",
                "history": [{"role": "assistant", "content": "Hi"}],
                "use_weather_time": true
            })
        );
    }
}
