//! Integration tests for the reqwest backend against a mock chef server.

use chefchat::api::{ApiError, ChatRequest, ChefBackend, HistoryEntry, HttpBackend, OrderRequest};
use chefchat::config::ClientConfig;
use chefchat::storage::ProfileStore;
use chefchat::types::{FoodId, MessageKind, Role};
use chefchat::{ChefChat, Quantity};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> HttpBackend {
    let config = ClientConfig::default().with_api_base(server.uri());
    HttpBackend::new(&config).expect("client builds")
}

fn chat_request(message: &str) -> ChatRequest {
    ChatRequest {
        message: message.to_string(),
        history: vec![
            HistoryEntry {
                role: Role::User,
                content: "hi".into(),
            },
            HistoryEntry {
                role: Role::Assistant,
                content: "Hello!".into(),
            },
        ],
        use_weather_time: true,
    }
}

#[tokio::test]
async fn chat_posts_message_history_and_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "message": "Recommend me some spicy dishes",
            "history": [
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "Hello!"}
            ],
            "use_weather_time": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Try these!",
            "foods": [{"id": 1, "name": "Hot Wings", "description": "Fiery", "price": "₹249"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = backend_for(&server)
        .chat(&chat_request("Recommend me some spicy dishes"))
        .await
        .expect("chat succeeds");

    assert_eq!(reply.text, "Try these!");
    assert_eq!(reply.foods.len(), 1);
    assert_eq!(reply.foods[0].price_label(), "₹249");
}

#[tokio::test]
async fn chat_error_body_is_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "Pinecone unavailable"})),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .chat(&chat_request("hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Application(msg) if msg == "Pinecone unavailable"));
}

#[tokio::test]
async fn server_error_status_is_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .chat(&chat_request("hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Application(_)));
}

#[tokio::test]
async fn unreachable_server_is_network_failure() {
    let config = ClientConfig::default().with_api_base("http://127.0.0.1:9");
    let backend = HttpBackend::new(&config).unwrap();

    let err = backend.chat(&chat_request("hello")).await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "late"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig {
        request_timeout: Duration::from_millis(200),
        ..ClientConfig::default().with_api_base(server.uri())
    };
    let err = HttpBackend::new(&config)
        .unwrap()
        .chat(&chat_request("hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn order_posts_id_and_quantity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/order"))
        .and(body_json(json!({"food_id": 1, "quantity": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    backend_for(&server)
        .order(&OrderRequest::new(FoodId::Number(1), 2))
        .await
        .expect("order succeeds");
}

#[tokio::test]
async fn unsuccessful_order_is_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .order(&OrderRequest::new(FoodId::Text("dosa-7".into()), 1))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Application(_)));
}

#[tokio::test]
async fn reset_reports_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reset_chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "error": "session expired"})),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server).reset_chat().await.unwrap_err();

    assert_eq!(err.to_string(), "backend error: session expired");
}

#[tokio::test]
async fn login_and_menu() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "Asha"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/menu-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"category": "Breakfast", "name": "Poha", "description": "Flattened rice"},
            {"category": "Breakfast", "name": "Upma", "description": "Semolina"}
        ])))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    backend.login("Asha").await.expect("login succeeds");
    let menu = backend.menu().await.expect("menu loads");

    assert_eq!(menu.len(), 2);
    assert_eq!(menu[1].name, "Upma");
}

#[tokio::test]
async fn controller_over_http_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Try these!",
            "foods": [{"id": 1, "name": "Hot Wings"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let root = std::env::temp_dir()
        .join("chefchat-tests")
        .join(format!("http-e2e-{}", std::process::id()));
    let store = ProfileStore::new(root);
    let mut chat = ChefChat::new(Arc::new(backend_for(&server)), store.clone());

    chat.login("Asha").await.expect("login proceeds despite 500");
    chat.submit_message("Recommend me some spicy dishes")
        .await
        .unwrap();
    let notice = chat
        .place_order(FoodId::Number(1), Quantity::parse("2").unwrap())
        .await
        .unwrap();

    assert_eq!(notice.content, "🎉 Successfully ordered 2 Hot Wings(s)!");
    let kinds: Vec<MessageKind> = chat.session().history().iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        vec![MessageKind::Prompt, MessageKind::Reply, MessageKind::Notice]
    );
    store.clear().unwrap();
}
