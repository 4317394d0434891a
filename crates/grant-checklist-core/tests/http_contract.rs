//! Exercises the summary and chat clients against a local axum server that
//! plays the grant backend.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use grant_checklist_core::{
    ApiError, ChatClient, ChatMessage, ChatRole, Config, GrantSummary, SummaryClient, Transcript,
    FALLBACK_REPLY,
};

async fn spawn_backend(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config_for(addr: SocketAddr) -> Config {
    Config {
        api_base_url: Some(format!("http://{}", addr)),
        request_timeout_secs: Some(5),
        ..Config::new()
    }
}

async fn summary_handler(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let document = params.get("documentKey").cloned().unwrap_or_default();
    Json(json!({
        "data": {
            "GrantName": format!("Grant for {}", document),
            "EligibilityCriteria": [
                {"item": "Nonprofit", "description": "501(c)(3) status"},
                {"item": "Rural", "description": "Serve a rural area"}
            ],
            "RequiredDocuments": [
                {"item": "SF-424", "description": "Application form"}
            ],
            "ProjectNarrativeSections": [],
            "KeyDeadlines": [
                {"item": "Application due", "description": "June 1"}
            ]
        }
    }))
}

async fn chat_handler(Json(body): Json<Value>) -> Json<Value> {
    let message = body["message"].as_str().unwrap_or_default().to_string();
    let turns = body["history"].as_array().map(|h| h.len()).unwrap_or(0);
    let reply = if message == "What is the deadline?" {
        "The deadline is June 1.".to_string()
    } else {
        format!("{} ({} turns)", message, turns)
    };
    Json(json!({ "reply": reply }))
}

fn happy_backend() -> Router {
    Router::new()
        .route("/landing-page/nofo-summary", get(summary_handler))
        .route("/api/chatbot", post(chat_handler))
}

#[tokio::test]
async fn test_summary_fetch_transforms_sections() {
    let addr = spawn_backend(happy_backend()).await;
    let client = SummaryClient::new(&config_for(addr)).unwrap();

    let payload = client.fetch("doc 7/a.pdf").await.unwrap();
    let summary = GrantSummary::from_payload(&payload);

    assert_eq!(summary.grant_name, "Grant for doc 7/a.pdf");
    assert_eq!(
        summary.eligibility,
        "- **Nonprofit**: 501(c)(3) status\n- **Rural**: Serve a rural area"
    );
    assert_eq!(summary.documents, "- **SF-424**: Application form");
    assert_eq!(summary.narrative, "");
    assert_eq!(summary.deadlines, "- **Application due**: June 1");
}

#[tokio::test]
async fn test_summary_fetch_reports_status_errors() {
    let app = Router::new().route(
        "/landing-page/nofo-summary",
        get(|| async { (StatusCode::NOT_FOUND, "no such document") }),
    );
    let addr = spawn_backend(app).await;
    let client = SummaryClient::new(&config_for(addr)).unwrap();

    match client.fetch("missing").await {
        Err(ApiError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, "no such document");
        }
        other => panic!("expected status error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_summary_fetch_rejects_malformed_body() {
    let app = Router::new().route(
        "/landing-page/nofo-summary",
        get(|| async { Json(json!({ "GrantName": "Only a name" })) }),
    );
    let addr = spawn_backend(app).await;
    let client = SummaryClient::new(&config_for(addr)).unwrap();

    assert!(matches!(client.fetch("doc").await, Err(ApiError::Malformed(_))));
}

#[tokio::test]
async fn test_chat_round_trip_example() {
    let addr = spawn_backend(happy_backend()).await;
    let client = ChatClient::new(&config_for(addr)).unwrap();

    let mut transcript = Transcript::new();
    transcript.set_input("What is the deadline?");
    let request = transcript.submit().unwrap();
    transcript.complete(client.send(&request).await);

    assert_eq!(
        transcript.messages(),
        &[
            ChatMessage::user("What is the deadline?"),
            ChatMessage::bot("The deadline is June 1."),
        ]
    );
}

#[tokio::test]
async fn test_chat_sends_full_history() {
    let addr = spawn_backend(happy_backend()).await;
    let client = ChatClient::new(&config_for(addr)).unwrap();

    let mut transcript = Transcript::new();
    for question in ["first", "second"] {
        transcript.set_input(question);
        let request = transcript.submit().unwrap();
        transcript.complete(client.send(&request).await);
    }

    // The second request carried user, bot, user
    assert_eq!(transcript.messages()[3].content, "second (3 turns)");
}

#[tokio::test]
async fn test_chat_server_error_yields_fallback() {
    let app = Router::new().route(
        "/api/chatbot",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR.into_response() }),
    );
    let addr = spawn_backend(app).await;
    let client = ChatClient::new(&config_for(addr)).unwrap();

    let mut transcript = Transcript::new();
    transcript.set_input("hello");
    let request = transcript.submit().unwrap();
    let outcome = client.send(&request).await;
    assert!(matches!(outcome, Err(ApiError::Status { .. })));

    transcript.complete(outcome);
    assert_eq!(transcript.messages().len(), 2);
    assert_eq!(transcript.messages()[1].role, ChatRole::Bot);
    assert_eq!(transcript.messages()[1].content, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_chat_missing_reply_is_an_error() {
    let app = Router::new().route("/api/chatbot", post(|| async { Json(json!({ "answer": "x" })) }));
    let addr = spawn_backend(app).await;
    let client = ChatClient::new(&config_for(addr)).unwrap();

    let request = {
        let mut t = Transcript::new();
        t.set_input("hi");
        t.submit().unwrap()
    };
    assert!(matches!(client.send(&request).await, Err(ApiError::MissingReply)));
}

#[tokio::test]
async fn test_chat_non_json_body_is_malformed() {
    let app = Router::new().route("/api/chatbot", post(|| async { "plain text" }));
    let addr = spawn_backend(app).await;
    let client = ChatClient::new(&config_for(addr)).unwrap();

    let request = {
        let mut t = Transcript::new();
        t.set_input("hi");
        t.submit().unwrap()
    };
    assert!(matches!(client.send(&request).await, Err(ApiError::Malformed(_))));
}

#[tokio::test]
async fn test_chat_transport_failure_yields_fallback() {
    // Bind then drop a listener so the port is very likely closed
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let client = ChatClient::new(&config_for(addr)).unwrap();

    let mut transcript = Transcript::new();
    transcript.set_input("anyone there?");
    let request = transcript.submit().unwrap();
    let outcome = client.send(&request).await;
    assert!(matches!(outcome, Err(ApiError::Transport(_))));

    transcript.complete(outcome);
    assert_eq!(transcript.messages()[1].content, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let app = Router::new().route(
        "/api/chatbot",
        post(|headers: HeaderMap| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Json(json!({ "reply": auth }))
        }),
    );
    let addr = spawn_backend(app).await;
    let config = Config {
        api_token: Some("s3cret".to_string()),
        ..config_for(addr)
    };
    let client = ChatClient::new(&config).unwrap();

    let request = {
        let mut t = Transcript::new();
        t.set_input("hi");
        t.submit().unwrap()
    };
    assert_eq!(client.send(&request).await.unwrap(), "Bearer s3cret");
}
