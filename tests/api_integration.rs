//! Integration tests for the HTTP API
//!
//! Tests endpoints with in-memory model ports

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tutor0::core::{
    create_router, router_with_state, AppState, EmotionAnalysisEngine, EmotionClassifier,
    ResponseOrchestrator, TextGenerator,
};
use tutor0::error::PortError;
use tutor0::types::{EmotionScore, ResponseSource};

struct Worried;

impl EmotionClassifier for Worried {
    fn classify(&self, _text: &str) -> Result<Vec<EmotionScore>, PortError> {
        Ok(vec![EmotionScore::new("fear", 0.77)])
    }
}

struct Calm;

impl TextGenerator for Calm {
    fn generate(&self, _prompt: &str) -> Result<String, PortError> {
        Ok("Tutor: Let's practise a few questions together so the exam feels familiar.".into())
    }
}

fn create_test_router() -> axum::Router {
    create_router(
        Arc::new(EmotionAnalysisEngine::new(Arc::new(Worried))),
        Arc::new(ResponseOrchestrator::new(Arc::new(Calm))),
    )
}

fn create_test_state() -> Arc<AppState> {
    Arc::new(AppState::new(
        Arc::new(EmotionAnalysisEngine::new(Arc::new(Worried))),
        Arc::new(ResponseOrchestrator::new(Arc::new(Calm))),
    ))
}

async fn delete_session(app: &axum::Router, id: &str) -> StatusCode {
    app.clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/session/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn new_session(app: &axum::Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/session/new")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["session_id"].as_str().unwrap().to_string()
}

async fn post_turn(app: &axum::Router, id: &str, text: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/session/{}/turn", id))
                .header("content-type", "application/json")
                .body(Body::from(serde_json::json!({ "text": text }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], tutor0::VERSION);
    assert_eq!(json["sessions_active"], 0);
}

#[tokio::test]
async fn test_create_session() {
    let app = create_test_router();
    let id = new_session(&app).await;
    assert!(id.starts_with("session_"));

    let response = app
        .oneshot(Request::builder().uri(format!("/session/{}", id)).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["profile"]["turn_count"], 0);
    assert_eq!(json["history_len"], 0);
}

#[tokio::test]
async fn test_session_not_found() {
    let app = create_test_router();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/session/nonexistent").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_turn(&app, "nonexistent", "hello").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_session_flow() {
    let app = create_test_router();
    let id = new_session(&app).await;

    let response = post_turn(&app, &id, "I'm nervous about my exam").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["analysis"]["primary_emotion"], "fear");
    assert_eq!(json["analysis"]["educational_context"], "anxiety_learning");
    assert_eq!(json["analysis"]["recommended_approach"], "learning_supportive");
    assert_eq!(json["source"], "generated");
    assert!(json["response"].as_str().unwrap().starts_with("Let's practise"));
    assert_eq!(json["profile"]["turn_count"], 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/session/{}/history", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let turns = json["turns"].as_array().unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0]["user_input"], "I'm nervous about my exam");
}

#[tokio::test]
async fn test_blank_turn_is_not_counted() {
    let app = create_test_router();
    let id = new_session(&app).await;

    let response = post_turn(&app, &id, "   ").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["source"], "empty_input");
    assert_eq!(json["analysis"]["educational_context"], "unknown");
    assert_eq!(json["profile"]["turn_count"], 0);
}

#[tokio::test]
async fn test_delete_session() {
    let app = create_test_router();
    let id = new_session(&app).await;
    let other = new_session(&app).await;
    post_turn(&app, &id, "I'm nervous about my exam").await;

    assert_eq!(delete_session(&app, &id).await, StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(Request::builder().uri(format!("/session/{}", id)).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(post_turn(&app, &id, "hello").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete_session(&app, &id).await, StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json(response).await["sessions_active"], 1);

    // The other session is untouched
    let response = post_turn(&app, &other, "My exam is tomorrow").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["profile"]["turn_count"], 1);
}

#[tokio::test]
async fn test_turn_broadcasts_update() {
    let state = create_test_state();
    let app = router_with_state(state.clone());
    let id = new_session(&app).await;

    let mut rx = state.subscribe(&id).await.expect("session exists");
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    let response = post_turn(&app, &id, "I'm nervous about my exam").await;
    assert_eq!(response.status(), StatusCode::OK);

    let update = rx.try_recv().expect("one update after a turn");
    assert_eq!(update.primary_emotion, "fear");
    assert_eq!(update.educational_context, "anxiety_learning");
    assert_eq!(update.recommended_approach, "learning_supportive");
    assert_eq!(update.source, ResponseSource::Generated);
    assert_eq!(update.turn_count, 1);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    post_turn(&app, &id, "What if I fail the test").await;
    assert_eq!(rx.try_recv().expect("second update").turn_count, 2);

    // Deleting the session closes the live channel
    assert_eq!(delete_session(&app, &id).await, StatusCode::NO_CONTENT);
    assert!(matches!(rx.recv().await, Err(RecvError::Closed)));
    assert!(state.subscribe(&id).await.is_none());
    assert_eq!(state.session_count().await, 0);
}
