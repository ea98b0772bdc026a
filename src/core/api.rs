//! HTTP + WebSocket API for Tutor-0
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /session/new - Create new session
//! - GET /session/{id} - Profile snapshot
//! - POST /session/{id}/turn - Send a learner message
//! - GET /session/{id}/history - Stored turns
//! - DELETE /session/{id} - Drop session, profile and history
//! - WS /ws/{id} - Live updates
//!
//! Each session owns its own profile and history; engines and ports are shared.

use axum::{
    extract::{Path, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info};

use crate::core::{EmotionAnalysisEngine, ResponseOrchestrator, TurnOutcome, TutorSession};
use crate::types::{ConversationTurn, EmotionAnalysisRecord, ProfileSnapshot, ResponseSource};

/// Live update message
#[derive(Debug, Clone, Serialize)]
pub struct SessionUpdate {
    pub primary_emotion: String,
    pub educational_context: String,
    pub recommended_approach: String,
    pub source: ResponseSource,
    pub turn_count: u64,
}

/// Registered session
struct SessionEntry {
    session: Arc<Mutex<TutorSession>>,
    update_tx: broadcast::Sender<SessionUpdate>,
}

/// App state
pub struct AppState {
    engine: Arc<EmotionAnalysisEngine>,
    orchestrator: Arc<ResponseOrchestrator>,
    sessions: RwLock<HashMap<String, SessionEntry>>,
    next_session: AtomicU64,
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub profile: ProfileSnapshot,
    pub history_len: usize,
}

/// Add turn request
#[derive(Debug, Deserialize)]
pub struct AddTurnRequest {
    pub text: String,
}

/// Add turn response
#[derive(Debug, Serialize)]
pub struct AddTurnResponse {
    pub analysis: EmotionAnalysisRecord,
    pub response: String,
    pub source: ResponseSource,
    pub profile: ProfileSnapshot,
}

/// History response
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub turns: Vec<ConversationTurn>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

impl AppState {
    /// Empty session store around shared engines
    pub fn new(engine: Arc<EmotionAnalysisEngine>, orchestrator: Arc<ResponseOrchestrator>) -> Self {
        Self {
            engine,
            orchestrator,
            sessions: RwLock::new(HashMap::new()),
            next_session: AtomicU64::new(1),
        }
    }

    /// Live update receiver for a session, None if unknown
    pub async fn subscribe(&self, id: &str) -> Option<broadcast::Receiver<SessionUpdate>> {
        let sessions = self.sessions.read().await;
        sessions.get(id).map(|entry| entry.update_tx.subscribe())
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Create the API router
pub fn create_router(
    engine: Arc<EmotionAnalysisEngine>,
    orchestrator: Arc<ResponseOrchestrator>,
) -> Router {
    router_with_state(Arc::new(AppState::new(engine, orchestrator)))
}

/// Create the API router over an existing state
pub fn router_with_state(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session).delete(delete_session))
        .route("/session/:id/turn", post(add_turn))
        .route("/session/:id/history", get(get_history))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: state.session_count().await,
    })
}

/// Create new session
async fn create_session(State(state): State<Arc<AppState>>) -> Json<NewSessionResponse> {
    let seq = state.next_session.fetch_add(1, Ordering::Relaxed);
    let session_id = generate_session_id(seq);
    let (tx, _) = broadcast::channel(100);

    let entry = SessionEntry {
        session: Arc::new(Mutex::new(TutorSession::new(
            state.engine.clone(),
            state.orchestrator.clone(),
        ))),
        update_tx: tx,
    };

    state.sessions.write().await.insert(session_id.clone(), entry);
    info!(session = %session_id, "session created");

    Json(NewSessionResponse {
        session_id: session_id.clone(),
        websocket_url: format!("/ws/{}", session_id),
    })
}

/// Shared handle to a session, or 404
async fn session_handle(state: &AppState, id: &str) -> Result<Arc<Mutex<TutorSession>>, StatusCode> {
    let sessions = state.sessions.read().await;
    sessions
        .get(id)
        .map(|entry| entry.session.clone())
        .ok_or(StatusCode::NOT_FOUND)
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, StatusCode> {
    let handle = session_handle(&state, &id).await?;
    let session = handle.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(SessionStatusResponse {
        session_id: id,
        profile: session.profile().snapshot(),
        history_len: session.history().len(),
    }))
}

/// Drop a session. Its broadcast sender goes with it, which closes live sockets.
async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    match state.sessions.write().await.remove(&id) {
        Some(_) => {
            info!(session = %id, "session deleted");
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

/// Add turn to session
async fn add_turn(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AddTurnRequest>,
) -> Result<Json<AddTurnResponse>, StatusCode> {
    let (handle, update_tx) = {
        let sessions = state.sessions.read().await;
        let entry = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
        (entry.session.clone(), entry.update_tx.clone())
    };

    // Port calls block; keep them off the async workers
    let outcome = tokio::task::spawn_blocking(move || -> Result<TurnOutcome, StatusCode> {
        let mut session = handle.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        Ok(session.take_turn(&req.text))
    })
    .await
    .map_err(|e| {
        error!(error = %e, "turn task failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    let update = SessionUpdate {
        primary_emotion: outcome.analysis.primary_emotion.clone(),
        educational_context: outcome.analysis.educational_context.to_string(),
        recommended_approach: outcome.analysis.recommended_approach.to_string(),
        source: outcome.reply.source,
        turn_count: outcome.profile.turn_count,
    };
    let _ = update_tx.send(update);

    Ok(Json(AddTurnResponse {
        analysis: outcome.analysis,
        response: outcome.reply.text,
        source: outcome.reply.source,
        profile: outcome.profile,
    }))
}

/// Get stored turns
async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, StatusCode> {
    let handle = session_handle(&state, &id).await?;
    let session = handle.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(HistoryResponse {
        session_id: id,
        turns: session.history().turns().cloned().collect(),
    }))
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, StatusCode> {
    let rx = state.subscribe(&id).await.ok_or(StatusCode::NOT_FOUND)?;

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, rx).await;
    }))
}

/// Handle WebSocket connection
async fn handle_websocket(mut socket: WebSocket, mut rx: broadcast::Receiver<SessionUpdate>) {
    while let Ok(update) = rx.recv().await {
        let json = serde_json::to_string(&update).unwrap_or_default();
        if socket.send(Message::Text(json)).await.is_err() {
            break;
        }
    }
}

/// Generate session ID
fn generate_session_id(seq: u64) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    format!("session_{:x}_{}", millis, seq)
}

/// Run the API server
pub async fn run_server(
    addr: &str,
    engine: Arc<EmotionAnalysisEngine>,
    orchestrator: Arc<ResponseOrchestrator>,
) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(engine, orchestrator);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "tutor API listening");
    println!("Tutor-0 API running on {}", addr);
    println!("  POST /session/new          - Create session");
    println!("  GET  /session/:id          - Profile snapshot");
    println!("  POST /session/:id/turn     - Send message");
    println!("  GET  /session/:id/history  - Stored turns");
    println!("  DEL  /session/:id          - End session");
    println!("  WS   /ws/:id               - Live updates");
    println!("  GET  /health               - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
