//! Browser chat UI and JSON API for Hearth
//!
//! Serves a single-page chat client at `/` and a small API under `/api`
//! backed by one shared [`ChatSession`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod page;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use hearth_core::config::UiConfig;
use hearth_core::types::{
    agent_descriptors, AgentDescriptor, AgentId, ImageAttachment, Turn, UserInput,
};
use hearth_core::{AgentRouter, ChatSession, HearthError, Responder, Result, SessionState};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

/// Web server settings
#[derive(Clone, Debug)]
pub struct ChatServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port (0 picks a free port)
    pub port: u16,
    /// Largest accepted request body
    pub max_body_bytes: usize,
}

impl Default for ChatServerConfig {
    fn default() -> Self {
        UiConfig::default().into()
    }
}

impl From<UiConfig> for ChatServerConfig {
    fn from(ui: UiConfig) -> Self {
        Self {
            host: ui.host,
            port: ui.port,
            max_body_bytes: ui.max_body_bytes,
        }
    }
}

/// Chat UI server holding the shared session
#[derive(Clone)]
pub struct ChatServer {
    /// Server settings
    pub config: Arc<ChatServerConfig>,
    agent_router: Arc<AgentRouter>,
    responder: Arc<Responder>,
    session: Arc<Mutex<ChatSession>>,
}

/// Body of `POST /api/chat`
#[derive(Debug, Deserialize)]
pub struct ChatInput {
    /// Typed text
    #[serde(default)]
    pub text: String,
    /// Image as a data URL
    #[serde(default)]
    pub image: Option<String>,
}

/// Reply to `POST /api/chat`; `turn` is null for an empty submission
#[derive(Debug, Serialize)]
pub struct ChatOutput {
    /// The agent's reply
    pub turn: Option<Turn>,
}

/// Body of `PUT /api/location`
#[derive(Debug, Deserialize)]
pub struct LocationInput {
    /// Free-text location; blank clears it
    pub location: String,
}

/// Snapshot returned by `GET /api/session`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Conversation so far
    pub turns: Vec<Turn>,
    /// Send state
    pub state: SessionState,
    /// Agent handling the pending message, else the last one that replied
    pub active_agent: Option<AgentId>,
    /// Progress label while a response is pending
    pub progress_label: Option<&'static str>,
    /// Location hint
    pub location: Option<String>,
}

impl SessionView {
    fn of(session: &ChatSession) -> Self {
        let active_agent = session.active_agent();
        let progress_label = match session.state() {
            SessionState::AwaitingResponse => {
                Some(active_agent.unwrap_or(AgentId::Triage).descriptor().progress_label)
            }
            SessionState::Idle => None,
        };
        Self {
            turns: session.conversation().all().to_vec(),
            state: session.state(),
            active_agent,
            progress_label,
            location: session.location().map(str::to_string),
        }
    }
}

impl ChatServer {
    /// Create a server with a fresh session
    pub fn new(config: ChatServerConfig, agent_router: AgentRouter, responder: Responder) -> Self {
        Self {
            config: Arc::new(config),
            agent_router: Arc::new(agent_router),
            responder: Arc::new(responder),
            session: Arc::new(Mutex::new(ChatSession::new())),
        }
    }

    /// Shared session handle
    pub fn session(&self) -> Arc<Mutex<ChatSession>> {
        self.session.clone()
    }

    /// Build the axum router
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/api/agents", get(list_agents))
            .route("/api/session", get(get_session))
            .route("/api/location", put(set_location))
            .route("/api/chat", post(chat))
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes))
            .layer(TraceLayer::new_for_http())
            .with_state(self.clone())
    }

    /// Bind and serve in the background until Ctrl-C; returns the bound address
    pub async fn start(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let local = listener.local_addr()?;
        let router = self.router();
        tokio::spawn(async move {
            let served = axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await;
            if let Err(e) = served {
                tracing::error!("chat UI server stopped: {}", e);
            }
        });
        tracing::info!("chat UI listening on http://{}", local);
        Ok(local)
    }
}

/// JSON error response
#[derive(Debug)]
pub struct ApiError(HearthError);

impl From<HearthError> for ApiError {
    fn from(e: HearthError) -> Self {
        Self(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            HearthError::Busy(_) => StatusCode::CONFLICT,
            HearthError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self.0);
        }
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

async fn list_agents() -> Json<&'static [AgentDescriptor]> {
    Json(agent_descriptors())
}

async fn get_session(State(state): State<ChatServer>) -> Json<SessionView> {
    let session = state.session.lock().await;
    Json(SessionView::of(&session))
}

async fn set_location(
    State(state): State<ChatServer>,
    Json(input): Json<LocationInput>,
) -> StatusCode {
    state.session.lock().await.set_location(input.location);
    StatusCode::NO_CONTENT
}

async fn chat(
    State(state): State<ChatServer>,
    Json(input): Json<ChatInput>,
) -> std::result::Result<Json<ChatOutput>, ApiError> {
    let image = input
        .image
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .map(ImageAttachment::from_data_url)
        .transpose()?;
    let input = UserInput {
        text: input.text,
        image,
    };

    let pending = {
        let mut session = state.session.lock().await;
        session.begin(&state.agent_router, input)?
    };
    let Some(pending) = pending else {
        return Ok(Json(ChatOutput { turn: None }));
    };

    // Finish the exchange even if the client goes away mid-request.
    let exchange = tokio::spawn({
        let state = state.clone();
        async move {
            let reply = pending.respond(&state.responder).await;
            let mut session = state.session.lock().await;
            let turn = session.complete(pending, reply).map(Turn::clone);
            drop(session);
            turn
        }
    });
    let turn = match exchange.await {
        Ok(turn) => turn?,
        Err(e) => {
            state.session.lock().await.abandon();
            return Err(HearthError::other(format!("chat task failed: {}", e)).into());
        }
    };

    Ok(Json(ChatOutput { turn: Some(turn) }))
}
