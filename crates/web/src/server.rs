//! Harness web server implementation

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use testdeck_common::issue::IssueDraft;
use testdeck_common::notes::{NoteStore, TestingNote};
use testdeck_common::{filter_by_role, parse_scenarios, Error, Scenario};

use crate::config::WebConfig;
use crate::session::{DeviceKind, HarnessSession, ScenarioProgress};

/// Shared server state
pub struct AppState {
    pub cfg: WebConfig,
    /// Session registry: session id -> harness session
    sessions: RwLock<HashMap<Uuid, HarnessSession>>,
    notes: Arc<dyn NoteStore>,
}

impl AppState {
    pub fn new(cfg: WebConfig, notes: Arc<dyn NoteStore>) -> Self {
        Self {
            cfg,
            sessions: RwLock::new(HashMap::new()),
            notes,
        }
    }

    /// Read and parse the scenario document.
    ///
    /// A document that cannot be read surfaces as a single harness-level
    /// error; no partial state is ever returned.
    fn load_scenarios(&self) -> Result<Vec<Scenario>, Error> {
        let path = &self.cfg.scenarios_path;
        let markdown =
            std::fs::read_to_string(path).map_err(|e| Error::DocumentUnavailable {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(parse_scenarios(&markdown))
    }
}

/// Build the harness router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(health))
        .route("/user-testing-scenarios.md", get(raw_document))
        .route("/api/config", get(get_config))
        .route("/api/scenarios", get(list_scenarios))
        .route("/api/scenarios/:role", get(list_scenarios_for_role))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/select", post(select_scenario))
        .route("/api/sessions/:id/toggle", post(toggle_step))
        .route("/api/sessions/:id/device", post(set_device))
        .route("/api/sessions/:id/reload", post(reload_frame))
        .route("/api/issue-link", post(build_issue_link))
        .route("/api/notes", get(list_notes).post(submit_note));

    if let Some(static_dir) = &state.cfg.static_dir {
        info!("Serving static files from {}", static_dir.display());
        router = router.fallback_service(ServeDir::new(static_dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ============================================================================
// Request/response types
// ============================================================================

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct HarnessConfigResponse {
    app_url: String,
    issue_repo: String,
    issue_label: String,
    version: &'static str,
}

#[derive(Debug, Deserialize)]
struct CreateSessionRequest {
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SelectRequest {
    scenario_id: String,
}

#[derive(Debug, Deserialize)]
struct ToggleRequest {
    scenario_id: String,
    step_index: usize,
}

#[derive(Debug, Deserialize)]
struct DeviceRequest {
    device: DeviceKind,
}

#[derive(Debug, Serialize)]
struct IssueLinkResponse {
    url: String,
}

/// Session snapshot with progress computed against the live scenario list.
#[derive(Debug, Serialize)]
struct SessionView {
    id: Uuid,
    role: String,
    device: DeviceKind,
    frame_width: u32,
    reload_count: u64,
    created_at: i64,
    progress: Vec<ScenarioProgress>,
}

fn session_view(session: &HarnessSession, scenarios: &[Scenario]) -> SessionView {
    let visible = filter_by_role(scenarios, &session.role);
    SessionView {
        id: session.id,
        role: session.role.clone(),
        device: session.device,
        frame_width: session.device.frame_width(),
        reload_count: session.reload_count,
        created_at: session.created_at,
        progress: visible.iter().map(|s| session.progress_for(s)).collect(),
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let message = message.into();
    warn!("{}", message);
    (status, Json(ErrorBody { error: message })).into_response()
}

fn map_error(err: Error) -> Response {
    match &err {
        Error::DocumentUnavailable { .. } => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        Error::EmptyNote => error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        Error::SessionNotFound(_) | Error::ScenarioNotFound(_) => {
            error_response(StatusCode::NOT_FOUND, err.to_string())
        }
        _ => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": testdeck_common::VERSION,
    }))
}

/// The scenario document exactly as written, for frontends that parse it
/// themselves.
async fn raw_document(State(state): State<Arc<AppState>>) -> Response {
    match std::fs::read_to_string(&state.cfg.scenarios_path) {
        Ok(markdown) => ([("content-type", "text/markdown")], markdown).into_response(),
        Err(e) => map_error(Error::DocumentUnavailable {
            path: state.cfg.scenarios_path.display().to_string(),
            reason: e.to_string(),
        }),
    }
}

async fn get_config(State(state): State<Arc<AppState>>) -> Json<HarnessConfigResponse> {
    let tracker = &state.cfg.issue_tracker;
    Json(HarnessConfigResponse {
        app_url: state.cfg.app_url.clone(),
        issue_repo: format!("{}/{}", tracker.org, tracker.repo),
        issue_label: tracker.label.clone(),
        version: testdeck_common::VERSION,
    })
}

async fn list_scenarios(State(state): State<Arc<AppState>>) -> Response {
    match state.load_scenarios() {
        Ok(scenarios) => Json(scenarios).into_response(),
        Err(e) => map_error(e),
    }
}

/// Role-filtered scenario list. An unknown role degrades to the full list
/// rather than a blank harness.
async fn list_scenarios_for_role(
    State(state): State<Arc<AppState>>,
    Path(role): Path<String>,
) -> Response {
    match state.load_scenarios() {
        Ok(scenarios) => Json(filter_by_role(&scenarios, &role)).into_response(),
        Err(e) => map_error(e),
    }
}

async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> Response {
    let scenarios = match state.load_scenarios() {
        Ok(s) => s,
        Err(e) => return map_error(e),
    };

    let role = req.role.unwrap_or_else(|| "admin".to_string());
    let session = HarnessSession::new(role);
    let view = session_view(&session, &scenarios);

    info!("Created session {} for role '{}'", session.id, session.role);
    state.sessions.write().await.insert(session.id, session);

    (StatusCode::CREATED, Json(view)).into_response()
}

async fn get_session(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Response {
    let scenarios = match state.load_scenarios() {
        Ok(s) => s,
        Err(e) => return map_error(e),
    };

    let sessions = state.sessions.read().await;
    match sessions.get(&id) {
        Some(session) => Json(session_view(session, &scenarios)).into_response(),
        None => map_error(Error::SessionNotFound(id.to_string())),
    }
}

async fn select_scenario(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectRequest>,
) -> Response {
    with_session(&state, id, |session| {
        session.tracker.select_scenario(&req.scenario_id);
    })
    .await
}

async fn toggle_step(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleRequest>,
) -> Response {
    with_session(&state, id, |session| {
        session.tracker.toggle_step(&req.scenario_id, req.step_index);
    })
    .await
}

async fn set_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<DeviceRequest>,
) -> Response {
    with_session(&state, id, |session| {
        session.device = req.device;
    })
    .await
}

async fn reload_frame(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Response {
    with_session(&state, id, |session| {
        session.reload_frame();
    })
    .await
}

/// Apply a mutation to a session and return its updated view.
async fn with_session<F>(state: &Arc<AppState>, id: Uuid, mutate: F) -> Response
where
    F: FnOnce(&mut HarnessSession),
{
    let scenarios = match state.load_scenarios() {
        Ok(s) => s,
        Err(e) => return map_error(e),
    };

    let mut sessions = state.sessions.write().await;
    match sessions.get_mut(&id) {
        Some(session) => {
            mutate(session);
            Json(session_view(session, &scenarios)).into_response()
        }
        None => map_error(Error::SessionNotFound(id.to_string())),
    }
}

/// Build an issue deep link from a draft. The link is returned to the
/// caller; this server never contacts the issue tracker.
async fn build_issue_link(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<IssueDraft>,
) -> Response {
    match state.cfg.issue_tracker.build_issue_url(&draft) {
        Some(url) => Json(IssueLinkResponse { url }).into_response(),
        None => map_error(Error::EmptyNote),
    }
}

async fn submit_note(
    State(state): State<Arc<AppState>>,
    Json(note): Json<TestingNote>,
) -> Response {
    match state.notes.submit_note(&note).await {
        Ok(ack) => (StatusCode::CREATED, Json(ack)).into_response(),
        Err(e) => map_error(e),
    }
}

async fn list_notes(State(state): State<Arc<AppState>>) -> Response {
    match state.notes.list_notes().await {
        Ok(notes) => Json(notes).into_response(),
        Err(e) => map_error(e),
    }
}
