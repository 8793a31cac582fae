//! HTTP surface: shared state, handlers, error mapping, and the router.
//!
//! Routes live under `/api` and translate requests into calls on the
//! [`TaskStore`]; store errors map onto HTTP statuses (`NotFound` → 404,
//! validation → 400, persistence → 500) with a JSON error body.
//!
//! The store sits behind a `tokio::sync::RwLock`, so every mutating
//! handler holds the write guard for its whole compute-then-persist
//! unit and the read-after-write guarantee holds across requests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use taskdeck_core::{NewTask, Task, TaskFilter, TaskId, TaskPatch};

use crate::store::{StoreError, TaskStore};

/// Shared application state: the task store behind a single lock.
pub struct AppState {
    store: RwLock<TaskStore>,
}

impl AppState {
    /// Wraps an opened store for sharing across handlers.
    #[must_use]
    pub fn new(store: TaskStore) -> Self {
        Self {
            store: RwLock::new(store),
        }
    }
}

/// JSON error body returned for every failed request.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Machine-readable error code.
    code: &'static str,
    /// Human-readable message.
    message: String,
}

/// An HTTP-mapped error: status plus JSON body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorBody {
                code: "NOT_FOUND",
                message: message.into(),
            },
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                code: "BAD_REQUEST",
                message: message.into(),
            },
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                code: "PERSISTENCE_FAILED",
                message: message.into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::not_found(err.to_string()),
            StoreError::Validation(_) => Self::bad_request(err.to_string()),
            StoreError::Persistence(_) => {
                tracing::error!(error = %err, "durable write failed");
                Self::internal(err.to_string())
            }
        }
    }
}

/// Body of `POST /api/tasks/reorder`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ReorderRequest {
    /// The complete desired ordering: position `i` becomes `order = i`.
    task_ids: Vec<TaskId>,
}

/// Body of a successful `DELETE /api/tasks/{id}`.
#[derive(Debug, Serialize)]
struct DeleteResponse {
    message: &'static str,
}

/// Parses a path segment into a [`TaskId`].
///
/// A string that is not a UUID can never name an existing task, so the
/// failure maps to 404 rather than 400.
fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found(format!("task with id {raw} not found")))
}

/// Decodes a request body, mapping every deserialization failure to 400.
///
/// axum's stock `Json` rejection answers 422 for shape mismatches; the
/// API contract wants a uniform 400 for malformed input.
fn decode_body<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// `POST /api/tasks` — create a task.
async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let input: NewTask = decode_body(body)?;
    let task = state.store.write().await.create(input)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /api/tasks` — list tasks, optionally filtered.
async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TaskFilter>,
) -> Json<Vec<Task>> {
    Json(state.store.read().await.find_all(&filter))
}

/// `GET /api/tasks/{id}` — fetch one task.
async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_task_id(&id)?;
    let store = state.store.read().await;
    Ok(Json(store.find_one(id)?.clone()))
}

/// `PATCH /api/tasks/{id}` — merge a partial update.
async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_task_id(&id)?;
    let patch: TaskPatch = decode_body(body)?;
    let task = state.store.write().await.update(id, patch)?;
    Ok(Json(task))
}

/// `DELETE /api/tasks/{id}` — remove a task.
async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_task_id(&id)?;
    state.store.write().await.remove(id)?;
    Ok(Json(DeleteResponse {
        message: "Task deleted successfully",
    }))
}

/// `POST /api/tasks/reorder` — rewrite the display ordering.
async fn reorder_tasks(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let request: ReorderRequest = decode_body(body)?;
    if request.task_ids.is_empty() {
        return Err(ApiError::bad_request("taskIds must not be empty"));
    }
    let tasks = state.store.write().await.reorder(&request.task_ids)?;
    Ok(Json(tasks))
}

/// Builds the full application router over the shared state.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/tasks", post(create_task).get(list_tasks))
        .route("/tasks/reorder", post(reorder_tasks))
        .route(
            "/tasks/{id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Starts the HTTP server on the given address and returns the bound
/// address and a join handle.
///
/// This is the primary entry point used by both `main.rs` and test code.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
    state: Arc<AppState>,
) -> Result<(SocketAddr, tokio::task::JoinHandle<()>), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "server error");
        }
    });

    Ok((bound_addr, handle))
}
