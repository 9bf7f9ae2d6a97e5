use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, put},
};
use chrono::{Local, NaiveDate};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{MonthView, Planner, PlannerError, Recurrence, ScheduledEntry, color_for};

#[derive(Clone)]
pub struct AppState {
    planner: Arc<RwLock<Planner>>,
}

impl AppState {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(RwLock::new(planner)),
        }
    }

    fn planner(&self) -> Arc<RwLock<Planner>> {
        self.planner.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl From<PlannerError> for ApiError {
    fn from(value: PlannerError) -> Self {
        let message = value.to_string();
        match value {
            PlannerError::UnknownFormat(_) | PlannerError::EntryNotFound(_) => {
                ApiError::NotFound(message)
            }
            PlannerError::DuplicateFormat(_) | PlannerError::FormatInUse { .. } => {
                ApiError::Conflict(message)
            }
            PlannerError::InvalidArgument(_) | PlannerError::EmptyTitle => {
                ApiError::Invalid(message)
            }
            PlannerError::Persistence(_) => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct FormatPayload {
    name: String,
}

#[derive(Debug, Serialize)]
struct RenameResponse {
    name: String,
    entries_updated: usize,
}

#[derive(Debug, Deserialize)]
struct NewEntryPayload {
    title: String,
    date: NaiveDate,
    format: String,
    #[serde(default)]
    recurrence: Option<Recurrence>,
}

#[derive(Debug, Deserialize)]
struct ViewQuery {
    today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct ColorResponse {
    tag: String,
    hex: String,
    r: u8,
    g: u8,
    b: u8,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/formats", get(list_formats).post(add_format))
        // Catch-all so format names containing '/' stay addressable.
        .route("/formats/*name", put(rename_format).delete(remove_format))
        .route("/entries", get(list_entries).post(create_entries))
        .route("/entries/:id", delete(delete_entry))
        .route("/days/:date", get(entries_on_day))
        .route("/calendar/:year/:month", get(month_view))
        .route("/colors/:tag", get(tag_color))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, planner: Planner) -> std::io::Result<()> {
    let state = AppState::new(planner);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_formats(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let planner = state.planner();
    let formats = planner.read().formats()?;
    Ok(Json(formats))
}

async fn add_format(
    State(state): State<AppState>,
    Json(payload): Json<FormatPayload>,
) -> Result<(StatusCode, Json<Vec<String>>), ApiError> {
    let planner = state.planner();
    let formats = {
        let guard = planner.read();
        guard.add_format(&payload.name)?;
        guard.formats()?
    };
    Ok((StatusCode::CREATED, Json(formats)))
}

async fn rename_format(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<FormatPayload>,
) -> Result<Json<RenameResponse>, ApiError> {
    let planner = state.planner();
    let entries_updated = planner.read().rename_format(&name, &payload.name)?;
    Ok(Json(RenameResponse {
        name: payload.name.trim().to_string(),
        entries_updated,
    }))
}

async fn remove_format(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    let planner = state.planner();
    planner.read().remove_format(&name)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_entries(State(state): State<AppState>) -> Result<Json<Vec<ScheduledEntry>>, ApiError> {
    let planner = state.planner();
    let entries = planner.read().entries()?;
    Ok(Json(entries))
}

async fn create_entries(
    State(state): State<AppState>,
    Json(payload): Json<NewEntryPayload>,
) -> Result<(StatusCode, Json<Vec<ScheduledEntry>>), ApiError> {
    let planner = state.planner();
    let created = {
        let guard = planner.read();
        match payload.recurrence {
            Some(rule) => {
                guard.schedule_recurring(&payload.title, payload.date, &payload.format, rule)?
            }
            None => vec![guard.schedule(&payload.title, payload.date, &payload.format)?],
        }
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let planner = state.planner();
    planner.read().delete_entry(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn entries_on_day(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Vec<ScheduledEntry>>, ApiError> {
    let planner = state.planner();
    let entries = planner.read().entries_on(date)?;
    Ok(Json(entries))
}

async fn month_view(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<MonthView>, ApiError> {
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    let planner = state.planner();
    let view = planner.read().month_view_for(year, month, today)?;
    Ok(Json(view))
}

async fn tag_color(Path(tag): Path<String>) -> Json<ColorResponse> {
    let rgb = color_for(&tag);
    Json(ColorResponse {
        hex: rgb.hex(),
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
        tag,
    })
}
