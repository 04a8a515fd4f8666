// 🌐 REST API with Axum
// Maps registry results onto HTTP: NotFound → 404, Conflict → 409, Validation → 400

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::entities::{CountrySwiftCodes, NewSwiftCode, SwiftCodeDetails, SwiftCodeRegistry};
use crate::error::{ErrorKind, LoadError, RegistryError};
use crate::loader;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: SwiftCodeRegistry,
}

impl AppState {
    pub fn new(registry: SwiftCodeRegistry) -> Self {
        Self { registry }
    }
}

/// Body of every plain acknowledgement and every error
#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.to_string(),
    })
}

#[derive(Debug, Serialize)]
struct LoadResponse {
    message: &'static str,
    count: usize,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    records: usize,
    #[serde(rename = "loadedAt", skip_serializing_if = "Option::is_none")]
    loaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct LoadParams {
    file: Option<String>,
}

// ============================================================================
// Errors
// ============================================================================

/// Error converted into `{"message": ...}` with a status code
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        let status = match err.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
        };
        ApiError::new(status, err.to_string())
    }
}

impl From<LoadError> for ApiError {
    fn from(err: LoadError) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, message = %self.message, "request failed");
        }
        (self.status, message(&self.message)).into_response()
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /health - Health check
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK",
        records: state.registry.len(),
        loaded_at: state.registry.loaded_at(),
    })
}

/// GET /v1/swift-codes/:swift_code - One record, plus branches for headquarters
async fn get_swift_code(
    State(state): State<AppState>,
    Path(swift_code): Path<String>,
) -> Result<Json<SwiftCodeDetails>, ApiError> {
    Ok(Json(state.registry.get_with_branches(&swift_code)?))
}

/// GET /v1/swift-codes/country/:country_iso2 - All records of a country
async fn get_country_swift_codes(
    State(state): State<AppState>,
    Path(country_iso2): Path<String>,
) -> Result<Json<CountrySwiftCodes>, ApiError> {
    Ok(Json(state.registry.list_by_country(&country_iso2)?))
}

/// POST /v1/swift-codes - Add a record
async fn add_swift_code(
    State(state): State<AppState>,
    payload: Result<Json<NewSwiftCode>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text()))?;

    let record = request.validate()?;
    state.registry.insert(record)?;

    Ok(message("SWIFT code added successfully."))
}

/// DELETE /v1/swift-codes/:swift_code - Remove a record
async fn delete_swift_code(
    State(state): State<AppState>,
    Path(swift_code): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.registry.delete(&swift_code)?;
    Ok(message("SWIFT code deleted successfully."))
}

/// Segment taken by the reload route; GET/DELETE on it still address the code `LOAD`
const LOAD_SEGMENT: &str = "load";

/// GET /v1/swift-codes/load - Lookup of the code spelled like the reload route
async fn get_load_swift_code(
    State(state): State<AppState>,
) -> Result<Json<SwiftCodeDetails>, ApiError> {
    get_swift_code(State(state), Path(LOAD_SEGMENT.to_string())).await
}

/// DELETE /v1/swift-codes/load - Deletion of the code spelled like the reload route
async fn delete_load_swift_code(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    delete_swift_code(State(state), Path(LOAD_SEGMENT.to_string())).await
}

/// POST /v1/swift-codes/load?file=... - Replace the dataset from a CSV file
async fn load_swift_codes(
    State(state): State<AppState>,
    Query(params): Query<LoadParams>,
) -> Result<Json<LoadResponse>, ApiError> {
    let file = params
        .file
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "File path is required."))?;

    let path = PathBuf::from(file.trim());
    tracing::info!(path = %path.display(), "reloading SWIFT codes");

    // Parsing happens off the async workers and outside the registry lock
    let records = tokio::task::spawn_blocking(move || loader::load_csv(&path))
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))??;

    let count = state.registry.adopt(records)?;

    Ok(Json(LoadResponse {
        message: "File parsed and data loaded successfully.",
        count,
    }))
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router; unmatched paths are served from `static_dir`
pub fn router(state: AppState, static_dir: impl Into<PathBuf>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/swift-codes", post(add_swift_code))
        .route(
            "/v1/swift-codes/load",
            post(load_swift_codes)
                .get(get_load_swift_code)
                .delete(delete_load_swift_code),
        )
        .route(
            "/v1/swift-codes/country/:country_iso2",
            get(get_country_swift_codes),
        )
        .route(
            "/v1/swift-codes/:swift_code",
            get(get_swift_code).delete(delete_swift_code),
        )
        .with_state(state);

    api_routes
        .fallback_service(ServeDir::new(static_dir.into()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
