use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use shared::{CreateBookResponse, FieldError, MessageResponse, ValidationErrorResponse};
use tracing::info;

use crate::db::{DbConnection, StoreError};
use crate::validation;

const MSG_NOT_FOUND: &str = "Buku tidak ditemukan";
const MSG_CREATED: &str = "Buku berhasil ditambahkan";
const MSG_UPDATED: &str = "Buku berhasil diperbarui";
const MSG_DELETED: &str = "Buku berhasil dihapus";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: DbConnection,
}

impl AppState {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

/// Route table for the buku API
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/buku", get(list_books).post(create_book))
        .route(
            "/buku/:id",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(state)
}

/// Axum handler function for GET /buku
async fn list_books(State(state): State<AppState>) -> Response {
    info!("GET /buku");

    match state.db.list_books().await {
        Ok(books) => (StatusCode::OK, Json(books)).into_response(),
        Err(e) => store_failure(e),
    }
}

/// Axum handler function for GET /buku/:id
async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("GET /buku/{}", id);

    let id = match validation::validate_path_id(&id) {
        Ok(id) => id,
        Err(errors) => return validation_failure(errors),
    };

    match state.db.get_book(id).await {
        Ok(Some(book)) => (StatusCode::OK, Json(book)).into_response(),
        Ok(None) => not_found(),
        Err(e) => store_failure(e),
    }
}

/// Axum handler function for POST /buku
async fn create_book(State(state): State<AppState>, body: Option<Json<Value>>) -> Response {
    info!("POST /buku");

    // A missing or malformed body validates as "every field absent"
    let body = body.map(|Json(v)| v).unwrap_or(Value::Null);
    let book = match validation::validate_create(&body) {
        Ok(book) => book,
        Err(errors) => return validation_failure(errors),
    };

    match state.db.insert_book(&book).await {
        Ok(id) => (
            StatusCode::OK,
            Json(CreateBookResponse {
                message: MSG_CREATED.to_string(),
                id,
            }),
        )
            .into_response(),
        Err(e) => store_failure(e),
    }
}

/// Axum handler function for PUT /buku/:id
async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<Value>>,
) -> Response {
    info!("PUT /buku/{}", id);

    let body = body.map(|Json(v)| v).unwrap_or(Value::Null);
    let (id, patch) = match validation::validate_update(&id, &body) {
        Ok(parsed) => parsed,
        Err(errors) => return validation_failure(errors),
    };

    match state.db.update_book(id, &patch).await {
        Ok(true) => message_ok(MSG_UPDATED),
        Ok(false) => not_found(),
        Err(e) => store_failure(e),
    }
}

/// Axum handler function for DELETE /buku/:id
async fn delete_book(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("DELETE /buku/{}", id);

    let id = match validation::validate_path_id(&id) {
        Ok(id) => id,
        Err(errors) => return validation_failure(errors),
    };

    match state.db.delete_book(id).await {
        Ok(true) => message_ok(MSG_DELETED),
        Ok(false) => not_found(),
        Err(e) => store_failure(e),
    }
}

fn message_ok(message: &str) -> Response {
    (
        StatusCode::OK,
        Json(MessageResponse {
            message: message.to_string(),
        }),
    )
        .into_response()
}

fn validation_failure(errors: Vec<FieldError>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ValidationErrorResponse { errors }),
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(MessageResponse {
            message: MSG_NOT_FOUND.to_string(),
        }),
    )
        .into_response()
}

fn store_failure(err: StoreError) -> Response {
    tracing::error!("Store error: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MessageResponse {
            message: err.to_string(),
        }),
    )
        .into_response()
}
