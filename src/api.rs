// REST surface over the book store

use crate::models::{Book, BookInput};
use crate::query::BookQuery;
use crate::store::BookStore;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use eyre::Result;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info};

/// Shared handler state. One request runs to completion while holding the
/// store; SQLite serializes writes underneath.
pub struct AppState {
    store: Mutex<BookStore>,
}

impl AppState {
    pub fn new(store: BookStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }
}

/// Build the axum router with all book routes.
pub fn router(state: Arc<AppState>) -> axum::Router {
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    axum::Router::new()
        .route("/api/books", get(list_books).post(create_book))
        .route(
            "/api/books/:id",
            get(get_book).put(update_book).delete(delete_book),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(store: BookStore, addr: SocketAddr) -> Result<()> {
    let router = router(Arc::new(AppState::new(store)));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}

/// Error response body
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn internal_error(err: eyre::Report) -> ApiError {
    error!("Internal error: {:#}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

fn not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Not found".to_string(),
        }),
    )
}

fn lock_store(state: &AppState) -> Result<MutexGuard<'_, BookStore>, ApiError> {
    state
        .store
        .lock()
        .map_err(|_| internal_error(eyre::eyre!("Store mutex poisoned")))
}

async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookQuery>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let store = lock_store(&state)?;
    let books = store.list(&query).map_err(internal_error)?;
    Ok(Json(books))
}

async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, ApiError> {
    let store = lock_store(&state)?;
    let book = store.get(id).map_err(internal_error)?;
    book.map(Json).ok_or_else(not_found)
}

#[derive(Serialize)]
struct Created {
    id: i64,
}

async fn create_book(
    State(state): State<Arc<AppState>>,
    Json(input): Json<BookInput>,
) -> Result<Json<Created>, ApiError> {
    if input.title.trim().is_empty() || input.author.trim().is_empty() {
        return Err(bad_request("Missing fields"));
    }

    let store = lock_store(&state)?;
    let id = store.create(&input).map_err(internal_error)?;
    Ok(Json(Created { id }))
}

async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<BookInput>,
) -> Result<StatusCode, ApiError> {
    // No existence check: updating an unknown id succeeds with zero rows.
    let store = lock_store(&state)?;
    store.update(id, &input).map_err(internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let store = lock_store(&state)?;
    store.delete(id).map_err(internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}
