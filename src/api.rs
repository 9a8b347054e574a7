use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{error, info};

use crate::error::RepoError;
use crate::models::{Book, BookPatch, NewBook};
use crate::repo::BookRepo;

#[derive(Clone)]
struct AppState<R> {
    repo: R,
}

type ApiError = (StatusCode, String);

pub fn build_app<R>(repo: R) -> Router
where
    R: BookRepo + Send + Sync + Clone + 'static,
{
    Router::new()
        .route("/books", get(list_books::<R>).post(insert_book::<R>))
        .route(
            "/books/{id}",
            get(get_book::<R>)
                .put(update_book::<R>)
                .delete(soft_delete_book::<R>),
        )
        .route("/books/{id}/permanent", delete(hard_delete_book::<R>))
        .with_state(AppState { repo })
}

async fn list_books<R: BookRepo>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let results = state.repo.list_books().await.map_err(repo_error)?;

    info!("Retrieved {} books from the DB", results.len());

    Ok(Json(results))
}

async fn get_book<R: BookRepo>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let id = parse_book_id(id)?;

    let book = state.repo.get_book(id).await.map_err(repo_error)?;

    info!("Retrieved book from DB: {:?}", book);
    Ok(Json(book))
}

async fn insert_book<R: BookRepo>(
    State(state): State<AppState<R>>,
    Json(new_book): Json<NewBook>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let inserted_book = state
        .repo
        .insert_book(new_book)
        .await
        .map_err(repo_error)?;

    info!("Inserted book into the DB: {:?}", inserted_book);

    Ok((StatusCode::CREATED, Json(inserted_book)))
}

async fn update_book<R: BookRepo>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Json(patch): Json<BookPatch>,
) -> Result<Json<Book>, ApiError> {
    let id = parse_book_id(id)?;

    let updated_book = state
        .repo
        .update_book(id, patch)
        .await
        .map_err(repo_error)?;

    info!("Updated book in DB: {:?}", updated_book);
    Ok(Json(updated_book))
}

async fn soft_delete_book<R: BookRepo>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_book_id(id)?;

    if state.repo.soft_delete_book(id).await.map_err(repo_error)? {
        info!("Soft-deleted book with ID: {}", id);
    } else {
        info!("No live book to soft-delete with ID: {}", id);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn hard_delete_book<R: BookRepo>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_book_id(id)?;

    if state.repo.hard_delete_book(id).await.map_err(repo_error)? {
        info!("Permanently deleted book with ID: {}", id);
    } else {
        info!("No book to permanently delete with ID: {}", id);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Map a store error onto a response, keeping "not found" apart from "failed"
fn repo_error(err: RepoError) -> ApiError {
    match err {
        RepoError::NotFound(id) => {
            info!("No book found in DB with ID: {}", id);
            (StatusCode::NOT_FOUND, err.to_string())
        }
        RepoError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        RepoError::Persistence(ref e) => {
            error!("Store operation failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn parse_book_id(id: String) -> Result<i32, ApiError> {
    match id.parse::<i32>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err((StatusCode::BAD_REQUEST, format!("Invalid book ID: {}", id))),
    }
}
