use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookly_http::error::AppError;
use serde_json::json;
use uuid::Uuid;

use super::models::{Book, CreateBook, UpdateBook};
use super::repository::{RepositoryError, SharedBookRepository};

const NOT_FOUND_MESSAGE: &str = "Book not found";

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Internal(err.into())
    }
}

/// Book routes, relative to the API prefix
pub fn router(repository: SharedBookRepository) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/book/{uid}",
            get(get_book).patch(update_book).delete(delete_book),
        )
        .with_state(repository)
}

async fn list_books(
    State(repository): State<SharedBookRepository>,
) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(repository.list().await?))
}

async fn create_book(
    State(repository): State<SharedBookRepository>,
    payload: Result<Json<CreateBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(payload) = payload?;
    let book = repository.create(payload).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn get_book(
    State(repository): State<SharedBookRepository>,
    uid: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(uid) = uid?;
    repository
        .get(uid)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(NOT_FOUND_MESSAGE))
}

async fn update_book(
    State(repository): State<SharedBookRepository>,
    uid: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateBook>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(uid) = uid?;
    let Json(patch) = payload?;

    let nulls = patch.null_fields();
    if !nulls.is_empty() {
        // An unknown uid is a 404 whatever the payload carries.
        if repository.get(uid).await?.is_none() {
            return Err(AppError::not_found(NOT_FOUND_MESSAGE));
        }
        let details = nulls
            .into_iter()
            .map(|field| json!({ "field": field, "error": "may not be null" }))
            .collect();
        return Err(AppError::validation(details, "book fields may not be null"));
    }

    repository
        .update(uid, patch)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(NOT_FOUND_MESSAGE))
}

async fn delete_book(
    State(repository): State<SharedBookRepository>,
    uid: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(uid) = uid?;
    if repository.delete(uid).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(NOT_FOUND_MESSAGE))
    }
}
