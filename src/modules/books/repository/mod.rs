//! Storage seam for books.
//!
//! Handlers only see [`BookRepository`]. Every method is one unit of work:
//! the Postgres implementation opens a scoped session per call and commits it
//! before returning.

use std::sync::Arc;

use uuid::Uuid;

use super::models::{Book, CreateBook, UpdateBook};

mod memory;
mod postgres;

pub use memory::InMemoryBookRepository;
pub use postgres::PgBookRepository;

pub type SharedBookRepository = Arc<dyn BookRepository>;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Database(#[from] bookly_db::DbError),

    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),
}

#[async_trait::async_trait]
pub trait BookRepository: Send + Sync {
    /// All books in insertion order
    async fn list(&self) -> Result<Vec<Book>, RepositoryError>;

    /// Store a new book under a freshly generated uid
    async fn create(&self, book: CreateBook) -> Result<Book, RepositoryError>;

    async fn get(&self, uid: Uuid) -> Result<Option<Book>, RepositoryError>;

    /// Apply the supplied fields and return the stored result, or `None` if
    /// no book has this uid
    async fn update(&self, uid: Uuid, patch: UpdateBook) -> Result<Option<Book>, RepositoryError>;

    /// Returns false if no book has this uid
    async fn delete(&self, uid: Uuid) -> Result<bool, RepositoryError>;
}
