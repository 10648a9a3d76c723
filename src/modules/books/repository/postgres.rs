use bookly_db::Database;
use uuid::Uuid;

use super::{BookRepository, RepositoryError};
use crate::modules::books::models::{Book, CreateBook, UpdateBook};

/// Books stored in the `books` table.
#[derive(Debug, Clone)]
pub struct PgBookRepository {
    db: Database,
}

impl PgBookRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl BookRepository for PgBookRepository {
    async fn list(&self) -> Result<Vec<Book>, RepositoryError> {
        let mut session = self.db.session().await?;
        let books = sqlx::query_as::<_, Book>(
            "SELECT uid, title, author, publisher, published_date, page_count, language \
             FROM books ORDER BY seq",
        )
        .fetch_all(&mut *session)
        .await?;
        session.commit().await?;
        Ok(books)
    }

    async fn create(&self, book: CreateBook) -> Result<Book, RepositoryError> {
        let mut session = self.db.session().await?;
        let book = sqlx::query_as::<_, Book>(
            "INSERT INTO books (uid, title, author, publisher, published_date, page_count, language) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING uid, title, author, publisher, published_date, page_count, language",
        )
        .bind(Uuid::new_v4())
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(&book.published_date)
        .bind(book.page_count)
        .bind(&book.language)
        .fetch_one(&mut *session)
        .await?;
        session.commit().await?;

        tracing::info!(uid = %book.uid, "book created");
        Ok(book)
    }

    async fn get(&self, uid: Uuid) -> Result<Option<Book>, RepositoryError> {
        let mut session = self.db.session().await?;
        let book = sqlx::query_as::<_, Book>(
            "SELECT uid, title, author, publisher, published_date, page_count, language \
             FROM books WHERE uid = $1",
        )
        .bind(uid)
        .fetch_optional(&mut *session)
        .await?;
        session.commit().await?;
        Ok(book)
    }

    async fn update(&self, uid: Uuid, patch: UpdateBook) -> Result<Option<Book>, RepositoryError> {
        let mut session = self.db.session().await?;

        // Row lock: concurrent updates of one book apply one after the other.
        let current = sqlx::query_as::<_, Book>(
            "SELECT uid, title, author, publisher, published_date, page_count, language \
             FROM books WHERE uid = $1 FOR UPDATE",
        )
        .bind(uid)
        .fetch_optional(&mut *session)
        .await?;

        let Some(mut book) = current else {
            return Ok(None);
        };
        patch.apply(&mut book.fields);

        let book = sqlx::query_as::<_, Book>(
            "UPDATE books SET title = $2, author = $3, publisher = $4, published_date = $5, \
             page_count = $6, language = $7 WHERE uid = $1 \
             RETURNING uid, title, author, publisher, published_date, page_count, language",
        )
        .bind(uid)
        .bind(&book.fields.title)
        .bind(&book.fields.author)
        .bind(&book.fields.publisher)
        .bind(&book.fields.published_date)
        .bind(book.fields.page_count)
        .bind(&book.fields.language)
        .fetch_one(&mut *session)
        .await?;
        session.commit().await?;

        tracing::info!(uid = %uid, "book updated");
        Ok(Some(book))
    }

    async fn delete(&self, uid: Uuid) -> Result<bool, RepositoryError> {
        let mut session = self.db.session().await?;
        let result = sqlx::query("DELETE FROM books WHERE uid = $1")
            .bind(uid)
            .execute(&mut *session)
            .await?;
        session.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(uid = %uid, "book deleted");
        }
        Ok(deleted)
    }
}
