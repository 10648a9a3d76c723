use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookRepository, RepositoryError};
use crate::modules::books::models::{Book, CreateBook, UpdateBook};

/// Process-local store, used by tests and for running without a database.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list(&self) -> Result<Vec<Book>, RepositoryError> {
        Ok(self.books.read().await.clone())
    }

    async fn create(&self, book: CreateBook) -> Result<Book, RepositoryError> {
        let book = Book::new(book);
        self.books.write().await.push(book.clone());
        Ok(book)
    }

    async fn get(&self, uid: Uuid) -> Result<Option<Book>, RepositoryError> {
        Ok(self
            .books
            .read()
            .await
            .iter()
            .find(|book| book.uid == uid)
            .cloned())
    }

    async fn update(&self, uid: Uuid, patch: UpdateBook) -> Result<Option<Book>, RepositoryError> {
        let mut books = self.books.write().await;
        let Some(book) = books.iter_mut().find(|book| book.uid == uid) else {
            return Ok(None);
        };
        patch.apply(&mut book.fields);
        Ok(Some(book.clone()))
    }

    async fn delete(&self, uid: Uuid) -> Result<bool, RepositoryError> {
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|book| book.uid != uid);
        Ok(books.len() != before)
    }
}
