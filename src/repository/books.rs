//! Book collection

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    error::BookError,
    models::book::{Book, BookFilter, BookPayload, BookSummary},
};

/// Insertion-ordered book collection behind a single lock.
///
/// Writers hold the write guard for the whole operation, so readers never
/// observe a half-applied change.
#[derive(Clone, Default)]
pub struct BooksRepository {
    books: Arc<RwLock<Vec<Book>>>,
}

impl BooksRepository {
    /// Append a book and confirm it is present afterwards
    pub async fn insert(&self, book: Book) -> Result<String, BookError> {
        let mut books = self.books.write().await;
        let id = book.id.clone();
        books.push(book);

        if books.iter().any(|b| b.id == id) {
            Ok(id)
        } else {
            Err(BookError::AppendVerificationFailed)
        }
    }

    /// Books matching `filter`, projected, in insertion order
    pub async fn list(&self, filter: &BookFilter) -> Vec<BookSummary> {
        let books = self.books.read().await;
        books
            .iter()
            .filter(|book| filter.matches(book))
            .map(BookSummary::from)
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Book> {
        let books = self.books.read().await;
        books.iter().find(|book| book.id == id).cloned()
    }

    /// Replace the mutable fields of a book in place
    pub async fn update(
        &self,
        id: &str,
        payload: BookPayload,
        now: DateTime<Utc>,
    ) -> Result<Book, BookError> {
        let mut books = self.books.write().await;
        let book = books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(BookError::NotFound)?;
        book.apply(payload, now);
        Ok(book.clone())
    }

    /// Remove a book, shifting the following ones up
    pub async fn delete(&self, id: &str) -> Result<(), BookError> {
        let mut books = self.books.write().await;
        let index = books
            .iter()
            .position(|book| book.id == id)
            .ok_or(BookError::NotFound)?;
        books.remove(index);
        Ok(())
    }

    pub async fn count(&self) -> usize {
        self.books.read().await.len()
    }
}
