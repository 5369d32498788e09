//! Book record service

use rand::Rng;

use crate::{
    error::BookError,
    models::book::{self, Book, BookFilter, BookPayload, BookQuery, BookSummary},
    repository::Repository,
};

const ID_ALPHABET: &[u8; 64] =
    b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";
const ID_LENGTH: usize = 16;

/// Generate a random URL-safe book identifier (96 bits of entropy)
pub fn generate_book_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Validate and store a new book, returning its id
    pub async fn create(&self, payload: BookPayload) -> Result<String, BookError> {
        if let Err(e) = payload.check() {
            tracing::debug!("Book creation rejected: {}", e);
            return Err(e);
        }

        let book = Book::new(generate_book_id(), payload, book::now());
        let id = self.repository.books.insert(book).await?;
        tracing::info!("Book created id={}", id);
        Ok(id)
    }

    /// List books under the single active filter of `query`
    pub async fn list(&self, query: &BookQuery) -> Vec<BookSummary> {
        let filter = BookFilter::from(query);
        self.repository.books.list(&filter).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Book, BookError> {
        self.repository
            .books
            .get_by_id(id)
            .await
            .ok_or(BookError::NotFound)
    }

    /// Replace a book. The payload is validated before the id is looked up.
    pub async fn update(&self, id: &str, payload: BookPayload) -> Result<(), BookError> {
        if let Err(e) = payload.check() {
            tracing::debug!("Book update rejected id={}: {}", id, e);
            return Err(e);
        }

        let updated = self.repository.books.update(id, payload, book::now()).await?;
        tracing::info!("Book updated id={} finished={}", updated.id, updated.finished);
        Ok(())
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<(), BookError> {
        self.repository.books.delete(id).await?;
        tracing::info!("Book deleted id={}", id);
        Ok(())
    }
}
