//! Repository layer for in-memory book storage

pub mod books;

/// Main repository struct holding every collection of the process
#[derive(Clone, Default)]
pub struct Repository {
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create a repository with empty collections
    pub fn new() -> Self {
        Self::default()
    }
}
