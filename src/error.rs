//! Error types for the bookshelf server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::QueryRejection;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Outcome of a rejected book operation
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookError {
    #[error("book name is missing")]
    MissingName,

    #[error("readPage is greater than pageCount")]
    PageOverflow,

    #[error("book not found")]
    NotFound,

    /// A freshly appended book could not be read back. Appends are
    /// infallible, so this is never produced in practice.
    #[error("appended book could not be verified")]
    AppendVerificationFailed,
}

/// Operation a [`BookError`] happened in; selects the user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookAction {
    Add,
    Get,
    Update,
    Delete,
}

impl std::fmt::Display for BookAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BookAction::Add => "add",
            BookAction::Get => "get",
            BookAction::Update => "update",
            BookAction::Delete => "delete",
        };
        f.write_str(name)
    }
}

impl BookError {
    /// Attach the operation the error happened in
    pub fn during(self, action: BookAction) -> AppError {
        AppError::Book { action, source: self }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to {action} book: {source}")]
    Book {
        action: BookAction,
        #[source]
        source: BookError,
    },

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.to_string())
    }
}

/// Value of the `status` field of every response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Fail,
    Error,
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub status: ResponseStatus,
    pub message: String,
}

impl AppError {
    /// HTTP status, body status and message for this error
    fn parts(&self) -> (StatusCode, ResponseStatus, String) {
        match self {
            AppError::Book { action, source } => {
                let message = book_message(*action, *source).to_string();
                match source {
                    BookError::MissingName | BookError::PageOverflow => {
                        (StatusCode::BAD_REQUEST, ResponseStatus::Fail, message)
                    }
                    BookError::NotFound => (StatusCode::NOT_FOUND, ResponseStatus::Fail, message),
                    BookError::AppendVerificationFailed => {
                        tracing::error!("Append verification failed during {} book", action);
                        (StatusCode::INTERNAL_SERVER_ERROR, ResponseStatus::Error, message)
                    }
                }
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ResponseStatus::Fail, msg.clone()),
        }
    }
}

fn book_message(action: BookAction, error: BookError) -> &'static str {
    match (action, error) {
        (BookAction::Add, BookError::MissingName) => "Gagal menambahkan buku. Mohon isi nama buku",
        (BookAction::Add, BookError::PageOverflow) => {
            "Gagal menambahkan buku. readPage tidak boleh lebih besar dari pageCount"
        }
        (BookAction::Update, BookError::MissingName) => "Gagal memperbarui buku. Mohon isi nama buku",
        (BookAction::Update, BookError::PageOverflow) => {
            "Gagal memperbarui buku. readPage tidak boleh lebih besar dari pageCount"
        }
        (BookAction::Update, BookError::NotFound) => "Gagal memperbarui buku. Id tidak ditemukan",
        (BookAction::Delete, BookError::NotFound) => "Buku gagal dihapus. Id tidak ditemukan",
        (_, BookError::NotFound) => "Buku tidak ditemukan",
        (_, BookError::AppendVerificationFailed) => "Buku gagal ditambahkan",
        (_, BookError::MissingName) => "Mohon isi nama buku",
        (_, BookError::PageOverflow) => "readPage tidak boleh lebih besar dari pageCount",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body_status, message) = self.parts();

        let body = Json(ErrorResponse {
            status: body_status,
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
