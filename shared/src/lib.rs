use serde::{Deserialize, Serialize};

/// A single row of the buku table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier, immutable after insertion
    pub id: i64,
    /// Title of the book
    pub judul: String,
    /// Author of the book
    pub penulis: String,
    /// Publication year, within [1000, 9999]
    pub tahun: i64,
}

/// Validated payload for creating a book; every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookRequest {
    pub judul: String,
    pub penulis: String,
    pub tahun: i64,
}

/// Validated payload for updating a book. Fields left as `None` were not
/// supplied by the client and keep their stored values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBookRequest {
    pub judul: Option<String>,
    pub penulis: Option<String>,
    pub tahun: Option<i64>,
}

/// One violated validation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the path or body field that failed
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Body of every 400 response: the full list of violated rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldError>,
}

/// Body of 404/500 responses and of successful update/delete responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of a successful creation, carrying the store-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookResponse {
    pub message: String,
    pub id: i64,
}
