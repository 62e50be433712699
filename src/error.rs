use crate::types::uuid::Uuid;

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

/// SQLite result codes for constraint violations (primary and extended `UNIQUE`).
const SQLITE_CONSTRAINT: &str = "19";
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("a book with isbn {0} already exists")]
    DuplicateIsbn(String),
    #[error("author {0} does not exist")]
    UnknownAuthor(Uuid),
    #[error("genre {0} does not exist")]
    UnknownGenre(Uuid),
    #[error("{0} must not be empty")]
    MissingField(&'static str),
    #[error("{entity} {id} is still referenced by {books} book(s)")]
    Referenced {
        entity: &'static str,
        id: Uuid,
        books: i64,
    },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CatalogError {
    /// Machine readable error code used in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::NotFound { .. } => "not_found",
            CatalogError::DuplicateIsbn(_) => "duplicate_isbn",
            CatalogError::UnknownAuthor(_) => "unknown_author",
            CatalogError::UnknownGenre(_) => "unknown_genre",
            CatalogError::MissingField(_) => "missing_field",
            CatalogError::Referenced { .. } => "referenced",
            CatalogError::Database(_) => "database",
        }
    }

    /// Turns a unique violation on `books.isbn` into [CatalogError::DuplicateIsbn].
    pub(crate) fn from_isbn_write(err: sqlx::Error, isbn: &str) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let constraint = matches!(
                db.code().as_deref(),
                Some(SQLITE_CONSTRAINT) | Some(SQLITE_CONSTRAINT_UNIQUE)
            );
            if constraint && db.message().contains("UNIQUE") && db.message().contains("isbn") {
                return CatalogError::DuplicateIsbn(isbn.to_string());
            }
        }
        CatalogError::Database(err)
    }
}
