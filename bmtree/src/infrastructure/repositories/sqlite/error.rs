// src/infrastructure/repositories/sqlite/error.rs

use crate::domain::error::DomainError;
use diesel::r2d2;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqliteRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DieselError),

    #[error("Diesel connection error: {0}")]
    ConnectionError(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    ConnectionPoolError(String),

    #[error("Folder not found with ID: {0}")]
    FolderNotFound(i32),

    #[error("Bookmark not found with ID: {0}")]
    BookmarkNotFound(i32),

    #[error("Favicon not found with ID: {0}")]
    FaviconNotFound(i32),

    #[error("Path does not exist: {0}")]
    PathNotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Repository operation failed: {0}")]
    OperationFailed(String),
}

pub type SqliteResult<T> = Result<T, SqliteRepositoryError>;

impl From<r2d2::Error> for SqliteRepositoryError {
    fn from(err: r2d2::Error) -> Self {
        SqliteRepositoryError::ConnectionPoolError(err.to_string())
    }
}

impl From<SqliteRepositoryError> for DomainError {
    fn from(err: SqliteRepositoryError) -> Self {
        match err {
            SqliteRepositoryError::FolderNotFound(id) => DomainError::FolderNotFound(id),
            SqliteRepositoryError::BookmarkNotFound(id) => DomainError::BookmarkNotFound(id),
            SqliteRepositoryError::FaviconNotFound(id) => {
                DomainError::RepositoryError(format!("Favicon not found with ID: {}", id))
            }
            SqliteRepositoryError::PathNotFound(path) => DomainError::PathNotFound(path),
            SqliteRepositoryError::InvalidOperation(msg) => DomainError::InvalidOperation(msg),
            SqliteRepositoryError::DatabaseError(diesel_err) => match diesel_err {
                DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info)
                | DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
                | DieselError::DatabaseError(DatabaseErrorKind::NotNullViolation, info)
                | DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
                    DomainError::ConstraintViolation(info.message().to_string())
                }
                DieselError::DatabaseError(_, info) => {
                    DomainError::RepositoryError(format!("Database error: {}", info.message()))
                }
                _ => DomainError::RepositoryError(format!("Database error: {}", diesel_err)),
            },
            SqliteRepositoryError::ConnectionError(e) => {
                DomainError::RepositoryError(format!("Database connection error: {}", e))
            }
            SqliteRepositoryError::ConnectionPoolError(e) => {
                DomainError::RepositoryError(format!("Connection pool error: {}", e))
            }
            SqliteRepositoryError::IoError(e) => DomainError::Io(e),
            SqliteRepositoryError::MigrationError(e) => {
                DomainError::RepositoryError(format!("Migration error: {}", e))
            }
            SqliteRepositoryError::OperationFailed(e) => DomainError::RepositoryError(e),
        }
    }
}
