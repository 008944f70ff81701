// bmtree/src/domain/error.rs
use crate::domain::bookmark::BookmarkBuilderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Folder not found: {0}")]
    FolderNotFound(i32),

    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(i32),

    #[error("Path does not exist: {0}")]
    PathNotFound(String),

    #[error("Cannot fetch metadata: {0}")]
    CannotFetchMetadata(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl DomainError {
    /// True for every kind that means "the addressed folder, bookmark or path does not resolve".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::FolderNotFound(_)
                | DomainError::BookmarkNotFound(_)
                | DomainError::PathNotFound(_)
        )
    }

    pub fn context<C: Into<String>>(self, context: C) -> Self {
        match self {
            DomainError::CannotFetchMetadata(msg) => {
                DomainError::CannotFetchMetadata(format!("{}: {}", context.into(), msg))
            }
            DomainError::RepositoryError(msg) => {
                DomainError::RepositoryError(format!("{}: {}", context.into(), msg))
            }
            DomainError::Other(msg) => DomainError::Other(format!("{}: {}", context.into(), msg)),
            // not-found and constraint kinds keep their identity
            err => err,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<BookmarkBuilderError> for DomainError {
    fn from(e: BookmarkBuilderError) -> Self {
        DomainError::Other(e.to_string())
    }
}
