// bmtree/src/application/error.rs
use crate::domain::error::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Other(String),
}

impl ApplicationError {
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        match self {
            ApplicationError::Other(msg) => {
                ApplicationError::Other(format!("{}: {}", context.into(), msg))
            }
            ApplicationError::Domain(err) => ApplicationError::Domain(err.context(context)),
            ApplicationError::Validation(msg) => {
                ApplicationError::Validation(format!("{}: {}", context.into(), msg))
            }
        }
    }

    /// True if the addressed folder, bookmark or path does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApplicationError::Domain(err) if err.is_not_found())
    }
}

impl From<std::io::Error> for ApplicationError {
    fn from(err: std::io::Error) -> Self {
        ApplicationError::Domain(DomainError::Io(err))
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_domain_not_found_when_is_not_found_then_true() {
        let err = ApplicationError::from(DomainError::PathNotFound("/x".to_string()));
        assert!(err.is_not_found());
        assert!(!ApplicationError::Validation("empty title".to_string()).is_not_found());
    }

    #[test]
    fn given_context_when_applied_then_prefixed_and_kind_kept() {
        let err = ApplicationError::Validation("empty title".to_string()).context("mkdir");
        assert_eq!(err.to_string(), "Validation failed: mkdir: empty title");

        let err = ApplicationError::from(DomainError::FolderNotFound(3)).context("rmdir");
        assert!(err.is_not_found());
    }
}
