use thiserror::Error;

use crate::user::errors::UserError;

/// Error for PostId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for all post-related operations
#[derive(Debug, Clone, Error)]
pub enum PostError {
    #[error("Invalid post ID: {0}")]
    InvalidPostId(#[from] PostIdError),

    #[error("Post with ID {0} not found")]
    NotFound(String),

    #[error("Author not found")]
    AuthorNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<UserError> for PostError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DatabaseError(e) => PostError::DatabaseError(e),
            other => PostError::Unknown(other.to_string()),
        }
    }
}
