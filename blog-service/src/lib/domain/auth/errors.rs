use thiserror::Error;

use crate::user::errors::UserError;

/// Error for authentication operations.
///
/// Every failed login collapses to `InvalidCredentials` regardless of the
/// internal cause (unknown email, wrong password, unusable stored hash); the
/// distinction lives only in the logs. Enumeration of accounts through error
/// shapes is therefore not possible.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DatabaseError(e) => AuthError::DatabaseError(e),
            other => AuthError::Unknown(other.to_string()),
        }
    }
}
