use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthResult;
use crate::domain::auth::models::Credentials;

/// Port for the authentication core.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Validate credentials and issue an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Lookup or verification failed (cause logged,
    ///   never surfaced)
    /// * `TokenIssuance` - Claims could not be signed
    /// * `DatabaseError` - Store lookup failed
    async fn login(&self, credentials: Credentials) -> Result<AuthResult, AuthError>;
}
