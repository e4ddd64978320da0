use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UserId;

/// Submitted login credentials.
///
/// The email is looked up as-is; the password only ever flows into the
/// hasher's verify call.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Result of a successful login.
#[derive(Debug)]
pub struct AuthResult {
    pub access_token: String,
    pub user_id: UserId,
    pub email: EmailAddress,
}
