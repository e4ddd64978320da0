//! Authentication library
//!
//! Infrastructure pieces the service builds its authentication core on:
//! - Password hashing (Argon2id, salted, one-way)
//! - Signed, time-limited access tokens (JWT, HS256)
//! - An [`Authenticator`] coordinating credential verification and token
//!   issuance
//!
//! The library knows nothing about users, storage, or HTTP. The service owns
//! the lookup/verify/issue pipeline and the route guard; this crate supplies
//! the cryptographic primitives they delegate to.
//!
//! # Examples
//!
//! ```
//! use auth::{Authenticator, Claims};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Signup: hash the password for storage
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify the password and issue an access token
//! let claims = Claims::for_user("user123", "alice@example.com");
//! let result = auth.authenticate("password123", &hash, &claims).unwrap();
//!
//! // Guard: validate the token on a protected request
//! let decoded: Claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(decoded.sub.as_deref(), Some("user123"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::ACCESS_TOKEN_TTL_SECS;
pub use password::PasswordError;
pub use password::PasswordHasher;
