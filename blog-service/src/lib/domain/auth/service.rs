use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthResult;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Authentication core: the lookup / verify / issue pipeline.
///
/// Single pass per login attempt. Each internal failure branch logs its
/// specific cause and returns the one undifferentiated
/// [`AuthError::InvalidCredentials`].
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn login(&self, credentials: Credentials) -> Result<AuthResult, AuthError> {
        // Stage 1: lookup
        let user = match self.repository.find_by_email(&credentials.email).await? {
            Some(user) => user,
            None => {
                tracing::warn!(email = %credentials.email, "Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        // Stage 2: verify. Unreachable for well-formed records, but a record
        // without a hash must not verify against anything.
        if user.password_hash.is_empty() {
            tracing::error!(user_id = %user.id, "User record has no password hash");
            return Err(AuthError::InvalidCredentials);
        }

        // Stage 3: issue
        let claims = Claims::for_user(user.id, user.email.as_str());

        match self
            .authenticator
            .authenticate(&credentials.password, &user.password_hash, &claims)
        {
            Ok(result) => {
                tracing::info!(user_id = %user.id, "Login succeeded");
                Ok(AuthResult {
                    access_token: result.access_token,
                    user_id: user.id,
                    email: user.email,
                })
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
                Err(AuthError::InvalidCredentials)
            }
            Err(AuthenticationError::PasswordError(e)) => {
                // Stored hash is unusable; still reported as the generic
                // credential failure.
                tracing::error!(user_id = %user.id, error = %e, "Stored password hash is invalid");
                Err(AuthError::InvalidCredentials)
            }
            Err(AuthenticationError::JwtError(e)) => {
                tracing::error!(user_id = %user.id, error = %e, "Access token issuance failed");
                Err(AuthError::TokenIssuance(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::user::errors::UserError;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Role;
    use crate::domain::user::models::User;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::Username;

    const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-32b!";

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
            async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
            async fn find_by_role(&self, role: Role) -> Result<Vec<User>, UserError>;
            async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    fn user_with_password(password: &str) -> User {
        let authenticator = Authenticator::new(TEST_SECRET);
        User {
            id: UserId::new(),
            full_name: "Test User".to_string(),
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password_hash: authenticator.hash_password(password).unwrap(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_success_issues_decodable_token() {
        let mut repository = MockTestUserRepository::new();

        let user = user_with_password("password123");
        let user_id = user.id;

        repository
            .expect_find_by_email()
            .withf(|email| email == "test@example.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));
        let service = AuthService::new(Arc::new(repository), Arc::clone(&authenticator));

        let result = service
            .login(credentials("test@example.com", "password123"))
            .await
            .unwrap();

        assert_eq!(result.user_id, user_id);
        assert_eq!(result.email.as_str(), "test@example.com");

        let claims: Claims = authenticator.validate_token(&result.access_token).unwrap();
        assert_eq!(claims.sub, Some(user_id.to_string()));
        assert_eq!(claims.email(), Some("test@example.com".to_string()));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = AuthService::new(
            Arc::new(repository),
            Arc::new(Authenticator::new(TEST_SECRET)),
        );

        let result = service
            .login(credentials("nobody@example.com", "password123"))
            .await;
        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut repository = MockTestUserRepository::new();

        let user = user_with_password("password123");
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(
            Arc::new(repository),
            Arc::new(Authenticator::new(TEST_SECRET)),
        );

        let result = service
            .login(credentials("test@example.com", "wrong_password"))
            .await;
        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        // Unknown email and wrong password must collapse to the same error.
        let mut repository = MockTestUserRepository::new();

        let user = user_with_password("password123");
        repository
            .expect_find_by_email()
            .withf(|email| email == "test@example.com")
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_find_by_email()
            .withf(|email| email != "test@example.com")
            .returning(|_| Ok(None));

        let service = AuthService::new(
            Arc::new(repository),
            Arc::new(Authenticator::new(TEST_SECRET)),
        );

        let wrong_password = service
            .login(credentials("test@example.com", "wrong"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(credentials("nobody@example.com", "password123"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_empty_stored_hash() {
        let mut repository = MockTestUserRepository::new();

        let mut user = user_with_password("password123");
        user.password_hash = String::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(
            Arc::new(repository),
            Arc::new(Authenticator::new(TEST_SECRET)),
        );

        let result = service
            .login(credentials("test@example.com", "password123"))
            .await;
        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_malformed_stored_hash_collapses_to_invalid_credentials() {
        let mut repository = MockTestUserRepository::new();

        let mut user = user_with_password("password123");
        user.password_hash = "not_a_phc_string".to_string();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(
            Arc::new(repository),
            Arc::new(Authenticator::new(TEST_SECRET)),
        );

        let result = service
            .login(credentials("test@example.com", "password123"))
            .await;
        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }
}
