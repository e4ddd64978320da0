use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    fn hash_password(&self, password: &str) -> Result<String, UserError> {
        self.password_hasher
            .hash(password)
            .map_err(|e| UserError::Unknown(format!("Password hashing failed: {}", e)))
    }

    /// Best-effort uniqueness pre-check for friendlier conflict errors.
    ///
    /// Two concurrent creates can both pass this check; the storage-level
    /// unique constraints remain the authority and the repository maps their
    /// violations to the same errors.
    async fn check_unique(
        &self,
        email: &str,
        username: &str,
        exclude: Option<&UserId>,
    ) -> Result<(), UserError> {
        if let Some(existing) = self.repository.find_by_email(email).await? {
            if exclude != Some(&existing.id) {
                return Err(UserError::EmailAlreadyExists(email.to_string()));
            }
        }

        if let Some(existing) = self.repository.find_by_username(username).await? {
            if exclude != Some(&existing.id) {
                return Err(UserError::UsernameAlreadyExists(username.to_string()));
            }
        }

        Ok(())
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        self.check_unique(command.email.as_str(), command.username.as_str(), None)
            .await?;

        let password_hash = self.hash_password(&command.password)?;

        let user = User {
            id: UserId::new(),
            full_name: command.full_name,
            username: command.username,
            email: command.email,
            password_hash,
            role: command.role,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;

        tracing::info!(user_id = %created_user.id, "User created");

        Ok(created_user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, UserError> {
        match role {
            Some(role) => {
                let users = self.repository.find_by_role(role).await?;
                if users.is_empty() {
                    return Err(UserError::NoUsersWithRole(role.to_string()));
                }
                Ok(users)
            }
            None => self.repository.list_all().await,
        }
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if command.email.is_some() || command.username.is_some() {
            let email = command.email.as_ref().unwrap_or(&user.email);
            let username = command.username.as_ref().unwrap_or(&user.username);
            self.check_unique(email.as_str(), username.as_str(), Some(id))
                .await?;
        }

        if let Some(new_full_name) = command.full_name {
            user.full_name = new_full_name;
        }

        if let Some(new_username) = command.username {
            user.username = new_username;
        }

        if let Some(new_email) = command.email {
            user.email = new_email;
        }

        if let Some(new_role) = command.role {
            user.role = new_role;
        }

        if let Some(new_password) = command.password {
            user.password_hash = self.hash_password(&new_password)?;
        }

        let updated_user = self.repository.update(user).await?;

        tracing::info!(user_id = %updated_user.id, "User updated");

        Ok(updated_user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;

        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Username;

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

    fn sample_user(username: &str, email: &str) -> User {
        User {
            id: UserId::new(),
            full_name: "Test User".to_string(),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    fn create_command(username: &str, email: &str) -> CreateUserCommand {
        CreateUserCommand {
            full_name: "Test User".to_string(),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password: "password123".to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "testuser"
                    && user.email.as_str() == "test@example.com"
                    && user.role == Role::User
                    && user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository));

        let user = service
            .create_user(create_command("testuser", "test@example.com"))
            .await
            .unwrap();

        assert_eq!(user.username.as_str(), "testuser");
        // Plaintext never stored
        assert_ne!(user.password_hash, "password123");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(sample_user("otheruser", "test@example.com"))));
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service
            .create_user(create_command("testuser", "test@example.com"))
            .await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::EmailAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(Some(sample_user("testuser", "other@example.com"))));
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service
            .create_user(create_command("testuser", "test@example.com"))
            .await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::UsernameAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));

        let result = service.get_user(&UserId::new()).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_users_with_role_filter_empty_is_error() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_role()
            .with(eq(Role::Admin))
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = UserService::new(Arc::new(repository));

        let result = service.list_users(Some(Role::Admin)).await;
        assert!(matches!(result.unwrap_err(), UserError::NoUsersWithRole(_)));
    }

    #[tokio::test]
    async fn test_list_users_unfiltered_empty_is_ok() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_list_all().times(1).returning(|| Ok(vec![]));

        let service = UserService::new(Arc::new(repository));

        let users = service.list_users(None).await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_update_user_rehashes_password() {
        let mut repository = MockTestUserRepository::new();

        let existing = sample_user("testuser", "test@example.com");
        let user_id = existing.id;
        let old_hash = existing.password_hash.clone();

        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository
            .expect_update()
            .withf(move |user| user.password_hash != old_hash)
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository));

        let command = UpdateUserCommand {
            password: Some("new_password".to_string()),
            ..Default::default()
        };

        let updated = service.update_user(&user_id, command).await.unwrap();
        assert!(updated.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_update_user_email_conflict_with_other_user() {
        let mut repository = MockTestUserRepository::new();

        let existing = sample_user("testuser", "test@example.com");
        let user_id = existing.id;

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        // Another user already owns the new email
        repository
            .expect_find_by_email()
            .withf(|email| email == "taken@example.com")
            .times(1)
            .returning(|_| Ok(Some(sample_user("otheruser", "taken@example.com"))));
        repository.expect_update().times(0);

        let service = UserService::new(Arc::new(repository));

        let command = UpdateUserCommand {
            email: Some(EmailAddress::new("taken@example.com".to_string()).unwrap()),
            ..Default::default()
        };

        let result = service.update_user(&user_id, command).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::EmailAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_update_user_own_email_is_not_a_conflict() {
        let mut repository = MockTestUserRepository::new();

        let existing = sample_user("testuser", "test@example.com");
        let user_id = existing.id;
        let lookup_result = existing.clone();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        // The email resolves to the user being updated, so no conflict
        repository
            .expect_find_by_email()
            .withf(|email| email == "test@example.com")
            .times(1)
            .returning(move |_| Ok(Some(lookup_result.clone())));
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_update()
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository));

        let command = UpdateUserCommand {
            email: Some(EmailAddress::new("test@example.com".to_string()).unwrap()),
            ..Default::default()
        };

        let updated = service.update_user(&user_id, command).await.unwrap();
        assert_eq!(updated.email.as_str(), "test@example.com");
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));

        let result = service
            .update_user(&UserId::new(), UpdateUserCommand::default())
            .await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        let user_id = UserId::new();
        repository
            .expect_delete()
            .times(1)
            .returning(move |_| Err(UserError::NotFound(user_id.to_string())));

        let service = UserService::new(Arc::new(repository));

        let result = service.delete_user(&user_id).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }
}
