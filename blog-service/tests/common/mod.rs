use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;
use auth::JwtHandler;
use blog_service::domain::post::errors::PostError;
use blog_service::domain::post::models::Post;
use blog_service::domain::post::models::PostId;
use blog_service::domain::post::ports::PostRepository;
use blog_service::domain::user::errors::UserError;
use blog_service::domain::user::models::Role;
use blog_service::domain::user::models::User;
use blog_service::domain::user::models::UserId;
use blog_service::domain::user::ports::UserRepository;
use blog_service::inbound::http::router::create_router;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// In-memory store standing in for Postgres.
///
/// Implements both repository ports over the same maps so it can honor the
/// storage-level guarantees the services rely on: unique email/username and
/// cascade deletion of a user's posts.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    posts: RwLock<HashMap<Uuid, Post>>,
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        for existing in users.values() {
            if existing.email == user.email {
                return Err(UserError::EmailAlreadyExists(
                    user.email.as_str().to_string(),
                ));
            }
            if existing.username == user.username {
                return Err(UserError::UsernameAlreadyExists(
                    user.username.as_str().to_string(),
                ));
            }
        }

        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email.as_str() == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.username.as_str() == username)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn find_by_role(&self, role: Role) -> Result<Vec<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|user| user.role == role)
            .cloned()
            .collect())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserError> {
        let users = self.users.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| users.get(&id.0).cloned())
            .collect())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id.0) {
            return Err(UserError::NotFound(user.id.to_string()));
        }

        for existing in users.values() {
            if existing.id == user.id {
                continue;
            }
            if existing.email == user.email {
                return Err(UserError::EmailAlreadyExists(
                    user.email.as_str().to_string(),
                ));
            }
            if existing.username == user.username {
                return Err(UserError::UsernameAlreadyExists(
                    user.username.as_str().to_string(),
                ));
            }
        }

        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut users = self.users.write().await;

        if users.remove(&id.0).is_none() {
            return Err(UserError::NotFound(id.to_string()));
        }

        // Cascade: the store owns referential integrity
        self.posts
            .write()
            .await
            .retain(|_, post| post.author_id != *id);

        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: Post) -> Result<Post, PostError> {
        self.posts.write().await.insert(post.id.0, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostError> {
        Ok(self.posts.read().await.get(&id.0).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Post>, PostError> {
        Ok(self.posts.read().await.values().cloned().collect())
    }

    async fn update(&self, post: Post) -> Result<Post, PostError> {
        let mut posts = self.posts.write().await;

        if !posts.contains_key(&post.id.0) {
            return Err(PostError::NotFound(post.id.to_string()));
        }

        posts.insert(post.id.0, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: &PostId) -> Result<(), PostError> {
        if self.posts.write().await.remove(&id.0).is_none() {
            return Err(PostError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Test application running the full HTTP surface against [`InMemoryStore`].
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application on a random port and return a handle to it.
    pub async fn spawn() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let authenticator = Arc::new(Authenticator::new(TEST_JWT_SECRET));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(Arc::clone(&store), store, authenticator);

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Server crashed");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(TEST_JWT_SECRET),
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.patch(format!("{}{}", self.address, path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Mint a valid bearer token for an arbitrary subject.
    ///
    /// The guard validates signature and expiry only, so this is enough to
    /// reach the protected user routes without going through login.
    pub fn bearer_token(&self) -> String {
        let claims = Claims::for_user(Uuid::new_v4(), "test@example.com");
        self.jwt_handler
            .encode(&claims)
            .expect("Failed to encode test token")
    }
}
