use async_trait::async_trait;

use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::models::PostWithAuthor;
use crate::domain::post::models::UpdatePostCommand;
use crate::post::errors::PostError;

/// Port for post domain service operations.
#[async_trait]
pub trait PostServicePort: Send + Sync + 'static {
    /// Create a new post owned by an existing user.
    ///
    /// # Errors
    /// * `AuthorNotFound` - `author_id` does not resolve to a user
    /// * `DatabaseError` - Database operation failed
    async fn create_post(&self, command: CreatePostCommand) -> Result<PostWithAuthor, PostError>;

    /// Retrieve a post and its author by post identifier.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_post(&self, id: &PostId) -> Result<PostWithAuthor, PostError>;

    /// List all posts with their authors.
    async fn list_posts(&self) -> Result<Vec<PostWithAuthor>, PostError>;

    /// Partially update an existing post.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_post(
        &self,
        id: &PostId,
        command: UpdatePostCommand,
    ) -> Result<PostWithAuthor, PostError>;

    /// Delete an existing post.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_post(&self, id: &PostId) -> Result<(), PostError>;
}

/// Persistence operations for the post entity.
#[async_trait]
pub trait PostRepository: Send + Sync + 'static {
    /// Persist new post to storage.
    async fn create(&self, post: Post) -> Result<Post, PostError>;

    /// Retrieve post by identifier, `None` when absent.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostError>;

    /// Retrieve all posts.
    async fn list_all(&self) -> Result<Vec<Post>, PostError>;

    /// Update existing post in storage.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, post: Post) -> Result<Post, PostError>;

    /// Remove post from storage.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &PostId) -> Result<(), PostError>;
}
