use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::models::PostWithAuthor;
use crate::domain::post::models::UpdatePostCommand;
use crate::domain::user::models::UserId;
use crate::post::errors::PostError;
use crate::post::ports::PostRepository;
use crate::post::ports::PostServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementation for post operations.
///
/// Posts reference users, so the service holds both repositories: the post
/// store for the entity itself and the user store to resolve authors.
pub struct PostService<PR, UR>
where
    PR: PostRepository,
    UR: UserRepository,
{
    posts: Arc<PR>,
    users: Arc<UR>,
}

impl<PR, UR> PostService<PR, UR>
where
    PR: PostRepository,
    UR: UserRepository,
{
    pub fn new(posts: Arc<PR>, users: Arc<UR>) -> Self {
        Self { posts, users }
    }

    async fn with_author(&self, post: Post) -> Result<PostWithAuthor, PostError> {
        let author = self
            .users
            .find_by_id(&post.author_id)
            .await?
            .ok_or_else(|| PostError::AuthorNotFound(post.author_id.to_string()))?;

        Ok(PostWithAuthor { post, author })
    }
}

#[async_trait]
impl<PR, UR> PostServicePort for PostService<PR, UR>
where
    PR: PostRepository,
    UR: UserRepository,
{
    async fn create_post(&self, command: CreatePostCommand) -> Result<PostWithAuthor, PostError> {
        let author = self
            .users
            .find_by_id(&command.author_id)
            .await?
            .ok_or_else(|| PostError::AuthorNotFound(command.author_id.to_string()))?;

        let post = Post {
            id: PostId::new(),
            title: command.title,
            content: command.content,
            author_id: author.id,
            created_at: Utc::now(),
        };

        let created_post = self.posts.create(post).await?;

        tracing::info!(post_id = %created_post.id, author_id = %author.id, "Post created");

        Ok(PostWithAuthor {
            post: created_post,
            author,
        })
    }

    async fn get_post(&self, id: &PostId) -> Result<PostWithAuthor, PostError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(PostError::NotFound(id.to_string()))?;

        self.with_author(post).await
    }

    async fn list_posts(&self) -> Result<Vec<PostWithAuthor>, PostError> {
        let posts = self.posts.list_all().await?;

        let author_ids: Vec<UserId> = posts.iter().map(|p| p.author_id).collect();
        let authors: HashMap<UserId, _> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        // The cascade FK keeps authors resolvable; a miss here means a
        // concurrent author deletion, so the orphaned row is skipped.
        Ok(posts
            .into_iter()
            .filter_map(|post| match authors.get(&post.author_id) {
                Some(author) => Some(PostWithAuthor {
                    post,
                    author: author.clone(),
                }),
                None => {
                    tracing::warn!(author_id = %post.author_id, post_id = %post.id, "Author missing for post");
                    None
                }
            })
            .collect())
    }

    async fn update_post(
        &self,
        id: &PostId,
        command: UpdatePostCommand,
    ) -> Result<PostWithAuthor, PostError> {
        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(PostError::NotFound(id.to_string()))?;

        if let Some(new_title) = command.title {
            post.title = new_title;
        }

        if let Some(new_content) = command.content {
            post.content = new_content;
        }

        let updated_post = self.posts.update(post).await?;

        tracing::info!(post_id = %updated_post.id, "Post updated");

        self.with_author(updated_post).await
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), PostError> {
        self.posts.delete(id).await?;

        tracing::info!(post_id = %id, "Post deleted");

        Ok(())
    }
}
