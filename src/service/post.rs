//! Post service
//!
//! Handles post creation, deletion, and lookup. Text content is
//! capped at 500 characters before anything touches the store.

use std::sync::Arc;

use chrono::Utc;

use crate::data::{Database, EntityId, Post};
use crate::error::AppError;
use crate::metrics::POSTS_TOTAL;

/// Maximum post text length, in characters.
pub const MAX_POST_TEXT_CHARS: usize = 500;

/// Post service
pub struct PostService {
    db: Arc<Database>,
}

impl PostService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a new post.
    ///
    /// # Arguments
    /// * `author_id` - Existing user id
    /// * `text` - Post text (at most 500 characters)
    /// * `image_key` - Optional object-storage key, stored opaquely
    /// * `parent_post_id` - Optional parent; set for replies
    ///
    /// # Returns
    /// The created post with server-assigned id and timestamp.
    pub async fn create(
        &self,
        author_id: &str,
        text: String,
        image_key: Option<String>,
        parent_post_id: Option<String>,
    ) -> Result<Post, AppError> {
        if text.chars().count() > MAX_POST_TEXT_CHARS {
            return Err(AppError::Validation(
                "Text content exceeds 500 characters.".to_string(),
            ));
        }

        if !self.db.user_exists(author_id).await? {
            return Err(AppError::NotFound("User does not exist.".to_string()));
        }

        if let Some(parent_id) = &parent_post_id {
            if !self.db.post_exists(parent_id).await? {
                return Err(AppError::NotFound(
                    "Parent post does not exist.".to_string(),
                ));
            }
        }

        let post = Post {
            id: EntityId::new().0,
            author_id: author_id.to_string(),
            text_content: text,
            image_key,
            parent_post_id,
            created_at: Utc::now(),
        };

        self.db.insert_post(&post).await?;

        POSTS_TOTAL.inc();
        tracing::debug!(post_id = %post.id, author = %post.author_id, "Post created");

        Ok(post)
    }

    /// Delete a post by id. Fails `NotFound` if it does not exist.
    ///
    /// Dependent likes, retweets, and replies cascade with the post.
    pub async fn delete(&self, post_id: &str) -> Result<(), AppError> {
        let deleted = self.db.delete_post(post_id).await?;
        if !deleted {
            return Err(AppError::NotFound("Post does not exist.".to_string()));
        }

        POSTS_TOTAL.dec();
        tracing::debug!(post_id = %post_id, "Post deleted");

        Ok(())
    }

    /// Get a post by id. Fails `NotFound` if it does not exist.
    pub async fn get(&self, post_id: &str) -> Result<Post, AppError> {
        self.db
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post does not exist.".to_string()))
    }
}
