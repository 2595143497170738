//! Engagement service
//!
//! Owns the like and retweet edges on posts: idempotency (at most one
//! edge per pair), the block-based retweet restriction, and the
//! batched per-post counts.

use std::sync::Arc;

use chrono::Utc;

use crate::data::{Database, EngagementCounts};
use crate::error::AppError;
use crate::metrics::EDGES_TOTAL;

/// Engagement service
pub struct EngagementService {
    db: Arc<Database>,
}

impl EngagementService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn ensure_user_and_post(&self, userid: &str, post_id: &str) -> Result<(), AppError> {
        if !self.db.user_exists(userid).await? {
            return Err(AppError::NotFound("User does not exist.".to_string()));
        }
        if !self.db.post_exists(post_id).await? {
            return Err(AppError::NotFound("Post does not exist.".to_string()));
        }
        Ok(())
    }

    /// Like a post. Fails `Conflict` on a duplicate like.
    pub async fn like(&self, userid: &str, post_id: &str) -> Result<(), AppError> {
        self.ensure_user_and_post(userid, post_id).await?;

        if self.db.like_exists(userid, post_id).await? {
            return Err(AppError::Conflict(
                "You have already liked this post.".to_string(),
            ));
        }

        self.db
            .insert_like(userid, post_id, Utc::now())
            .await
            .map_err(|e| e.conflict_on_unique_violation("You have already liked this post."))?;

        EDGES_TOTAL.with_label_values(&["like", "create"]).inc();

        Ok(())
    }

    /// Remove a like. Fails `NotFound` if no like edge exists.
    pub async fn unlike(&self, userid: &str, post_id: &str) -> Result<(), AppError> {
        let deleted = self.db.delete_like(userid, post_id).await?;
        if !deleted {
            return Err(AppError::NotFound(
                "No like exists for this post.".to_string(),
            ));
        }

        EDGES_TOTAL.with_label_values(&["like", "delete"]).inc();

        Ok(())
    }

    /// Retweet a post.
    ///
    /// Fails `NotFound` if user or post is absent, `Forbidden` when
    /// the post's author has blocked the user, and `Conflict` on a
    /// duplicate retweet.
    pub async fn retweet(&self, userid: &str, post_id: &str) -> Result<(), AppError> {
        self.ensure_user_and_post(userid, post_id).await?;

        if self.db.author_has_blocked(userid, post_id).await? {
            return Err(AppError::Forbidden(
                "Cannot retweet: you are blocked by the post author.".to_string(),
            ));
        }

        if self.db.retweet_exists(userid, post_id).await? {
            return Err(AppError::Conflict(
                "You have already retweeted this post.".to_string(),
            ));
        }

        self.db
            .insert_retweet(userid, post_id, Utc::now())
            .await
            .map_err(|e| e.conflict_on_unique_violation("You have already retweeted this post."))?;

        EDGES_TOTAL.with_label_values(&["retweet", "create"]).inc();

        Ok(())
    }

    /// Remove a retweet. Fails `NotFound` if no retweet edge exists.
    pub async fn unretweet(&self, userid: &str, post_id: &str) -> Result<(), AppError> {
        let deleted = self.db.delete_retweet(userid, post_id).await?;
        if !deleted {
            return Err(AppError::NotFound(
                "No retweet exists for this post.".to_string(),
            ));
        }

        EDGES_TOTAL.with_label_values(&["retweet", "delete"]).inc();

        Ok(())
    }

    /// Batched like/retweet/reply counts for a set of posts.
    ///
    /// Posts with a zero count of a kind are absent from that kind's
    /// result set; callers treat absence as zero. Empty input returns
    /// empty result sets, not an error.
    pub async fn batch_counts(&self, post_ids: &[String]) -> Result<EngagementCounts, AppError> {
        if post_ids.is_empty() {
            return Ok(EngagementCounts::default());
        }

        let likes = self.db.get_like_counts(post_ids).await?;
        let retweets = self.db.get_retweet_counts(post_ids).await?;
        let replies = self.db.get_reply_counts(post_ids).await?;

        Ok(EngagementCounts {
            likes,
            retweets,
            replies,
        })
    }
}
