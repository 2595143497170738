//! Timeline service
//!
//! Assembles viewer-specific feeds by joining posts against the
//! relationship and engagement edges. All three view modes are
//! reverse-chronological with a deterministic id tie-break.

use std::collections::HashSet;
use std::sync::Arc;

use crate::data::{Database, Post};
use crate::error::AppError;

/// Fixed page size for the home feed.
pub const HOME_FEED_PAGE_SIZE: usize = 500;

/// Timeline service
pub struct TimelineService {
    db: Arc<Database>,
}

/// Timeline item for API response
///
/// A post annotated with the viewer's own engagement.
#[derive(Debug, Clone)]
pub struct TimelineItem {
    pub post: Post,
    /// Whether the viewer has liked this post
    pub is_liked: bool,
    /// Whether the viewer has retweeted this post
    pub is_retweeted: bool,
}

impl TimelineService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get the home feed for a viewer.
    ///
    /// Root posts authored by the viewer or by anyone the viewer
    /// follows, excluding authors the viewer has blocked, newest
    /// first, capped at one page, annotated with the viewer's
    /// like/retweet state.
    pub async fn home_timeline(&self, viewer: &str) -> Result<Vec<TimelineItem>, AppError> {
        if !self.db.user_exists(viewer).await? {
            return Err(AppError::NotFound("User does not exist.".to_string()));
        }

        let posts = self.db.get_home_feed(viewer, HOME_FEED_PAGE_SIZE).await?;
        self.annotate(viewer, posts).await
    }

    /// Get the replies to a post, excluding authors the viewer has
    /// blocked, newest first, annotated.
    pub async fn thread(&self, viewer: &str, post_id: &str) -> Result<Vec<TimelineItem>, AppError> {
        if !self.db.post_exists(post_id).await? {
            return Err(AppError::NotFound("Post does not exist.".to_string()));
        }

        let posts = self.db.get_thread(post_id, viewer).await?;
        self.annotate(viewer, posts).await
    }

    /// Get the root posts of a specific author, addressed by username.
    ///
    /// Author-centric browsing: no engagement annotations. When the
    /// viewer has blocked the author, the feed is empty.
    pub async fn profile_timeline(
        &self,
        viewer: &str,
        username: &str,
    ) -> Result<Vec<Post>, AppError> {
        let author = self
            .db
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist.".to_string()))?;

        if self.db.block_exists(viewer, &author.userid).await? {
            return Ok(Vec::new());
        }

        self.db.get_posts_by_author(&author.userid).await
    }

    /// Annotate posts with the viewer's like/retweet state, resolved
    /// in two batched queries rather than per post.
    async fn annotate(&self, viewer: &str, posts: Vec<Post>) -> Result<Vec<TimelineItem>, AppError> {
        let post_ids: Vec<String> = posts.iter().map(|p| p.id.clone()).collect();

        let liked: HashSet<String> = self
            .db
            .get_liked_post_ids(viewer, &post_ids)
            .await?
            .into_iter()
            .collect();
        let retweeted: HashSet<String> = self
            .db
            .get_retweeted_post_ids(viewer, &post_ids)
            .await?
            .into_iter()
            .collect();

        let items = posts
            .into_iter()
            .map(|post| {
                let is_liked = liked.contains(&post.id);
                let is_retweeted = retweeted.contains(&post.id);
                TimelineItem {
                    post,
                    is_liked,
                    is_retweeted,
                }
            })
            .collect();

        Ok(items)
    }
}
