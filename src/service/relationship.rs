//! Relationship service
//!
//! Owns the follow and block edges and the invariants between them:
//! no self-edges, at most one edge per ordered pair, block dominance
//! (a block removes both follow directions atomically), and the
//! follow restriction (a blocked user cannot follow their blocker).

use std::sync::Arc;

use chrono::Utc;

use crate::data::{BlockEdge, Database, FollowEdge, User, UserRef};
use crate::error::AppError;
use crate::metrics::EDGES_TOTAL;

/// Relationship service
pub struct RelationshipService {
    db: Arc<Database>,
}

impl RelationshipService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Resolve a target reference to exactly one user.
    ///
    /// Mutation entry points address the followee/blockee either by
    /// userid or by username; resolution happens before any invariant
    /// check.
    async fn resolve_target(&self, target: &UserRef, missing: &str) -> Result<User, AppError> {
        let user = match target {
            UserRef::Id(id) => self.db.get_user(id).await?,
            UserRef::Username(username) => self.db.get_user_by_username(username).await?,
        };

        user.ok_or_else(|| AppError::NotFound(missing.to_string()))
    }

    /// Create a follow edge.
    ///
    /// Fails `NotFound` if either user is absent, `Validation` on
    /// self-follow, `Conflict` on a duplicate edge, and `Forbidden`
    /// when the followee has blocked the follower.
    pub async fn follow(&self, follower: &str, followee: &UserRef) -> Result<(), AppError> {
        // Self-follow by id fails validation regardless of existence.
        if matches!(followee, UserRef::Id(id) if id == follower) {
            return Err(AppError::Validation(
                "Users cannot follow themselves.".to_string(),
            ));
        }

        if !self.db.user_exists(follower).await? {
            return Err(AppError::NotFound(
                "Follower user does not exist.".to_string(),
            ));
        }

        let followee = self
            .resolve_target(followee, "Followee user does not exist.")
            .await?;

        // A username reference can still resolve to the follower.
        if follower == followee.userid {
            return Err(AppError::Validation(
                "Users cannot follow themselves.".to_string(),
            ));
        }

        if self.db.follow_exists(follower, &followee.userid).await? {
            return Err(AppError::Conflict(
                "User is already following this account.".to_string(),
            ));
        }

        if self.db.block_exists(&followee.userid, follower).await? {
            return Err(AppError::Forbidden(
                "Cannot follow user: you have been blocked.".to_string(),
            ));
        }

        let edge = FollowEdge {
            follower: follower.to_string(),
            followee: followee.userid.clone(),
            created_at: Utc::now(),
        };

        // The pre-check above is racy between processes; the unique
        // index is the authority.
        self.db
            .insert_follow(&edge)
            .await
            .map_err(|e| e.conflict_on_unique_violation("User is already following this account."))?;

        EDGES_TOTAL.with_label_values(&["follow", "create"]).inc();
        tracing::debug!(follower = %edge.follower, followee = %edge.followee, "Follow created");

        Ok(())
    }

    /// Remove a follow edge. Fails `NotFound` if it does not exist.
    pub async fn unfollow(&self, follower: &str, followee: &UserRef) -> Result<(), AppError> {
        if !self.db.user_exists(follower).await? {
            return Err(AppError::NotFound(
                "Follower user does not exist.".to_string(),
            ));
        }

        let followee = self
            .resolve_target(followee, "Followee user does not exist.")
            .await?;

        let deleted = self.db.delete_follow(follower, &followee.userid).await?;
        if !deleted {
            return Err(AppError::NotFound(
                "No follow relationship exists.".to_string(),
            ));
        }

        EDGES_TOTAL.with_label_values(&["follow", "delete"]).inc();

        Ok(())
    }

    /// Create a block edge.
    ///
    /// As one atomic unit, inserts the block edge and deletes both
    /// possible follow edges between the pair. Fails `Validation` on
    /// self-block, `NotFound` if either user is absent, and `Conflict`
    /// on a duplicate.
    pub async fn block(&self, blocker: &str, blockee: &UserRef) -> Result<(), AppError> {
        // Self-block by id fails validation regardless of existence.
        if matches!(blockee, UserRef::Id(id) if id == blocker) {
            return Err(AppError::Validation(
                "Users cannot block themselves.".to_string(),
            ));
        }

        if !self.db.user_exists(blocker).await? {
            return Err(AppError::NotFound(
                "Blocker user does not exist.".to_string(),
            ));
        }

        let blockee = self
            .resolve_target(blockee, "Blockee user does not exist.")
            .await?;

        if blocker == blockee.userid {
            return Err(AppError::Validation(
                "Users cannot block themselves.".to_string(),
            ));
        }

        if self.db.block_exists(blocker, &blockee.userid).await? {
            return Err(AppError::Conflict("User is already blocked.".to_string()));
        }

        let edge = BlockEdge {
            blocker: blocker.to_string(),
            blockee: blockee.userid.clone(),
            created_at: Utc::now(),
        };

        self.db
            .insert_block_and_prune_follows(&edge)
            .await
            .map_err(|e| e.conflict_on_unique_violation("User is already blocked."))?;

        EDGES_TOTAL.with_label_values(&["block", "create"]).inc();
        tracing::debug!(blocker = %edge.blocker, blockee = %edge.blockee, "Block created");

        Ok(())
    }

    /// Remove a block edge. Fails `NotFound` if it does not exist.
    /// Follow edges removed by the block are not restored.
    pub async fn unblock(&self, blocker: &str, blockee: &UserRef) -> Result<(), AppError> {
        if !self.db.user_exists(blocker).await? {
            return Err(AppError::NotFound(
                "Blocker user does not exist.".to_string(),
            ));
        }

        let blockee = self
            .resolve_target(blockee, "Blockee user does not exist.")
            .await?;

        let deleted = self.db.delete_block(blocker, &blockee.userid).await?;
        if !deleted {
            return Err(AppError::NotFound(
                "No block relationship exists.".to_string(),
            ));
        }

        EDGES_TOTAL.with_label_values(&["block", "delete"]).inc();

        Ok(())
    }
}
