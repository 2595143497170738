//! SQLite database operations
//!
//! All database access goes through this module.
//! Edge tables carry composite primary keys; a unique violation on
//! insert is the authoritative duplicate signal and is surfaced to the
//! service layer for translation into `Conflict`.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Pool, QueryBuilder, Sqlite, SqlitePool};
use std::path::Path;
use std::str::FromStr;

use super::models::*;
use crate::error::AppError;

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to the SQLite database and run migrations.
    ///
    /// Foreign keys are enabled on every connection so the delete-post
    /// cascade (likes, retweets, replies) is enforced by the store.
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let connection_string = format!("sqlite:{}?mode=rwc", path.display());
        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(AppError::Database)?
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn get_user(&self, userid: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE userid = ?")
            .bind(userid)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn user_exists(&self, userid: &str) -> Result<bool, AppError> {
        let row = sqlx::query_scalar::<_, i64>("SELECT 1 FROM users WHERE userid = ?")
            .bind(userid)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Insert a new user. A username collision surfaces as a unique
    /// violation for the caller to translate.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (userid, username, bio, picture, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.userid)
        .bind(&user.username)
        .bind(&user.bio)
        .bind(&user.picture)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All users except the given one, for people discovery.
    pub async fn list_users_excluding(&self, userid: &str) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE userid != ? ORDER BY username",
        )
        .bind(userid)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Partial profile update over the fixed mutable field set.
    ///
    /// Column names come only from the enumerated `ProfilePatch`
    /// fields; caller input is bound as values. Returns whether a row
    /// was updated.
    pub async fn patch_user_profile(
        &self,
        userid: &str,
        patch: &ProfilePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        if patch.is_empty() {
            // Treat a no-op patch as success against an existing user.
            return self.user_exists(userid).await;
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new("UPDATE users SET ");
        let mut separated = query_builder.separated(", ");

        if let Some(bio) = &patch.bio {
            separated.push("bio = ");
            separated.push_bind_unseparated(bio);
        }
        if let Some(username) = &patch.username {
            separated.push("username = ");
            separated.push_bind_unseparated(username);
        }
        if let Some(picture) = &patch.picture {
            separated.push("picture = ");
            separated.push_bind_unseparated(picture);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(updated_at);

        query_builder.push(" WHERE userid = ");
        query_builder.push_bind(userid);

        let result = query_builder.build().execute(&self.pool).await?;

        Ok(result.rows_affected() == 1)
    }

    // =========================================================================
    // Posts
    // =========================================================================

    pub async fn insert_post(&self, post: &Post) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, text_content, image_key, parent_post_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.id)
        .bind(&post.author_id)
        .bind(&post.text_content)
        .bind(&post.image_key)
        .bind(&post.parent_post_id)
        .bind(post.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_post(&self, id: &str) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    pub async fn post_exists(&self, id: &str) -> Result<bool, AppError> {
        let row = sqlx::query_scalar::<_, i64>("SELECT 1 FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Delete a post. Likes, retweets, and replies cascade via the
    /// foreign keys. Returns whether a row was deleted.
    pub async fn delete_post(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Follow edges
    // =========================================================================

    pub async fn follow_exists(&self, follower: &str, followee: &str) -> Result<bool, AppError> {
        let row = sqlx::query_scalar::<_, i64>(
            "SELECT 1 FROM follows WHERE follower = ? AND followee = ?",
        )
        .bind(follower)
        .bind(followee)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    pub async fn insert_follow(&self, edge: &FollowEdge) -> Result<(), AppError> {
        sqlx::query("INSERT INTO follows (follower, followee, created_at) VALUES (?, ?, ?)")
            .bind(&edge.follower)
            .bind(&edge.followee)
            .bind(edge.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a follow edge. Returns whether a row was deleted.
    pub async fn delete_follow(&self, follower: &str, followee: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM follows WHERE follower = ? AND followee = ?")
            .bind(follower)
            .bind(followee)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Block edges
    // =========================================================================

    pub async fn block_exists(&self, blocker: &str, blockee: &str) -> Result<bool, AppError> {
        let row = sqlx::query_scalar::<_, i64>(
            "SELECT 1 FROM blocks WHERE blocker = ? AND blockee = ?",
        )
        .bind(blocker)
        .bind(blockee)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// Insert a block edge and remove both possible follow edges
    /// between the pair, as one transaction.
    ///
    /// A partially applied cascade (block inserted, stale follow edge
    /// retained) must never be observable, so the whole unit commits
    /// or rolls back together. A duplicate block surfaces as a unique
    /// violation from the INSERT.
    pub async fn insert_block_and_prune_follows(&self, edge: &BlockEdge) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO blocks (blocker, blockee, created_at) VALUES (?, ?, ?)")
            .bind(&edge.blocker)
            .bind(&edge.blockee)
            .bind(edge.created_at)
            .execute(&mut *tx)
            .await?;

        // Both directions go, regardless of who followed whom.
        sqlx::query("DELETE FROM follows WHERE follower = ? AND followee = ?")
            .bind(&edge.blockee)
            .bind(&edge.blocker)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM follows WHERE follower = ? AND followee = ?")
            .bind(&edge.blocker)
            .bind(&edge.blockee)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Delete a block edge. Removed follow edges are not restored.
    pub async fn delete_block(&self, blocker: &str, blockee: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM blocks WHERE blocker = ? AND blockee = ?")
            .bind(blocker)
            .bind(blockee)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Likes
    // =========================================================================

    pub async fn insert_like(
        &self,
        userid: &str,
        post_id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query("INSERT INTO likes (userid, post_id, created_at) VALUES (?, ?, ?)")
            .bind(userid)
            .bind(post_id)
            .bind(created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn like_exists(&self, userid: &str, post_id: &str) -> Result<bool, AppError> {
        let row = sqlx::query_scalar::<_, i64>(
            "SELECT 1 FROM likes WHERE userid = ? AND post_id = ?",
        )
        .bind(userid)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    pub async fn delete_like(&self, userid: &str, post_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM likes WHERE userid = ? AND post_id = ?")
            .bind(userid)
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Retweets
    // =========================================================================

    pub async fn insert_retweet(
        &self,
        userid: &str,
        post_id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query("INSERT INTO retweets (userid, post_id, created_at) VALUES (?, ?, ?)")
            .bind(userid)
            .bind(post_id)
            .bind(created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn retweet_exists(&self, userid: &str, post_id: &str) -> Result<bool, AppError> {
        let row = sqlx::query_scalar::<_, i64>(
            "SELECT 1 FROM retweets WHERE userid = ? AND post_id = ?",
        )
        .bind(userid)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    pub async fn delete_retweet(&self, userid: &str, post_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM retweets WHERE userid = ? AND post_id = ?")
            .bind(userid)
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// True when the post's author has blocked the given user.
    ///
    /// Gates retweeting a post whose author blocked the engaging user.
    pub async fn author_has_blocked(&self, userid: &str, post_id: &str) -> Result<bool, AppError> {
        let row = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT 1
            FROM blocks b
            JOIN posts p ON b.blocker = p.author_id
            WHERE b.blockee = ? AND p.id = ?
            "#,
        )
        .bind(userid)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    // =========================================================================
    // Batched engagement counts
    // =========================================================================

    /// Like counts for the given posts. Posts with zero likes are
    /// absent from the result.
    pub async fn get_like_counts(&self, post_ids: &[String]) -> Result<Vec<PostCount>, AppError> {
        self.count_grouped("likes", "post_id", post_ids).await
    }

    /// Retweet counts for the given posts. Posts with zero retweets
    /// are absent from the result.
    pub async fn get_retweet_counts(
        &self,
        post_ids: &[String],
    ) -> Result<Vec<PostCount>, AppError> {
        self.count_grouped("retweets", "post_id", post_ids).await
    }

    /// Reply counts for the given posts. Posts with zero replies are
    /// absent from the result.
    pub async fn get_reply_counts(&self, post_ids: &[String]) -> Result<Vec<PostCount>, AppError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new(
            "SELECT parent_post_id AS post_id, COUNT(*) AS count \
             FROM posts WHERE parent_post_id IN (",
        );
        {
            let mut separated = query_builder.separated(", ");
            for id in post_ids {
                separated.push_bind(id);
            }
        }
        query_builder.push(") GROUP BY parent_post_id ORDER BY parent_post_id");

        let counts = query_builder
            .build_query_as::<PostCount>()
            .fetch_all(&self.pool)
            .await?;

        Ok(counts)
    }

    /// Shared GROUP BY count over an edge table. The table and column
    /// names are fixed at the call sites, never caller input.
    async fn count_grouped(
        &self,
        table: &str,
        key_column: &str,
        post_ids: &[String],
    ) -> Result<Vec<PostCount>, AppError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {key_column} AS post_id, COUNT(*) AS count FROM {table} WHERE {key_column} IN ("
        ));
        {
            let mut separated = query_builder.separated(", ");
            for id in post_ids {
                separated.push_bind(id);
            }
        }
        query_builder.push(format!(") GROUP BY {key_column} ORDER BY {key_column}"));

        let counts = query_builder
            .build_query_as::<PostCount>()
            .fetch_all(&self.pool)
            .await?;

        Ok(counts)
    }

    // =========================================================================
    // Timeline queries
    // =========================================================================

    /// Root posts authored by the viewer or anyone the viewer follows,
    /// minus authors the viewer has blocked, newest first.
    pub async fn get_home_feed(&self, viewer: &str, limit: usize) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT p.*
            FROM posts p
            WHERE p.parent_post_id IS NULL
              AND (
                  p.author_id = ?
                  OR EXISTS (
                      SELECT 1 FROM follows f
                      WHERE f.follower = ? AND f.followee = p.author_id
                  )
              )
              AND NOT EXISTS (
                  SELECT 1 FROM blocks b
                  WHERE b.blocker = ? AND b.blockee = p.author_id
              )
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT ?
            "#,
        )
        .bind(viewer)
        .bind(viewer)
        .bind(viewer)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// Replies to a post, minus authors the viewer has blocked,
    /// newest first.
    pub async fn get_thread(&self, parent_post_id: &str, viewer: &str) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT p.*
            FROM posts p
            WHERE p.parent_post_id = ?
              AND NOT EXISTS (
                  SELECT 1 FROM blocks b
                  WHERE b.blocker = ? AND b.blockee = p.author_id
              )
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .bind(parent_post_id)
        .bind(viewer)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// Root posts by a single author, newest first.
    pub async fn get_posts_by_author(&self, author_id: &str) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT *
            FROM posts
            WHERE author_id = ? AND parent_post_id IS NULL
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// Of the given posts, the ids the viewer has liked.
    pub async fn get_liked_post_ids(
        &self,
        viewer: &str,
        post_ids: &[String],
    ) -> Result<Vec<String>, AppError> {
        self.engaged_post_ids("likes", viewer, post_ids).await
    }

    /// Of the given posts, the ids the viewer has retweeted.
    pub async fn get_retweeted_post_ids(
        &self,
        viewer: &str,
        post_ids: &[String],
    ) -> Result<Vec<String>, AppError> {
        self.engaged_post_ids("retweets", viewer, post_ids).await
    }

    async fn engaged_post_ids(
        &self,
        table: &str,
        viewer: &str,
        post_ids: &[String],
    ) -> Result<Vec<String>, AppError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT post_id FROM {table} WHERE userid = "
        ));
        query_builder.push_bind(viewer);
        query_builder.push(" AND post_id IN (");
        {
            let mut separated = query_builder.separated(", ");
            for id in post_ids {
                separated.push_bind(id);
            }
        }
        query_builder.push(")");

        let ids = query_builder
            .build_query_scalar::<String>()
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }
}
