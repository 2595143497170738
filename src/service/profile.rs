//! Profile service
//!
//! User registry and profile editing. Field-level CRUD only: the
//! partial update accepts the fixed mutable field set and nothing
//! else.

use std::sync::Arc;

use chrono::Utc;

use crate::data::{Database, ProfilePatch, User};
use crate::error::AppError;
use crate::metrics::USERS_TOTAL;

/// Bio shown for users who have not written one.
const PLACEHOLDER_BIO: &str = "This user hasn't written a bio yet.";

/// Profile service
pub struct ProfileService {
    db: Arc<Database>,
}

impl ProfileService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get-or-create a user keyed by the upstream identity.
    ///
    /// If the userid exists, returns the stored profile. Otherwise
    /// inserts with the given username and picture and a placeholder
    /// bio. Returns whether a new row was created. A username taken by
    /// a different userid is a `Conflict`.
    pub async fn register(
        &self,
        userid: &str,
        username: &str,
        picture: &str,
    ) -> Result<(User, bool), AppError> {
        if let Some(user) = self.db.get_user(userid).await? {
            return Ok((user, false));
        }

        let now = Utc::now();
        let user = User {
            userid: userid.to_string(),
            username: username.to_string(),
            bio: Some(PLACEHOLDER_BIO.to_string()),
            picture: Some(picture.to_string()),
            created_at: now,
            updated_at: now,
        };

        self.db
            .insert_user(&user)
            .await
            .map_err(|e| e.conflict_on_unique_violation("Username is already taken."))?;

        USERS_TOTAL.inc();
        tracing::info!(userid = %user.userid, username = %user.username, "User created");

        Ok((user, true))
    }

    /// Get a user by id. Fails `NotFound` if absent. A missing bio is
    /// replaced with the placeholder for display.
    pub async fn get(&self, userid: &str) -> Result<User, AppError> {
        let mut user = self
            .db
            .get_user(userid)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist.".to_string()))?;

        if user.bio.as_deref().map(str::trim).unwrap_or("").is_empty() {
            user.bio = Some(PLACEHOLDER_BIO.to_string());
        }

        Ok(user)
    }

    /// All users except the requesting one, for people discovery.
    pub async fn list_others(&self, exclude_userid: &str) -> Result<Vec<User>, AppError> {
        self.db.list_users_excluding(exclude_userid).await
    }

    /// Partial profile update over {bio, username, picture}.
    ///
    /// An empty patch is a no-op success. A username collision is a
    /// `Conflict`.
    pub async fn update(&self, userid: &str, patch: &ProfilePatch) -> Result<(), AppError> {
        let updated = self
            .db
            .patch_user_profile(userid, patch, Utc::now())
            .await
            .map_err(|e| e.conflict_on_unique_violation("Username is already taken."))?;

        if !updated {
            return Err(AppError::NotFound("User does not exist.".to_string()));
        }

        tracing::debug!(userid = %userid, "Profile updated");

        Ok(())
    }
}
