//! Conversions from data models to API responses.

use crate::data::{Post, PostCount, User};
use crate::service::TimelineItem;
use crate::storage::MediaStorage;

use super::dto::{CountEntry, PostResponse, TimelineItemResponse, UserResponse, UserSummary};

pub fn user_to_response(user: &User) -> UserResponse {
    UserResponse {
        userid: user.userid.clone(),
        username: user.username.clone(),
        bio: user.bio.clone(),
        picture: user.picture.clone(),
    }
}

pub fn user_to_summary(user: &User) -> UserSummary {
    UserSummary {
        userid: user.userid.clone(),
        username: user.username.clone(),
    }
}

/// Convert a post, composing the public image URL from the stored key.
pub fn post_to_response(post: &Post, storage: &MediaStorage) -> PostResponse {
    PostResponse {
        postid: post.id.clone(),
        userid: post.author_id.clone(),
        text: post.text_content.clone(),
        image_url: post
            .image_key
            .as_deref()
            .map(|key| storage.get_public_url(key)),
        parent_post_id: post.parent_post_id.clone(),
        created_at: post.created_at,
    }
}

pub fn timeline_item_to_response(
    item: &TimelineItem,
    storage: &MediaStorage,
) -> TimelineItemResponse {
    TimelineItemResponse {
        post: post_to_response(&item.post, storage),
        is_liked: item.is_liked,
        is_retweeted: item.is_retweeted,
    }
}

pub fn count_to_entry(count: &PostCount) -> CountEntry {
    CountEntry {
        postid: count.post_id.clone(),
        count: count.count,
    }
}
