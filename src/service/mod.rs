//! Service layer
//!
//! Contains business logic separated from HTTP handlers.
//! Services orchestrate database and storage operations.

mod engagement;
mod post;
mod profile;
mod relationship;
mod timeline;

pub use engagement::EngagementService;
pub use post::{MAX_POST_TEXT_CHARS, PostService};
pub use profile::ProfileService;
pub use relationship::RelationshipService;
pub use timeline::{HOME_FEED_PAGE_SIZE, TimelineItem, TimelineService};
