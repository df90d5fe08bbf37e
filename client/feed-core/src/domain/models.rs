use chrono::{DateTime, Utc};
use provider_api::{CommentRow, NotificationKind, PostRow, ProfileRow};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name used when a profile row is missing
pub const FALLBACK_USERNAME: &str = "unknown_user";

/// Denormalized display data for a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDisplay {
    pub username: String,
    pub avatar_url: Option<String>,
}

impl ProfileDisplay {
    /// Placeholder shown when the profile lookup came back empty
    pub fn placeholder() -> Self {
        Self {
            username: FALLBACK_USERNAME.to_string(),
            avatar_url: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.username == FALLBACK_USERNAME
    }
}

impl From<ProfileRow> for ProfileDisplay {
    fn from(row: ProfileRow) -> Self {
        Self {
            // Usernames are case-folded before they reach the store
            username: row.username,
            avatar_url: row.avatar_url,
        }
    }
}

/// A comment with its author's display data attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub author: ProfileDisplay,
}

impl CommentView {
    pub fn from_row(row: CommentRow, author: ProfileDisplay) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            user_id: row.user_id,
            body: row.body,
            created_at: row.created_at,
            author,
        }
    }
}

/// Fully assembled post as consumed by the view layer
///
/// `like_count` and `viewer_has_liked` are derived from the like join table;
/// `comments` is always present and ordered by creation time ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_url: String,
    pub caption: String,
    pub created_at: DateTime<Utc>,
    pub author: ProfileDisplay,
    pub like_count: u64,
    /// Meaningful only when a viewer identity was supplied at assembly
    pub viewer_has_liked: bool,
    pub comments: Vec<CommentView>,
}

impl PostView {
    pub fn from_row(row: PostRow, author: ProfileDisplay) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            image_url: row.image_url,
            caption: row.caption,
            created_at: row.created_at,
            author,
            like_count: 0,
            viewer_has_liked: false,
            comments: Vec::new(),
        }
    }
}

/// Notification as rendered in the bell dropdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationView {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<provider_api::NotificationRow> for NotificationView {
    fn from(row: provider_api::NotificationRow) -> Self {
        Self {
            id: row.id,
            kind: row.kind,
            message: row.message,
            read: row.read,
            post_id: row.post_id,
            created_at: row.created_at,
        }
    }
}

/// Global platform counters shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub users: u64,
    pub posts: u64,
    pub likes: u64,
    pub comments: u64,
}

/// What kind of action an activity entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Post,
    Like,
    Comment,
    NewUser,
}

/// One line in the dashboard recent-activity log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub username: String,
    /// Caption or comment preview, where the event carries one
    pub detail: Option<String>,
    pub occurred_at: DateTime<Utc>,
}
