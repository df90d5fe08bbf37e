use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post row as stored by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_url: String,
    pub caption: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a post; id and created_at are server-assigned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub user_id: Uuid,
    pub image_url: String,
    pub caption: String,
}

/// Comment row as stored by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a comment; id and created_at are server-assigned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
}

/// Like join-table row: one row per (user, post) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeRow {
    pub user_id: Uuid,
    pub post_id: Uuid,
}

/// Profile row: denormalized display data keyed by user id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
}

/// Notification type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Someone liked the recipient's post
    Like,
    /// Someone commented on the recipient's post
    Comment,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
        }
    }
}

/// Notification row created by the remote dispatcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRow {
    pub id: Uuid,
    /// Recipient of the notification
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}
