//! Contracts to the managed backend the client is built on.
//!
//! Every remote capability the feed core consumes — identity, relational
//! storage, realtime change feeds, object storage, notification dispatch and
//! email delivery — is expressed here as an `async_trait` with row and event
//! shapes owned by this crate. Implementations are opaque to the core; the
//! only contract is the shape of the rows and events they read and write.

pub mod error;
pub mod events;
pub mod rows;

pub use error::{ProviderError, ProviderResult};
pub use events::{ChangeEvent, ChangeOp, ChangeRecord, ChannelTopic, EntityKind, RowFilter};
pub use rows::{
    CommentRow, LikeRow, NewComment, NewPost, NotificationKind, NotificationRow, PostRow,
    ProfileRow,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

/// An authenticated viewer identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewer {
    pub id: Uuid,
    pub email: String,
}

/// Sign-in / sign-up credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Profile metadata attached to a sign-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSeed {
    pub username: String,
}

/// Authentication provider (delegated entirely to the backend)
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Current session, if any
    async fn current_viewer(&self) -> ProviderResult<Option<Viewer>>;

    async fn sign_in(&self, credentials: Credentials) -> ProviderResult<Viewer>;

    /// Registers a new account; the profile row is created by the backend
    /// from the seed
    async fn sign_up(&self, credentials: Credentials, seed: ProfileSeed) -> ProviderResult<()>;
}

/// Relational store contract, shaped after the row-set queries the client
/// issues: equality/membership filters with timestamp ordering
#[async_trait]
pub trait SocialStore: Send + Sync {
    /// All posts, creation time descending
    async fn fetch_posts(&self) -> ProviderResult<Vec<PostRow>>;

    /// Posts by a single author, creation time descending
    async fn fetch_posts_by_user(&self, user_id: Uuid) -> ProviderResult<Vec<PostRow>>;

    /// Profiles for a set of user ids; absent ids are simply missing from
    /// the result
    async fn fetch_profiles(&self, user_ids: &[Uuid]) -> ProviderResult<Vec<ProfileRow>>;

    async fn fetch_profile(&self, user_id: Uuid) -> ProviderResult<Option<ProfileRow>>;

    /// Uniqueness probe: `None` means the username is available
    async fn fetch_profile_by_username(&self, username: &str)
        -> ProviderResult<Option<ProfileRow>>;

    /// All like rows referencing the given posts
    async fn fetch_likes(&self, post_ids: &[Uuid]) -> ProviderResult<Vec<LikeRow>>;

    /// Comments for the given posts, creation time ascending
    async fn fetch_comments(&self, post_ids: &[Uuid]) -> ProviderResult<Vec<CommentRow>>;

    async fn insert_like(&self, like: LikeRow) -> ProviderResult<()>;

    /// Returns false when no matching row existed
    async fn delete_like(&self, user_id: Uuid, post_id: Uuid) -> ProviderResult<bool>;

    /// Server assigns id and timestamp; the stored row is returned
    async fn insert_comment(&self, comment: NewComment) -> ProviderResult<CommentRow>;

    /// Server assigns id and timestamp; the stored row is returned
    async fn insert_post(&self, post: NewPost) -> ProviderResult<PostRow>;

    /// Creates or updates a profile row; username uniqueness violations
    /// surface as [`ProviderError::UniqueViolation`]
    async fn upsert_profile(&self, profile: ProfileRow) -> ProviderResult<()>;

    /// Most recent notifications for a user, creation time descending
    async fn fetch_notifications(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> ProviderResult<Vec<NotificationRow>>;

    /// Flips the read flag on all unread notifications; returns the number
    /// of rows updated
    async fn mark_notifications_read(&self, user_id: Uuid) -> ProviderResult<u64>;

    async fn count_profiles(&self) -> ProviderResult<u64>;
    async fn count_posts(&self) -> ProviderResult<u64>;
    async fn count_likes(&self) -> ProviderResult<u64>;
    async fn count_comments(&self) -> ProviderResult<u64>;
}

/// Realtime change-feed contract
#[async_trait]
pub trait RealtimeChannel: Send + Sync {
    /// Opens a channel for the topic. Dropping the receiver releases the
    /// channel on the provider side.
    async fn subscribe(&self, topic: ChannelTopic) -> ProviderResult<mpsc::Receiver<ChangeEvent>>;
}

/// Object storage contract for image uploads
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Uploads bytes and returns a public url
    async fn upload(&self, path: &str, bytes: Vec<u8>, overwrite: bool) -> ProviderResult<String>;
}

/// Payload for the remote notification function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub kind: NotificationKind,
    pub post_id: Uuid,
    pub actor_id: Uuid,
    pub recipient_id: Uuid,
    /// Present for comment notifications
    pub comment_body: Option<String>,
}

/// Remote function that materializes a notification row for the recipient.
/// Call sites treat this as fire-and-forget.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(&self, request: NotificationRequest) -> ProviderResult<()>;
}

/// Template fields for the comment email. The recipient address is resolved
/// server-side from `post_owner_id`; the client never handles it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentEmail {
    pub post_owner_id: Uuid,
    pub owner_username: String,
    pub commenter_username: String,
    pub comment_body: String,
    pub post_caption: String,
}

/// Email delivery contract
#[async_trait]
pub trait EmailDispatcher: Send + Sync {
    async fn send_comment_email(&self, email: CommentEmail) -> ProviderResult<()>;
}
