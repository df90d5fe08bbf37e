//! In-memory provider implementations shared by the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use provider_api::{
    ChangeEvent, ChannelTopic, CommentEmail, CommentRow, Credentials, EmailDispatcher,
    IdentityProvider, LikeRow, NewComment, NewPost, NotificationDispatcher, NotificationKind,
    NotificationRequest, NotificationRow, ObjectStorage, PostRow, ProfileRow, ProfileSeed,
    ProviderError, ProviderResult, RealtimeChannel, SocialStore, Viewer,
};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Deterministic base instant for server-assigned timestamps
fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

#[derive(Default)]
struct StoreInner {
    posts: Vec<PostRow>,
    profiles: Vec<ProfileRow>,
    likes: Vec<LikeRow>,
    comments: Vec<CommentRow>,
    notifications: Vec<NotificationRow>,
    /// Monotonic tick for server-assigned timestamps
    clock: i64,
}

impl StoreInner {
    fn next_time(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        base_time() + Duration::seconds(self.clock)
    }
}

/// In-memory `SocialStore` with per-concern failure toggles
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<StoreInner>,
    pub fail_posts: AtomicBool,
    pub fail_profiles: AtomicBool,
    pub fail_likes: AtomicBool,
    pub fail_comments: AtomicBool,
    pub fail_like_writes: AtomicBool,
    pub fail_comment_insert: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_profile(&self, username: &str) -> ProfileRow {
        let profile = ProfileRow {
            id: Uuid::new_v4(),
            username: username.to_string(),
            avatar_url: None,
        };
        self.inner.lock().unwrap().profiles.push(profile.clone());
        profile
    }

    pub fn add_post(&self, user_id: Uuid, caption: &str) -> PostRow {
        let mut inner = self.inner.lock().unwrap();
        let created_at = inner.next_time();
        let post = PostRow {
            id: Uuid::new_v4(),
            user_id,
            image_url: format!("https://cdn.test/{}.png", caption),
            caption: caption.to_string(),
            created_at,
        };
        inner.posts.push(post.clone());
        post
    }

    pub fn add_like(&self, user_id: Uuid, post_id: Uuid) {
        self.inner
            .lock()
            .unwrap()
            .likes
            .push(LikeRow { user_id, post_id });
    }

    pub fn add_comment(&self, user_id: Uuid, post_id: Uuid, body: &str) -> CommentRow {
        let mut inner = self.inner.lock().unwrap();
        let created_at = inner.next_time();
        let comment = CommentRow {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            body: body.to_string(),
            created_at,
        };
        inner.comments.push(comment.clone());
        comment
    }

    pub fn add_notification(&self, user_id: Uuid, message: &str, read: bool) -> NotificationRow {
        let mut inner = self.inner.lock().unwrap();
        let created_at = inner.next_time();
        let row = NotificationRow {
            id: Uuid::new_v4(),
            user_id,
            kind: NotificationKind::Like,
            message: message.to_string(),
            read,
            post_id: Uuid::new_v4(),
            created_at,
        };
        inner.notifications.push(row.clone());
        row
    }

    pub fn like_rows(&self) -> Vec<LikeRow> {
        self.inner.lock().unwrap().likes.clone()
    }

    /// Drops all like rows behind the client's back
    pub fn clear_likes(&self) {
        self.inner.lock().unwrap().likes.clear();
    }

    pub fn comment_rows(&self) -> Vec<CommentRow> {
        self.inner.lock().unwrap().comments.clone()
    }

    fn remote_if(&self, flag: &AtomicBool, what: &str) -> ProviderResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(ProviderError::Remote(format!("{} unavailable", what)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SocialStore for MemoryStore {
    async fn fetch_posts(&self) -> ProviderResult<Vec<PostRow>> {
        self.remote_if(&self.fail_posts, "posts")?;
        let mut posts = self.inner.lock().unwrap().posts.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn fetch_posts_by_user(&self, user_id: Uuid) -> ProviderResult<Vec<PostRow>> {
        let mut posts: Vec<PostRow> = self
            .inner
            .lock()
            .unwrap()
            .posts
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn fetch_profiles(&self, user_ids: &[Uuid]) -> ProviderResult<Vec<ProfileRow>> {
        self.remote_if(&self.fail_profiles, "profiles")?;
        Ok(self
            .inner
            .lock()
            .unwrap()
            .profiles
            .iter()
            .filter(|p| user_ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn fetch_profile(&self, user_id: Uuid) -> ProviderResult<Option<ProfileRow>> {
        self.remote_if(&self.fail_profiles, "profiles")?;
        Ok(self
            .inner
            .lock()
            .unwrap()
            .profiles
            .iter()
            .find(|p| p.id == user_id)
            .cloned())
    }

    async fn fetch_profile_by_username(
        &self,
        username: &str,
    ) -> ProviderResult<Option<ProfileRow>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .profiles
            .iter()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn fetch_likes(&self, post_ids: &[Uuid]) -> ProviderResult<Vec<LikeRow>> {
        self.remote_if(&self.fail_likes, "likes")?;
        Ok(self
            .inner
            .lock()
            .unwrap()
            .likes
            .iter()
            .filter(|l| post_ids.contains(&l.post_id))
            .cloned()
            .collect())
    }

    async fn fetch_comments(&self, post_ids: &[Uuid]) -> ProviderResult<Vec<CommentRow>> {
        self.remote_if(&self.fail_comments, "comments")?;
        let mut comments: Vec<CommentRow> = self
            .inner
            .lock()
            .unwrap()
            .comments
            .iter()
            .filter(|c| post_ids.contains(&c.post_id))
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn insert_like(&self, like: LikeRow) -> ProviderResult<()> {
        self.remote_if(&self.fail_like_writes, "like writes")?;
        let mut inner = self.inner.lock().unwrap();
        if !inner.likes.contains(&like) {
            inner.likes.push(like);
        }
        Ok(())
    }

    async fn delete_like(&self, user_id: Uuid, post_id: Uuid) -> ProviderResult<bool> {
        self.remote_if(&self.fail_like_writes, "like writes")?;
        let mut inner = self.inner.lock().unwrap();
        let before = inner.likes.len();
        inner
            .likes
            .retain(|l| !(l.user_id == user_id && l.post_id == post_id));
        Ok(inner.likes.len() < before)
    }

    async fn insert_comment(&self, comment: NewComment) -> ProviderResult<CommentRow> {
        self.remote_if(&self.fail_comment_insert, "comment writes")?;
        let mut inner = self.inner.lock().unwrap();
        let created_at = inner.next_time();
        let row = CommentRow {
            id: Uuid::new_v4(),
            post_id: comment.post_id,
            user_id: comment.user_id,
            body: comment.body,
            created_at,
        };
        inner.comments.push(row.clone());
        Ok(row)
    }

    async fn insert_post(&self, post: NewPost) -> ProviderResult<PostRow> {
        let mut inner = self.inner.lock().unwrap();
        let created_at = inner.next_time();
        let row = PostRow {
            id: Uuid::new_v4(),
            user_id: post.user_id,
            image_url: post.image_url,
            caption: post.caption,
            created_at,
        };
        inner.posts.push(row.clone());
        Ok(row)
    }

    async fn upsert_profile(&self, profile: ProfileRow) -> ProviderResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .profiles
            .iter()
            .any(|p| p.username == profile.username && p.id != profile.id)
        {
            return Err(ProviderError::UniqueViolation(format!(
                "username '{}' already exists",
                profile.username
            )));
        }
        if let Some(existing) = inner.profiles.iter_mut().find(|p| p.id == profile.id) {
            *existing = profile;
        } else {
            inner.profiles.push(profile);
        }
        Ok(())
    }

    async fn fetch_notifications(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> ProviderResult<Vec<NotificationRow>> {
        let mut rows: Vec<NotificationRow> = self
            .inner
            .lock()
            .unwrap()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn mark_notifications_read(&self, user_id: Uuid) -> ProviderResult<u64> {
        let mut inner = self.inner.lock().unwrap();
        let mut updated = 0;
        for row in inner
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.read)
        {
            row.read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn count_profiles(&self) -> ProviderResult<u64> {
        Ok(self.inner.lock().unwrap().profiles.len() as u64)
    }

    async fn count_posts(&self) -> ProviderResult<u64> {
        Ok(self.inner.lock().unwrap().posts.len() as u64)
    }

    async fn count_likes(&self) -> ProviderResult<u64> {
        Ok(self.inner.lock().unwrap().likes.len() as u64)
    }

    async fn count_comments(&self) -> ProviderResult<u64> {
        Ok(self.inner.lock().unwrap().comments.len() as u64)
    }
}

/// Notification dispatcher that records requests and can be made to fail
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<NotificationRequest>>,
    pub fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<NotificationRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingNotifier {
    async fn send(&self, request: NotificationRequest) -> ProviderResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ProviderError::Remote("edge function unavailable".into()));
        }
        self.sent.lock().unwrap().push(request);
        Ok(())
    }
}

/// Email dispatcher that records sends and can be made to fail
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<CommentEmail>>,
    pub fail: AtomicBool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emails(&self) -> Vec<CommentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailDispatcher for RecordingMailer {
    async fn send_comment_email(&self, email: CommentEmail) -> ProviderResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ProviderError::Remote("email service unavailable".into()));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Identity provider with a fixed viewer and recorded sign-ups
#[derive(Default)]
pub struct MemoryIdentity {
    pub viewer: Option<Viewer>,
    pub signups: Mutex<Vec<(Credentials, ProfileSeed)>>,
}

impl MemoryIdentity {
    pub fn signed_in(id: Uuid) -> Self {
        Self {
            viewer: Some(Viewer {
                id,
                email: "viewer@example.test".into(),
            }),
            signups: Mutex::new(Vec::new()),
        }
    }

    pub fn signup_count(&self) -> usize {
        self.signups.lock().unwrap().len()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn current_viewer(&self) -> ProviderResult<Option<Viewer>> {
        Ok(self.viewer.clone())
    }

    async fn sign_in(&self, credentials: Credentials) -> ProviderResult<Viewer> {
        self.viewer
            .clone()
            .filter(|v| v.email == credentials.email)
            .ok_or(ProviderError::Unauthorized)
    }

    async fn sign_up(&self, credentials: Credentials, seed: ProfileSeed) -> ProviderResult<()> {
        self.signups.lock().unwrap().push((credentials, seed));
        Ok(())
    }
}

/// Object storage recording uploads under a fake public host
#[derive(Default)]
pub struct MemoryStorage {
    pub uploads: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload_paths(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(&self, path: &str, _bytes: Vec<u8>, _overwrite: bool) -> ProviderResult<String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ProviderError::Storage("bucket unavailable".into()));
        }
        self.uploads.lock().unwrap().push(path.to_string());
        Ok(format!("https://cdn.test/{}", path))
    }
}

/// In-memory realtime channel fanning published events out to matching
/// subscribers
#[derive(Default)]
pub struct MemoryChannel {
    subscribers: Mutex<Vec<(ChannelTopic, mpsc::Sender<ChangeEvent>)>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers an event to every matching live subscriber; returns how
    /// many received it
    pub async fn publish(&self, event: ChangeEvent) -> usize {
        let targets: Vec<mpsc::Sender<ChangeEvent>> = {
            let mut subs = self.subscribers.lock().unwrap();
            subs.retain(|(_, tx)| !tx.is_closed());
            subs.iter()
                .filter(|(topic, _)| topic.matches(&event))
                .map(|(_, tx)| tx.clone())
                .collect()
        };
        let mut delivered = 0;
        for tx in targets {
            if tx.send(event.clone()).await.is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    pub fn live_subscribers(&self) -> usize {
        let mut subs = self.subscribers.lock().unwrap();
        subs.retain(|(_, tx)| !tx.is_closed());
        subs.len()
    }
}

#[async_trait]
impl RealtimeChannel for MemoryChannel {
    async fn subscribe(&self, topic: ChannelTopic) -> ProviderResult<mpsc::Receiver<ChangeEvent>> {
        let (tx, rx) = mpsc::channel(32);
        self.subscribers.lock().unwrap().push((topic, tx));
        Ok(rx)
    }
}
