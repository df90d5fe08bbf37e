//! Owner of the live feed state and the optimistic mutation layer.

use std::sync::Arc;

use provider_api::{
    CommentEmail, EmailDispatcher, LikeRow, NewComment, NotificationDispatcher, NotificationKind,
    NotificationRequest, SocialStore,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{CommentView, PostView, ProfileDisplay};
use crate::error::{AppError, AppResult};
use crate::services::feed_assembler::FeedAssembler;

/// Single owner of the assembled feed.
///
/// All mutations go through `&mut self`, so two operations on the same post
/// cannot be in flight at once from one controller; callers that clone state
/// across tasks reintroduce completion-order races.
///
/// Like toggling is optimistic: local state flips before the remote write
/// and rolls back on rejection. Comment submission is not optimistic — the
/// comment's id and timestamp are server-assigned, so nothing is shown until
/// the insert is acknowledged.
pub struct FeedController<S, N, E> {
    store: Arc<S>,
    notifier: Arc<N>,
    mailer: Arc<E>,
    assembler: FeedAssembler<S>,
    viewer: Option<Uuid>,
    posts: Vec<PostView>,
}

impl<S, N, E> FeedController<S, N, E>
where
    S: SocialStore,
    N: NotificationDispatcher,
    E: EmailDispatcher,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, mailer: Arc<E>, viewer: Option<Uuid>) -> Self {
        let assembler = FeedAssembler::new(store.clone());
        Self {
            store,
            notifier,
            mailer,
            assembler,
            viewer,
            posts: Vec::new(),
        }
    }

    /// Reloads the feed from the store, replacing the held state wholesale
    pub async fn refresh(&mut self) -> AppResult<()> {
        self.posts = self.assembler.load_feed(self.viewer).await?;
        Ok(())
    }

    pub fn posts(&self) -> &[PostView] {
        &self.posts
    }

    /// Toggles the viewer's like on a post.
    ///
    /// not-liked -> liked: local flag and count flip first, then the remote
    /// insert; rejection rolls both back. A successful like on someone
    /// else's post dispatches a notification fire-and-forget. liked ->
    /// not-liked is the mirror with a remote delete; deleting a like the
    /// store never had is a remote no-op.
    pub async fn toggle_like(&mut self, post_id: Uuid) -> AppResult<()> {
        let viewer = self.viewer.ok_or(AppError::Unauthorized)?;
        let post = self
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

        if post.viewer_has_liked {
            post.viewer_has_liked = false;
            post.like_count = post.like_count.saturating_sub(1);

            if let Err(e) = self.store.delete_like(viewer, post_id).await {
                post.viewer_has_liked = true;
                post.like_count += 1;
                return Err(e.into());
            }
        } else {
            post.viewer_has_liked = true;
            post.like_count += 1;

            if let Err(e) = self
                .store
                .insert_like(LikeRow {
                    user_id: viewer,
                    post_id,
                })
                .await
            {
                post.viewer_has_liked = false;
                post.like_count = post.like_count.saturating_sub(1);
                return Err(e.into());
            }

            let author_id = post.user_id;
            if author_id != viewer {
                // Failure here must never disturb the committed like
                if let Err(e) = self
                    .notifier
                    .send(NotificationRequest {
                        kind: NotificationKind::Like,
                        post_id,
                        actor_id: viewer,
                        recipient_id: author_id,
                        comment_body: None,
                    })
                    .await
                {
                    warn!("like notification dispatch failed: {}", e);
                }
            }
        }
        Ok(())
    }

    /// Submits a comment and appends it to the post once acknowledged.
    ///
    /// When the post belongs to someone else, a notification dispatch and a
    /// comment email are fired independently; either may fail without
    /// blocking or rolling back the comment.
    pub async fn submit_comment(&mut self, post_id: Uuid, body: &str) -> AppResult<CommentView> {
        let viewer = self.viewer.ok_or(AppError::Unauthorized)?;
        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::Validation("comment body is required".into()));
        }

        let (author_id, caption, owner_username) = {
            let post = self
                .posts
                .iter()
                .find(|p| p.id == post_id)
                .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;
            (post.user_id, post.caption.clone(), post.author.username.clone())
        };

        let row = self
            .store
            .insert_comment(NewComment {
                post_id,
                user_id: viewer,
                body: body.to_string(),
            })
            .await?;

        let commenter = match self.store.fetch_profile(viewer).await {
            Ok(Some(profile)) => ProfileDisplay::from(profile),
            Ok(None) => ProfileDisplay::placeholder(),
            Err(e) => {
                warn!("commenter profile lookup failed: {}", e);
                ProfileDisplay::placeholder()
            }
        };

        let view = CommentView::from_row(row, commenter.clone());
        let post = self
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;
        post.comments.push(view.clone());
        info!("comment {} appended to post {}", view.id, post_id);

        if author_id != viewer {
            if let Err(e) = self
                .notifier
                .send(NotificationRequest {
                    kind: NotificationKind::Comment,
                    post_id,
                    actor_id: viewer,
                    recipient_id: author_id,
                    comment_body: Some(body.to_string()),
                })
                .await
            {
                warn!("comment notification dispatch failed: {}", e);
            }

            if let Err(e) = self
                .mailer
                .send_comment_email(CommentEmail {
                    post_owner_id: author_id,
                    owner_username,
                    commenter_username: commenter.username,
                    comment_body: body.to_string(),
                    post_caption: caption,
                })
                .await
            {
                warn!("comment email dispatch failed: {}", e);
            }
        }

        Ok(view)
    }
}
