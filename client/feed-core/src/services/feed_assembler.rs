//! Combines raw post rows with profiles, like counts and comments into the
//! view model consumed by the UI.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use provider_api::{CommentRow, LikeRow, SocialStore};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{CommentView, PostView};
use crate::error::AppResult;
use crate::services::engagement::Engagement;
use crate::services::profile_directory::ProfileDirectory;

/// Assembles the full feed view model from store rows.
///
/// Post retrieval is the only fatal step: if it fails, no partial feed is
/// produced. Profile, like and comment enrichment each degrade per concern
/// to empty defaults.
#[derive(Clone)]
pub struct FeedAssembler<S> {
    store: Arc<S>,
}

impl<S: SocialStore> FeedAssembler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Loads and assembles the feed, preserving the store's creation-time
    /// descending order.
    pub async fn load_feed(&self, viewer: Option<Uuid>) -> AppResult<Vec<PostView>> {
        let posts = self.store.fetch_posts().await?;
        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

        let comments = match self.store.fetch_comments(&post_ids).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("comment lookup failed, rendering without comments: {}", e);
                Vec::new()
            }
        };

        let likes: Vec<LikeRow> = match self.store.fetch_likes(&post_ids).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("like lookup failed, rendering zero counts: {}", e);
                Vec::new()
            }
        };

        // Distinct authors across posts and comments, resolved in one pass
        let author_ids: Vec<Uuid> = posts
            .iter()
            .map(|p| p.user_id)
            .chain(comments.iter().map(|c| c.user_id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let directory = ProfileDirectory::load(self.store.as_ref(), &author_ids).await;

        let engagement = Engagement::aggregate(&post_ids, &likes, viewer);
        let mut grouped = group_comments(comments, &directory);

        let feed: Vec<PostView> = posts
            .into_iter()
            .map(|row| {
                let author = directory.display(&row.user_id);
                let mut view = PostView::from_row(row, author);
                view.like_count = engagement.count(&view.id);
                view.viewer_has_liked = engagement.viewer_liked(&view.id);
                view.comments = grouped.remove(&view.id).unwrap_or_default();
                view
            })
            .collect();

        debug!("assembled feed with {} posts", feed.len());
        Ok(feed)
    }
}

/// Groups comment rows by post, preserving the store's ascending order, and
/// attaches each author's display data.
fn group_comments(
    comments: Vec<CommentRow>,
    directory: &ProfileDirectory,
) -> HashMap<Uuid, Vec<CommentView>> {
    let mut grouped: HashMap<Uuid, Vec<CommentView>> = HashMap::new();
    for row in comments {
        let author = directory.display(&row.user_id);
        grouped
            .entry(row.post_id)
            .or_default()
            .push(CommentView::from_row(row, author));
    }
    grouped
}
