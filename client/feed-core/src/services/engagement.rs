//! Like-count aggregation over raw join-table rows.

use std::collections::{HashMap, HashSet};

use provider_api::LikeRow;
use uuid::Uuid;

/// Per-post like counts plus the viewer's like membership.
///
/// Counting is a pure fold over the rows: every requested post starts at
/// zero and gains one per matching row, independent of row order. The
/// viewer-liked set is a separate membership test; counts are computed even
/// when no viewer identity is available.
#[derive(Debug, Clone, Default)]
pub struct Engagement {
    counts: HashMap<Uuid, u64>,
    viewer_liked: HashSet<Uuid>,
}

impl Engagement {
    pub fn aggregate(post_ids: &[Uuid], likes: &[LikeRow], viewer: Option<Uuid>) -> Self {
        let mut counts: HashMap<Uuid, u64> = post_ids.iter().map(|id| (*id, 0)).collect();
        let mut viewer_liked = HashSet::new();

        for like in likes {
            if let Some(count) = counts.get_mut(&like.post_id) {
                *count += 1;
            }
            if viewer == Some(like.user_id) {
                viewer_liked.insert(like.post_id);
            }
        }

        Self {
            counts,
            viewer_liked,
        }
    }

    /// Like count for a post; zero for posts outside the requested set
    pub fn count(&self, post_id: &Uuid) -> u64 {
        self.counts.get(post_id).copied().unwrap_or(0)
    }

    /// Whether the viewer supplied at aggregation liked the post
    pub fn viewer_liked(&self, post_id: &Uuid) -> bool {
        self.viewer_liked.contains(post_id)
    }
}
