//! Like-count ranking for the discovery grid.

use crate::domain::PostView;

/// Filters posts with strictly more than `min_likes` likes and orders them
/// by like count descending. The sort is stable, so equal counts keep their
/// feed order.
pub fn rank_posts(posts: Vec<PostView>, min_likes: u64) -> Vec<PostView> {
    let mut ranked: Vec<PostView> = posts
        .into_iter()
        .filter(|p| p.like_count > min_likes)
        .collect();
    ranked.sort_by(|a, b| b.like_count.cmp(&a.like_count));
    ranked
}
