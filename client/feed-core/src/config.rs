/// Configuration for the feed client
///
/// Loads configuration from environment variables with sensible defaults;
/// nothing is required at startup.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Maximum notifications fetched on initial bell load
    #[serde(default = "default_notification_page_size")]
    pub notification_page_size: usize,
    /// Minimum like count (exclusive) for the ranking grid
    #[serde(default = "default_rank_min_likes")]
    pub rank_min_likes: u64,
    /// Entries retained in the dashboard recent-activity log
    #[serde(default = "default_activity_log_capacity")]
    pub activity_log_capacity: usize,
    /// Storage bucket for avatar uploads
    #[serde(default = "default_avatar_bucket")]
    pub avatar_bucket: String,
}

fn default_notification_page_size() -> usize {
    20
}

fn default_rank_min_likes() -> u64 {
    5
}

fn default_activity_log_capacity() -> usize {
    10
}

fn default_avatar_bucket() -> String {
    "images".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Config {
            notification_page_size: std::env::var("NOTIFICATION_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_notification_page_size),
            rank_min_likes: std::env::var("RANK_MIN_LIKES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_rank_min_likes),
            activity_log_capacity: std::env::var("ACTIVITY_LOG_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_activity_log_capacity),
            avatar_bucket: std::env::var("AVATAR_BUCKET")
                .unwrap_or_else(|_| default_avatar_bucket()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            notification_page_size: default_notification_page_size(),
            rank_min_likes: default_rank_min_likes(),
            activity_log_capacity: default_activity_log_capacity(),
            avatar_bucket: default_avatar_bucket(),
        }
    }
}
