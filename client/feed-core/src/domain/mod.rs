pub mod models;

pub use models::{
    ActivityEntry, ActivityKind, CommentView, DashboardStats, NotificationView, PostView,
    ProfileDisplay, FALLBACK_USERNAME,
};
