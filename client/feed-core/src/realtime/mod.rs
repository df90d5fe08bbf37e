pub mod dashboard;
pub mod notification_feed;
pub mod subscription;

pub use dashboard::{DashboardController, DashboardHandle, DashboardState, DashboardUpdate};
pub use notification_feed::{NotificationCenter, NotificationFeed, NotificationHandle};
pub use subscription::SubscriptionHandle;
