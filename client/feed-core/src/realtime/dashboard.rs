//! Live platform dashboard: global counters plus a bounded recent-activity
//! log, folded together from realtime change events.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use provider_api::{
    ChangeEvent, ChangeOp, ChangeRecord, ChannelTopic, EntityKind, RealtimeChannel, SocialStore,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{ActivityEntry, ActivityKind, DashboardStats};
use crate::error::AppResult;
use crate::realtime::subscription::{spawn_forwarder, SubscriptionHandle};
use crate::services::profile_directory::ProfileDirectory;

/// Maximum characters kept from a caption or comment body in an activity
/// entry
const DETAIL_PREVIEW_CHARS: usize = 50;

/// Buffer between the per-entity forwarders and the applier task
const EVENT_BUFFER: usize = 64;

/// A change event reduced to its effect on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DashboardUpdate {
    PostInserted {
        username: String,
        detail: Option<String>,
        at: DateTime<Utc>,
    },
    PostDeleted,
    LikeInserted {
        username: String,
        at: DateTime<Utc>,
    },
    LikeDeleted,
    CommentInserted {
        username: String,
        detail: String,
        at: DateTime<Utc>,
    },
    ProfileInserted {
        username: String,
        at: DateTime<Utc>,
    },
}

/// Dashboard view state. Mutated only inside the controller's watch channel,
/// so readers never observe a half-applied event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardState {
    pub stats: DashboardStats,
    /// Newest first, bounded by the configured capacity
    pub recent_activity: VecDeque<ActivityEntry>,
}

impl DashboardState {
    pub fn with_stats(stats: DashboardStats) -> Self {
        Self {
            stats,
            recent_activity: VecDeque::new(),
        }
    }

    /// Folds one update into the state. Counters decrement with a floor at
    /// zero; the activity log evicts its oldest entry at capacity. Updates
    /// are applied in arrival order with no deduplication, so a redelivered
    /// event double-counts.
    pub fn apply(&mut self, update: DashboardUpdate, capacity: usize) {
        match update {
            DashboardUpdate::PostInserted {
                username,
                detail,
                at,
            } => {
                self.stats.posts += 1;
                self.push_activity(
                    ActivityEntry {
                        kind: ActivityKind::Post,
                        username,
                        detail,
                        occurred_at: at,
                    },
                    capacity,
                );
            }
            DashboardUpdate::PostDeleted => {
                self.stats.posts = self.stats.posts.saturating_sub(1);
            }
            DashboardUpdate::LikeInserted { username, at } => {
                self.stats.likes += 1;
                self.push_activity(
                    ActivityEntry {
                        kind: ActivityKind::Like,
                        username,
                        detail: None,
                        occurred_at: at,
                    },
                    capacity,
                );
            }
            DashboardUpdate::LikeDeleted => {
                self.stats.likes = self.stats.likes.saturating_sub(1);
            }
            DashboardUpdate::CommentInserted {
                username,
                detail,
                at,
            } => {
                self.stats.comments += 1;
                self.push_activity(
                    ActivityEntry {
                        kind: ActivityKind::Comment,
                        username,
                        detail: Some(detail),
                        occurred_at: at,
                    },
                    capacity,
                );
            }
            DashboardUpdate::ProfileInserted { username, at } => {
                self.stats.users += 1;
                self.push_activity(
                    ActivityEntry {
                        kind: ActivityKind::NewUser,
                        username,
                        detail: Some("joined the platform".to_string()),
                        occurred_at: at,
                    },
                    capacity,
                );
            }
        }
    }

    fn push_activity(&mut self, entry: ActivityEntry, capacity: usize) {
        self.recent_activity.push_front(entry);
        self.recent_activity.truncate(capacity);
    }
}

/// First `DETAIL_PREVIEW_CHARS` characters, respecting char boundaries
fn preview(text: &str) -> String {
    text.chars().take(DETAIL_PREVIEW_CHARS).collect()
}

/// Handle to a running dashboard controller.
///
/// Holds the channel tasks; dropping the handle tears every subscription
/// down.
pub struct DashboardHandle {
    state: watch::Receiver<DashboardState>,
    subscriptions: Vec<SubscriptionHandle>,
    applier: SubscriptionHandle,
}

impl DashboardHandle {
    /// Watch side of the published state
    pub fn state(&self) -> watch::Receiver<DashboardState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Explicit teardown of all channel tasks
    pub fn shutdown(mut self) {
        for sub in self.subscriptions.drain(..) {
            sub.shutdown();
        }
        self.applier.shutdown();
    }
}

/// Owns the dashboard state and folds realtime events into it.
pub struct DashboardController;

impl DashboardController {
    /// Seeds counters from the store, subscribes to the post, like, comment
    /// and profile channels, and spawns the applier task. Seed-count
    /// failures degrade to zero so the live merge still runs.
    pub async fn spawn<S, C>(
        store: Arc<S>,
        channel: Arc<C>,
        activity_capacity: usize,
    ) -> AppResult<DashboardHandle>
    where
        S: SocialStore + 'static,
        C: RealtimeChannel,
    {
        let stats = DashboardStats {
            users: seed_count(store.count_profiles().await, "profiles"),
            posts: seed_count(store.count_posts().await, "posts"),
            likes: seed_count(store.count_likes().await, "likes"),
            comments: seed_count(store.count_comments().await, "comments"),
        };

        let (events_tx, mut events_rx) = mpsc::channel::<ChangeEvent>(EVENT_BUFFER);
        let mut subscriptions = Vec::new();
        for kind in [
            EntityKind::Post,
            EntityKind::Like,
            EntityKind::Comment,
            EntityKind::Profile,
        ] {
            let rx = channel.subscribe(ChannelTopic::all_changes(kind)).await?;
            subscriptions.push(spawn_forwarder(rx, events_tx.clone()));
        }
        drop(events_tx);

        let (state_tx, state_rx) = watch::channel(DashboardState::with_stats(stats));
        let applier_store = store.clone();
        let applier = SubscriptionHandle::new(tokio::spawn(async move {
            // Users seen via push events; saves refetching their profiles
            let mut directory = ProfileDirectory::new();
            while let Some(event) = events_rx.recv().await {
                if let Some(update) =
                    derive_update(applier_store.as_ref(), &mut directory, event).await
                {
                    state_tx.send_modify(|state| state.apply(update, activity_capacity));
                }
            }
            debug!("dashboard applier exiting");
        }));

        Ok(DashboardHandle {
            state: state_rx,
            subscriptions,
            applier,
        })
    }
}

fn seed_count(result: Result<u64, provider_api::ProviderError>, entity: &str) -> u64 {
    match result {
        Ok(count) => count,
        Err(e) => {
            warn!("seed count for {} failed, starting at zero: {}", entity, e);
            0
        }
    }
}

/// Reduces a raw change event to a dashboard update, resolving the acting
/// user's display name best-effort via the directory and the store.
async fn derive_update<S: SocialStore + ?Sized>(
    store: &S,
    directory: &mut ProfileDirectory,
    event: ChangeEvent,
) -> Option<DashboardUpdate> {
    let now = Utc::now();
    match (event.op, event.record) {
        (ChangeOp::Insert, ChangeRecord::Post(row)) => {
            let username = resolve_username(store, directory, row.user_id).await;
            let detail = if row.caption.is_empty() {
                None
            } else {
                Some(preview(&row.caption))
            };
            Some(DashboardUpdate::PostInserted {
                username,
                detail,
                at: now,
            })
        }
        (ChangeOp::Delete, ChangeRecord::Post(_)) => Some(DashboardUpdate::PostDeleted),
        (ChangeOp::Insert, ChangeRecord::Like(row)) => {
            let username = resolve_username(store, directory, row.user_id).await;
            Some(DashboardUpdate::LikeInserted { username, at: now })
        }
        (ChangeOp::Delete, ChangeRecord::Like(_)) => Some(DashboardUpdate::LikeDeleted),
        (ChangeOp::Insert, ChangeRecord::Comment(row)) => {
            let username = resolve_username(store, directory, row.user_id).await;
            Some(DashboardUpdate::CommentInserted {
                username,
                detail: preview(&row.body),
                at: now,
            })
        }
        (ChangeOp::Insert, ChangeRecord::Profile(row)) => {
            let username = row.username.clone();
            directory.insert(row);
            Some(DashboardUpdate::ProfileInserted { username, at: now })
        }
        // Comment/profile deletes and notification rows are outside the
        // dashboard's scope
        (_, _) => None,
    }
}

async fn resolve_username<S: SocialStore + ?Sized>(
    store: &S,
    directory: &mut ProfileDirectory,
    user_id: Uuid,
) -> String {
    if directory.contains(&user_id) {
        return directory.display(&user_id).username;
    }
    match store.fetch_profile(user_id).await {
        Ok(Some(row)) => {
            directory.insert(row.clone());
            row.username
        }
        Ok(None) => directory.display(&user_id).username,
        Err(e) => {
            warn!("username lookup for activity entry failed: {}", e);
            directory.display(&user_id).username
        }
    }
}
