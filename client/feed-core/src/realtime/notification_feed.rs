//! Per-user notification feed with live inserts and batched mark-as-read.

use std::sync::Arc;

use provider_api::{
    ChangeOp, ChangeRecord, ChannelTopic, NotificationRow, RealtimeChannel, SocialStore,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::NotificationView;
use crate::error::{AppError, AppResult};
use crate::realtime::subscription::SubscriptionHandle;

/// Queue depth for mark-all-read commands
const COMMAND_BUFFER: usize = 8;

/// Notification list state, newest first. Rows are created remotely; the
/// only local mutation is flipping read flags after a batched mark-all-read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationFeed {
    items: Vec<NotificationView>,
}

impl NotificationFeed {
    pub fn from_rows(rows: Vec<NotificationRow>) -> Self {
        Self {
            items: rows.into_iter().map(NotificationView::from).collect(),
        }
    }

    pub fn items(&self) -> &[NotificationView] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    /// Prepends a pushed notification (arrival order, newest first)
    pub fn apply_insert(&mut self, row: NotificationRow) {
        self.items.insert(0, NotificationView::from(row));
    }

    /// Local half of mark-all-read, applied after the remote update lands
    pub fn mark_all_read_local(&mut self) {
        for item in &mut self.items {
            item.read = true;
        }
    }
}

enum Command {
    MarkAllRead(oneshot::Sender<AppResult<u64>>),
}

/// Handle to a running notification center.
///
/// State is read through a watch channel; mutations travel as messages to
/// the applier task. Dropping the handle tears the subscription down.
pub struct NotificationHandle {
    state: watch::Receiver<NotificationFeed>,
    commands: mpsc::Sender<Command>,
    applier: SubscriptionHandle,
}

impl NotificationHandle {
    pub fn state(&self) -> watch::Receiver<NotificationFeed> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> NotificationFeed {
        self.state.borrow().clone()
    }

    /// Flips the read flag remotely for all unread notifications, then
    /// locally. Returns the number of rows the store reported updated.
    pub async fn mark_all_read(&self) -> AppResult<u64> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::MarkAllRead(tx))
            .await
            .map_err(|_| AppError::Internal("notification center stopped".into()))?;
        rx.await
            .map_err(|_| AppError::Internal("notification center stopped".into()))?
    }

    pub fn shutdown(self) {
        self.applier.shutdown();
    }
}

/// Spawns the per-user notification center: initial load, realtime inserts,
/// and the mark-all-read command loop.
pub struct NotificationCenter;

impl NotificationCenter {
    pub async fn spawn<S, C>(
        store: Arc<S>,
        channel: Arc<C>,
        viewer: Uuid,
        page_size: usize,
    ) -> AppResult<NotificationHandle>
    where
        S: SocialStore + 'static,
        C: RealtimeChannel,
    {
        // Initial page; a failed load degrades to an empty list so the live
        // subscription still attaches
        let initial = match store.fetch_notifications(viewer, page_size).await {
            Ok(rows) => NotificationFeed::from_rows(rows),
            Err(e) => {
                warn!("initial notification load failed: {}", e);
                NotificationFeed::default()
            }
        };

        let mut events = channel
            .subscribe(ChannelTopic::notifications_for(viewer))
            .await?;
        let (state_tx, state_rx) = watch::channel(initial);
        let (command_tx, mut command_rx) = mpsc::channel(COMMAND_BUFFER);

        let applier = SubscriptionHandle::new(tokio::spawn(async move {
            loop {
                tokio::select! {
                    event = events.recv() => match event {
                        Some(event) => {
                            if let (ChangeOp::Insert, ChangeRecord::Notification(row)) =
                                (event.op, event.record)
                            {
                                // The topic filter already scopes to the
                                // viewer; drop anything else defensively
                                if row.user_id == viewer {
                                    state_tx.send_modify(|feed| feed.apply_insert(row));
                                }
                            }
                        }
                        None => {
                            debug!("notification channel closed");
                            break;
                        }
                    },
                    command = command_rx.recv() => match command {
                        Some(Command::MarkAllRead(reply)) => {
                            let result = match store.mark_notifications_read(viewer).await {
                                Ok(updated) => {
                                    state_tx.send_modify(|feed| feed.mark_all_read_local());
                                    Ok(updated)
                                }
                                Err(e) => Err(e.into()),
                            };
                            let _ = reply.send(result);
                        }
                        None => break,
                    },
                }
            }
        }));

        Ok(NotificationHandle {
            state: state_rx,
            commands: command_tx,
            applier,
        })
    }
}
