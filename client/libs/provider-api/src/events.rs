//! Change-event shapes pushed by the provider's realtime channel.
//!
//! Events are delivered in arrival order on a per-channel basis. The
//! transport gives no redelivery guarantees; consumers apply events as-is
//! with no deduplication.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rows::{CommentRow, LikeRow, NotificationRow, PostRow, ProfileRow};

/// Entity kinds a channel can be scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Post,
    Like,
    Comment,
    Profile,
    Notification,
}

/// Row-level operation carried by a change event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOp {
    Insert,
    Delete,
}

/// The row carried by a change event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "table", rename_all = "lowercase")]
pub enum ChangeRecord {
    Post(PostRow),
    Like(LikeRow),
    Comment(CommentRow),
    Profile(ProfileRow),
    Notification(NotificationRow),
}

impl ChangeRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            ChangeRecord::Post(_) => EntityKind::Post,
            ChangeRecord::Like(_) => EntityKind::Like,
            ChangeRecord::Comment(_) => EntityKind::Comment,
            ChangeRecord::Profile(_) => EntityKind::Profile,
            ChangeRecord::Notification(_) => EntityKind::Notification,
        }
    }
}

/// A single change pushed over a realtime channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub op: ChangeOp,
    pub record: ChangeRecord,
}

impl ChangeEvent {
    pub fn insert(record: ChangeRecord) -> Self {
        Self {
            op: ChangeOp::Insert,
            record,
        }
    }

    pub fn delete(record: ChangeRecord) -> Self {
        Self {
            op: ChangeOp::Delete,
            record,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.record.kind()
    }
}

/// Optional row filter applied server-side to a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowFilter {
    /// Only rows whose recipient column equals the given user
    RecipientEq(Uuid),
}

/// Describes one logical event channel to subscribe to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelTopic {
    pub kind: EntityKind,
    /// Operations the channel should deliver
    pub ops: Vec<ChangeOp>,
    pub filter: Option<RowFilter>,
}

impl ChannelTopic {
    /// Channel delivering inserts and deletes for an entity kind
    pub fn all_changes(kind: EntityKind) -> Self {
        Self {
            kind,
            ops: vec![ChangeOp::Insert, ChangeOp::Delete],
            filter: None,
        }
    }

    /// Channel delivering only inserts for an entity kind
    pub fn inserts(kind: EntityKind) -> Self {
        Self {
            kind,
            ops: vec![ChangeOp::Insert],
            filter: None,
        }
    }

    /// Per-user notification channel
    pub fn notifications_for(user_id: Uuid) -> Self {
        Self {
            kind: EntityKind::Notification,
            ops: vec![ChangeOp::Insert],
            filter: Some(RowFilter::RecipientEq(user_id)),
        }
    }

    /// Whether the topic matches a concrete event
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        if event.kind() != self.kind || !self.ops.contains(&event.op) {
            return false;
        }
        match (&self.filter, &event.record) {
            (Some(RowFilter::RecipientEq(user)), ChangeRecord::Notification(row)) => {
                row.user_id == *user
            }
            (Some(_), _) => false,
            (None, _) => true,
        }
    }
}
