//! Per-load cache of user display data.

use std::collections::HashMap;

use provider_api::{ProfileRow, SocialStore};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ProfileDisplay;

/// Maps user ids to display data for the working set of a feed load.
///
/// Built fresh per fetch; the realtime merge layer inserts entries for users
/// that arrive via push events. Lookups never fail: absent profiles degrade
/// to a placeholder display.
#[derive(Debug, Clone, Default)]
pub struct ProfileDirectory {
    entries: HashMap<Uuid, ProfileDisplay>,
}

impl ProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the given user ids against the store. A failed lookup
    /// degrades to an empty directory rather than failing the caller.
    pub async fn load<S: SocialStore + ?Sized>(store: &S, user_ids: &[Uuid]) -> Self {
        if user_ids.is_empty() {
            return Self::new();
        }
        match store.fetch_profiles(user_ids).await {
            Ok(rows) => Self::from_rows(rows),
            Err(e) => {
                warn!("profile lookup failed, rendering placeholders: {}", e);
                Self::new()
            }
        }
    }

    pub fn from_rows(rows: Vec<ProfileRow>) -> Self {
        let entries = rows
            .into_iter()
            .map(|row| (row.id, ProfileDisplay::from(row)))
            .collect();
        Self { entries }
    }

    /// Display data for a user, or the placeholder when absent
    pub fn display(&self, user_id: &Uuid) -> ProfileDisplay {
        self.entries
            .get(user_id)
            .cloned()
            .unwrap_or_else(ProfileDisplay::placeholder)
    }

    pub fn contains(&self, user_id: &Uuid) -> bool {
        self.entries.contains_key(user_id)
    }

    /// Inserts or replaces an entry; used for profiles arriving over the
    /// realtime channel
    pub fn insert(&mut self, row: ProfileRow) {
        self.entries.insert(row.id, ProfileDisplay::from(row));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
