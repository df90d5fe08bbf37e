//! Profile editing: username changes and avatar uploads.

use std::sync::Arc;

use chrono::Utc;
use provider_api::{ObjectStorage, ProfileRow, ProviderError, SocialStore};
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::validation::{normalize_username, validate_username};

/// Avatar image selected for upload
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub bytes: Vec<u8>,
    /// File extension without the dot, e.g. "png"
    pub extension: String,
}

pub struct ProfileEditor<S, O> {
    store: Arc<S>,
    storage: Arc<O>,
}

impl<S: SocialStore, O: ObjectStorage> ProfileEditor<S, O> {
    pub fn new(store: Arc<S>, storage: Arc<O>) -> Self {
        Self { store, storage }
    }

    pub async fn load_profile(&self, viewer: Uuid) -> AppResult<Option<ProfileRow>> {
        Ok(self.store.fetch_profile(viewer).await?)
    }

    /// Saves the viewer's profile.
    ///
    /// The username is validated and, when changed, probed for uniqueness
    /// against other users before anything is written. An avatar upload
    /// failure aborts the save; the profile row is only written once the
    /// new public url is known.
    pub async fn update_profile(
        &self,
        viewer: Uuid,
        new_username: &str,
        avatar: Option<AvatarUpload>,
    ) -> AppResult<ProfileRow> {
        let username = normalize_username(new_username);
        validate_username(&username)?;

        let current = self.store.fetch_profile(viewer).await?;
        let username_changed = current
            .as_ref()
            .map(|p| p.username != username)
            .unwrap_or(true);

        if username_changed && !self.username_available(&username, viewer).await? {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                username
            )));
        }

        let mut avatar_url = current.and_then(|p| p.avatar_url);
        if let Some(upload) = avatar {
            let path = format!(
                "profile/{}-{}.{}",
                viewer,
                Utc::now().timestamp_millis(),
                upload.extension
            );
            let url = self.storage.upload(&path, upload.bytes, true).await?;
            avatar_url = Some(url);
        }

        let profile = ProfileRow {
            id: viewer,
            username,
            avatar_url,
        };
        self.store.upsert_profile(profile.clone()).await?;

        info!("profile updated for user {}", viewer);
        Ok(profile)
    }

    /// Available when absent, or when the only holder is the viewer itself
    async fn username_available(&self, username: &str, viewer: Uuid) -> AppResult<bool> {
        match self.store.fetch_profile_by_username(username).await {
            Ok(Some(row)) => Ok(row.id == viewer),
            Ok(None) | Err(ProviderError::NotFound) => Ok(true),
            Err(e) => Err(e.into()),
        }
    }
}
