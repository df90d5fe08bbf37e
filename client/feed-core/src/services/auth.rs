//! Registration and login flows on top of the identity provider.

use std::sync::Arc;

use provider_api::{Credentials, IdentityProvider, ProfileSeed, ProviderError, SocialStore, Viewer};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::services::validation::{normalize_username, validate_password, validate_username};

pub struct AuthService<I, S> {
    identity: Arc<I>,
    store: Arc<S>,
}

impl<I: IdentityProvider, S: SocialStore> AuthService<I, S> {
    pub fn new(identity: Arc<I>, store: Arc<S>) -> Self {
        Self { identity, store }
    }

    /// Registers a new account.
    ///
    /// Validation and the username uniqueness probe run before any remote
    /// mutation; a taken username surfaces as a conflict without touching
    /// the identity provider.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> AppResult<()> {
        validate_password(password, confirm)?;
        let username = normalize_username(username);
        validate_username(&username)?;

        if !self.username_available(&username).await? {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                username
            )));
        }

        self.identity
            .sign_up(
                Credentials {
                    email: email.to_string(),
                    password: password.to_string(),
                },
                ProfileSeed {
                    username: username.clone(),
                },
            )
            .await?;

        info!("registered account for username {}", username);
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<Viewer> {
        let viewer = self
            .identity
            .sign_in(Credentials {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        Ok(viewer)
    }

    pub async fn current_viewer(&self) -> AppResult<Option<Viewer>> {
        Ok(self.identity.current_viewer().await?)
    }

    /// Not-found on the probe means the username is available
    async fn username_available(&self, username: &str) -> AppResult<bool> {
        match self.store.fetch_profile_by_username(username).await {
            Ok(Some(_)) => Ok(false),
            Ok(None) | Err(ProviderError::NotFound) => Ok(true),
            Err(e) => Err(e.into()),
        }
    }
}
