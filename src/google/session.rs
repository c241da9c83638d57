//! Stored Google OAuth session (access + refresh tokens).
//!
//! dosecal connects a single account; the session lives at
//! ~/.config/dosecal/session.toml next to the credentials config.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dosecal_core::error::{ReminderError, ReminderResult};
use dosecal_core::gateway::{Authenticator, Credential};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};

use crate::config;

pub struct Session {
    data: SessionData,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl From<&AccessToken> for SessionData {
    fn from(tokens: &AccessToken) -> Self {
        SessionData {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at: Utc::now() + Duration::seconds(tokens.expires_in),
        }
    }
}

impl Session {
    fn path() -> Result<std::path::PathBuf> {
        Ok(config::base_dir()?.join("session.toml"))
    }

    pub fn new(data: SessionData) -> Self {
        Session { data }
    }

    pub fn credential(&self) -> Credential {
        Credential {
            access_token: self.data.access_token.clone(),
            refresh_token: self.data.refresh_token.clone(),
        }
    }

    /// Load the stored session, refreshing it first if it has expired.
    pub async fn load_valid() -> Result<Self> {
        let mut session = Self::load()?;
        if session.is_expired() {
            session.refresh().await?;
        }
        Ok(session)
    }

    fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            anyhow::bail!("No Google session found. Run `dosecal auth` first.");
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read Google session from {}", path.display()))?;

        let data: SessionData = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse Google session from {}", path.display()))?;

        Ok(Session { data })
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write session to {}", path.display()))?;

        // Set to owner-only (0600) since the file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }

    fn is_expired(&self) -> bool {
        Utc::now() >= self.data.expires_at
    }

    fn client(&self) -> Result<Client> {
        let creds = config::load()?;

        Ok(Client::new(
            creds.client_id,
            creds.client_secret,
            String::new(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        ))
    }

    async fn refresh(&mut self) -> Result<()> {
        let mut tokens = self
            .client()?
            .refresh_access_token()
            .await
            .context("Failed to refresh token")?;

        // Google typically doesn't return a new refresh_token on refresh
        if tokens.refresh_token.is_empty() {
            tokens.refresh_token = self.data.refresh_token.clone();
        }

        self.data = SessionData::from(&tokens);
        self.save()?;

        Ok(())
    }
}

/// [`Authenticator`] backed by the stored session file.
pub struct GoogleAuth;

#[async_trait]
impl Authenticator for GoogleAuth {
    async fn credential(&self) -> ReminderResult<Credential> {
        let session = Session::load_valid()
            .await
            .map_err(|e| ReminderError::AuthenticationFailed(format!("{e:#}")))?;
        Ok(session.credential())
    }
}
