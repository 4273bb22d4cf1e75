//! Typed users resource over the authenticated client

use crate::api::client::ApiClient;
use crate::error::{Error, Result};
use crate::prefs::Theme;
use crate::session::{Role, Session};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A managed user account as the API reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub role: Role,
    /// Theme assigned to this account
    #[serde(default)]
    pub theme: Theme,
}

/// Payload for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub theme: Theme,
}

/// Partial update payload; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl ApiClient {
    /// Fetch all users.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
        let response = self.get("users").await?;
        parse_json(response).await
    }

    /// Fetch one user by id.
    pub async fn get_user(&self, id: &str) -> Result<UserRecord> {
        let response = self.get(&format!("users/{}", id)).await.map_err(not_found(id))?;
        parse_json(response).await
    }

    /// Create a user.
    pub async fn create_user(&self, user: &NewUser) -> Result<UserRecord> {
        let response = self.post("users", user).await?;
        parse_json(response).await
    }

    /// Update a user.
    pub async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<UserRecord> {
        let response = self
            .put(&format!("users/{}", id), update)
            .await
            .map_err(not_found(id))?;
        parse_json(response).await
    }

    /// Delete a user.
    pub async fn delete_user(&self, id: &str) -> Result<()> {
        self.delete(&format!("users/{}", id))
            .await
            .map_err(not_found(id))?;
        Ok(())
    }

    /// Change a user's role and leave an audit trail naming the actor.
    pub async fn set_user_role(&self, actor: &Session, id: &str, role: Role) -> Result<UserRecord> {
        let updated = self
            .update_user(
                id,
                &UserUpdate {
                    role: Some(role),
                    ..Default::default()
                },
            )
            .await?;
        tracing::info!("AUDIT: {} changed role of user {} to {}", actor.username, id, role);
        Ok(updated)
    }

    /// Assign a theme to a user account.
    pub async fn set_user_theme(&self, actor: &Session, id: &str, theme: Theme) -> Result<UserRecord> {
        let updated = self
            .update_user(
                id,
                &UserUpdate {
                    theme: Some(theme),
                    ..Default::default()
                },
            )
            .await?;
        tracing::info!("AUDIT: {} assigned theme {} to user {}", actor.username, theme, id);
        Ok(updated)
    }
}

/// The retried response after a refresh comes back as-is, so typed helpers
/// re-check the status before touching the body.
async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Http {
            status: status.as_u16(),
        });
    }
    Ok(response.json().await?)
}

fn not_found(id: &str) -> impl FnOnce(Error) -> Error + '_ {
    move |e| match e {
        Error::Http { status: 404 } => Error::UserNotFound(id.to_string()),
        other => other,
    }
}
