use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::RestClient;
use crate::error::{FitFamError, Result};
use crate::models::SessionUser;

/// Access and refresh tokens of the signed-in user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

/// Token response of the auth service
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: SessionUser,
}

impl RestClient {
    /// Sign in with email and password; the session is kept on the client
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let url = format!("{}?grant_type=password", self.auth_url("token"));
        tracing::debug!("Signing in as {}", email);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await?;

        let session: AuthSession = Self::decode(Self::check(response).await?).await?;
        self.set_session(session.access_token.clone(), session.refresh_token.clone())
            .await;

        tracing::info!("Signed in as {}", session.user.id);
        Ok(session)
    }

    /// Exchange the stored refresh token for a new session
    pub async fn refresh_session(&self) -> Result<Session> {
        let refresh_token = self.session.read().await.refresh_token.clone();
        if refresh_token.is_empty() {
            return Err(FitFamError::NotAuthenticated);
        }

        let url = format!("{}?grant_type=refresh_token", self.auth_url("token"));
        tracing::debug!("Refreshing session");

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&RefreshGrant {
                refresh_token: &refresh_token,
            })
            .send()
            .await?;

        let refreshed: AuthSession = Self::decode(Self::check(response).await?).await?;
        self.set_session(refreshed.access_token.clone(), refreshed.refresh_token.clone())
            .await;

        tracing::info!("Session refreshed");
        Ok(self.session().await)
    }

    /// Revoke the session remotely and forget it locally. The local session
    /// is cleared even when the remote call fails.
    pub async fn sign_out(&self) -> Result<()> {
        let token = self.session.read().await.access_token.clone();
        if token.is_empty() {
            return Ok(());
        }

        let url = self.auth_url("logout");
        let result = self
            .authorize(self.client.post(&url), &token)
            .send()
            .await
            .map_err(FitFamError::from);

        self.clear_session().await;

        let response = result?;
        // An already expired token has nothing left to revoke
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        Self::check(response).await?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// User behind the current session, or `None` when there is no valid session
    pub async fn get_user(&self) -> Result<Option<SessionUser>> {
        if !self.has_session().await {
            return Ok(None);
        }

        let url = self.auth_url("user");
        let response = self.send(|| self.client.get(&url)).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!("Session rejected by auth service");
            return Ok(None);
        }

        let user: SessionUser = Self::decode(Self::check(response).await?).await?;
        Ok(Some(user))
    }

    /// The signed-in user; fails with `NotAuthenticated` without a session
    pub async fn require_user(&self) -> Result<SessionUser> {
        self.get_user().await?.ok_or(FitFamError::NotAuthenticated)
    }
}
