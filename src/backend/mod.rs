use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::error::{FitFamError, Result};

pub mod auth;
mod query;

pub use auth::{AuthSession, Session};
pub use query::{contains_pattern, Query};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Client for the hosted backend: PostgREST tables and procedures under
/// `/rest/v1`, session endpoints under `/auth/v1`.
pub struct RestClient {
    client: Client,
    base_url: String,
    anon_key: String,
    session: RwLock<Session>,
}

/// Error body returned by PostgREST and the auth service
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "msg", alias = "error_description")]
    message: Option<String>,
}

impl RestClient {
    /// Create a client from configuration, picking up any stored session tokens
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.backend.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FitFamError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.backend.url.trim_end_matches('/').to_string(),
            anon_key: config.backend.anon_key.clone(),
            session: RwLock::new(Session {
                access_token: config.auth.access_token.clone(),
                refresh_token: config.auth.refresh_token.clone(),
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current session tokens, for persisting after a command
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn set_session(&self, access_token: String, refresh_token: String) {
        let mut session = self.session.write().await;
        session.access_token = access_token;
        session.refresh_token = refresh_token;
    }

    pub async fn clear_session(&self) {
        *self.session.write().await = Session::default();
    }

    pub async fn has_session(&self) -> bool {
        !self.session.read().await.access_token.is_empty()
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Attach the project key and bearer token. Without a session the
    /// anon key doubles as the bearer token.
    fn authorize(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        let bearer = if token.is_empty() { &self.anon_key } else { token };
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", bearer))
    }

    /// Send a request built by `build`; on 401 refresh the session once and retry
    async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let token = self.session.read().await.access_token.clone();
        let response = self.authorize(build(), &token).send().await?;

        if response.status() != StatusCode::UNAUTHORIZED || token.is_empty() {
            return Ok(response);
        }

        tracing::debug!("Received 401, attempting session refresh");
        let refreshed = match self.refresh_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::debug!("Session refresh failed: {}", e);
                return Ok(response);
            }
        };

        let response = self
            .authorize(build(), &refreshed.access_token)
            .send()
            .await?;
        Ok(response)
    }

    /// Turn a non-success response into an error carrying the backend's message
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or(text);
        Err(FitFamError::from_status(status, message))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Rows matching `query`
    pub async fn select<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>> {
        let url = self.rest_url(query.table());
        tracing::debug!("GET {} {:?}", url, query.params());

        let response = self
            .send(|| self.client.get(&url).query(query.params()))
            .await?;
        Self::decode(Self::check(response).await?).await
    }

    /// Exactly one row; no match is `NotFound`
    pub async fn select_single<T: DeserializeOwned>(&self, query: &Query) -> Result<T> {
        let url = self.rest_url(query.table());
        tracing::debug!("GET {} (single) {:?}", url, query.params());

        let response = self
            .send(|| {
                self.client
                    .get(&url)
                    .query(query.params())
                    .header("Accept", SINGLE_OBJECT)
            })
            .await?;
        Self::decode(Self::check(response).await?).await
    }

    /// Insert one row and return it as stored
    pub async fn insert<B, T>(&self, table: &str, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.rest_url(table);
        tracing::debug!("POST {}", url);

        let response = self
            .send(|| {
                self.client
                    .post(&url)
                    .header("Prefer", "return=representation")
                    .header("Accept", SINGLE_OBJECT)
                    .json(body)
            })
            .await?;
        Self::decode(Self::check(response).await?).await
    }

    /// Patch every row matching `query`
    pub async fn update<B: Serialize>(&self, query: &Query, body: &B) -> Result<()> {
        let url = self.rest_url(query.table());
        tracing::debug!("PATCH {} {:?}", url, query.params());

        let response = self
            .send(|| {
                self.client
                    .patch(&url)
                    .query(query.params())
                    .header("Prefer", "return=minimal")
                    .json(body)
            })
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Delete every row matching `query`
    pub async fn delete(&self, query: &Query) -> Result<()> {
        let url = self.rest_url(query.table());
        tracing::debug!("DELETE {} {:?}", url, query.params());

        let response = self
            .send(|| self.client.delete(&url).query(query.params()))
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Call a stored procedure
    pub async fn rpc<A, T>(&self, function: &str, args: &A) -> Result<T>
    where
        A: Serialize,
        T: DeserializeOwned,
    {
        let url = self.rest_url(&format!("rpc/{}", function));
        tracing::debug!("POST {}", url);

        let response = self.send(|| self.client.post(&url).json(args)).await?;
        Self::decode(Self::check(response).await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let mut config = Config::default();
        config.backend.url = "https://project.example.co/".to_string();
        let client = RestClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://project.example.co");
        assert_eq!(
            client.rest_url("rpc/get_partner_stats"),
            "https://project.example.co/rest/v1/rpc/get_partner_stats"
        );
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let client = RestClient::new(&Config::default()).unwrap();
        assert!(!client.has_session().await);

        client.set_session("a".to_string(), "r".to_string()).await;
        assert!(client.has_session().await);
        assert_eq!(client.session().await.refresh_token, "r");

        client.clear_session().await;
        assert!(!client.has_session().await);
    }
}
