use std::sync::Arc;
use tokio::sync::RwLock;

use crate::backend::{Query, RestClient};
use crate::error::Result;
use crate::models::User;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_initialized: bool,
}

/// Who is signed in. Authentication itself is done by the backend's auth
/// service; this only mirrors the outcome.
pub struct AuthStore {
    client: Arc<RestClient>,
    state: RwLock<AuthState>,
}

impl AuthStore {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self {
            client,
            state: RwLock::new(AuthState::default()),
        }
    }

    pub fn client(&self) -> &Arc<RestClient> {
        &self.client
    }

    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated
    }

    pub async fn login(&self, user: User) {
        let mut state = self.state.write().await;
        tracing::info!("Logged in as {}", user.username);
        state.user = Some(user);
        state.is_authenticated = true;
    }

    pub async fn update_user(&self, user: User) {
        self.state.write().await.user = Some(user);
    }

    /// Sign out remotely, then reset to signed-out. The local state is reset
    /// even when the remote sign-out fails; that error is still returned.
    pub async fn logout(&self) -> Result<()> {
        let result = self.client.sign_out().await;
        if let Err(e) = &result {
            tracing::warn!("Remote sign-out failed: {}", e);
        }

        *self.state.write().await = AuthState {
            user: None,
            is_authenticated: false,
            is_initialized: true,
        };
        result
    }

    /// Restore the signed-in user from a stored session, if there is one
    pub async fn init_auth(&self) -> Result<()> {
        match self.load_current_user().await {
            Ok(Some(user)) => {
                *self.state.write().await = AuthState {
                    user: Some(user),
                    is_authenticated: true,
                    is_initialized: true,
                };
                Ok(())
            }
            Ok(None) => {
                self.reset().await;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Auth initialization error: {}", e);
                self.reset().await;
                Err(e)
            }
        }
    }

    async fn reset(&self) {
        *self.state.write().await = AuthState {
            user: None,
            is_authenticated: false,
            is_initialized: true,
        };
    }

    async fn load_current_user(&self) -> Result<Option<User>> {
        let Some(session_user) = self.client.get_user().await? else {
            return Ok(None);
        };

        let mut user: User = self
            .client
            .select_single(
                &Query::new("users")
                    .select("id, name, username, email")
                    .eq("id", session_user.id),
            )
            .await?;
        if user.email.is_none() {
            user.email = session_user.email;
        }
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use uuid::Uuid;

    fn store() -> AuthStore {
        AuthStore::new(Arc::new(RestClient::new(&Config::default()).unwrap()))
    }

    #[tokio::test]
    async fn test_login_and_update_user() {
        let store = store();
        let user = User {
            id: Uuid::new_v4(),
            name: "Dana".to_string(),
            username: "dana".to_string(),
            email: None,
        };

        store.login(user.clone()).await;
        assert!(store.is_authenticated().await);

        let renamed = User {
            name: "Dana K".to_string(),
            ..user
        };
        store.update_user(renamed.clone()).await;
        assert_eq!(store.user().await, Some(renamed));
    }

    #[tokio::test]
    async fn test_init_without_session_marks_initialized() {
        let store = store();
        store.init_auth().await.unwrap();

        let state = store.state().await;
        assert!(state.is_initialized);
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
    }

    #[tokio::test]
    async fn test_logout_without_session_resets_state() {
        let store = store();
        store
            .login(User {
                id: Uuid::new_v4(),
                name: "Eli".to_string(),
                username: "eli".to_string(),
                email: None,
            })
            .await;

        store.logout().await.unwrap();
        let state = store.state().await;
        assert!(!state.is_authenticated);
        assert!(state.is_initialized);
    }
}
