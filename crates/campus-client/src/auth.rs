//! Auth store: token and user, persistence, role-keyed redirects, and the
//! unauthenticated-navigation guard.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use crate::api::ApiClient;
use crate::decorator::BearerAuth;
use crate::error::ClientError;
use crate::role;
use crate::routes;
use crate::storage::{self, keys, ClientStorage};
use crate::types::{LoginRequest, LoginResponse, User};

/// Current credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Redirect for a navigation attempt: unauthenticated users are sent to the
/// login page unless they are already on it.
pub fn guard_route(authenticated: bool, pathname: &str) -> Option<&'static str> {
    if authenticated || routes::is_login(pathname) {
        None
    } else {
        Some(routes::LOGIN)
    }
}

#[derive(Clone)]
pub struct AuthStore {
    api: ApiClient,
    storage: Arc<dyn ClientStorage>,
    state: Arc<RwLock<AuthState>>,
    identity: Arc<watch::Sender<Option<User>>>,
}

impl AuthStore {
    pub fn new(api: ApiClient, storage: Arc<dyn ClientStorage>) -> Self {
        let (identity, _) = watch::channel(None);
        Self {
            api,
            storage,
            state: Arc::new(RwLock::new(AuthState::default())),
            identity: Arc::new(identity),
        }
    }

    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    /// Watch identity changes (login, logout, rehydrate, fail-closed reset).
    ///
    /// For observers outside the client; [`Campus`](crate::Campus) drives
    /// its own stores directly from each identity flow.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.identity.subscribe()
    }

    /// Persist credentials, make them current, and return the role's landing route.
    pub async fn login(&self, token: &str, user: User) -> Result<&'static str, ClientError> {
        let serialized =
            serde_json::to_string(&user).map_err(|e| ClientError::Encoding(e.to_string()))?;
        self.storage.set(keys::TOKEN, token).await?;
        self.storage.set(keys::USER, &serialized).await?;

        self.activate(token, user.clone()).await;
        tracing::info!(user_id = %user.user_id, role = %user.role, "logged in");

        Ok(role::redirect_for(&user.role))
    }

    /// Exchange email and password for a token, then [`login`](Self::login).
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<&'static str, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = self.api.post(routes::api::LOGIN, &body).await?;
        self.login(&resp.token, resp.user).await
    }

    /// Clear credentials and every persisted key; returns the login route.
    pub async fn logout(&self) -> &'static str {
        if let Err(e) = storage::delete_all(self.storage.as_ref(), &keys::ALL).await {
            tracing::warn!(error = %e, "failed to clear stored credentials on logout");
        }
        self.deactivate().await;
        tracing::info!("logged out");
        routes::LOGIN
    }

    /// Restore credentials from storage.
    ///
    /// Returns `true` when a valid token/user pair was restored. Anything
    /// partial or malformed fails closed: all keys are cleared and the user
    /// has to log in again.
    pub async fn rehydrate(&self) -> bool {
        let token = self.storage.get(keys::TOKEN).await;
        let user = self.storage.get(keys::USER).await;

        match (token, user) {
            (Ok(None), Ok(None)) => false,
            (Ok(Some(token)), Ok(Some(raw))) if !token.trim().is_empty() => {
                match serde_json::from_str::<User>(&raw) {
                    Ok(user) if user.is_valid() => {
                        tracing::debug!(user_id = %user.user_id, "restored credentials");
                        self.activate(&token, user).await;
                        true
                    }
                    Ok(_) => self.fail_closed("stored user is missing required fields").await,
                    Err(e) => self.fail_closed(&format!("stored user is not valid JSON: {}", e)).await,
                }
            }
            (Err(e), _) | (_, Err(e)) => self.fail_closed(&format!("storage read failed: {}", e)).await,
            _ => self.fail_closed("stored credentials are incomplete").await,
        }
    }

    /// Navigation guard for the current auth state.
    pub async fn guard(&self, pathname: &str) -> Option<&'static str> {
        guard_route(self.is_authenticated().await, pathname)
    }

    async fn activate(&self, token: &str, user: User) {
        self.api.install(Arc::new(BearerAuth::new(token))).await;
        {
            let mut state = self.state.write().await;
            state.token = Some(token.to_string());
            state.user = Some(user.clone());
        }
        self.identity.send_replace(Some(user));
    }

    async fn deactivate(&self) {
        self.api.remove(BearerAuth::ID).await;
        *self.state.write().await = AuthState::default();
        self.identity.send_replace(None);
    }

    async fn fail_closed(&self, reason: &str) -> bool {
        tracing::warn!(reason, "discarding stored credentials");
        if let Err(e) = storage::delete_all(self.storage.as_ref(), &[keys::TOKEN, keys::USER]).await {
            tracing::warn!(error = %e, "failed to clear stored credentials");
        }
        self.deactivate().await;
        false
    }
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore").field("storage", &self.storage).finish()
    }
}
