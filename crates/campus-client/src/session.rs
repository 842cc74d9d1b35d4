//! Academic-session context for the current tenant.
//!
//! Resolves which session the user is browsing, whether the tenant has any
//! classes, and keeps the `X-Academic-Session-Id` decorator in step with the
//! selection. Every refresh takes a generation number; a response that comes
//! back after a newer refresh (or a teardown) started is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::ApiClient;
use crate::decorator::SessionHeader;
use crate::error::ClientError;
use crate::notify::Notifier;
use crate::routes;
use crate::storage::{keys, ClientStorage};
use crate::types::{
    AcademicSession, ActiveSessionDescriptor, CountResponse, CreateSessionRequest, ListEnvelope,
    RefreshOutcome,
};

/// Point-in-time view of the session store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub sessions: Vec<AcademicSession>,
    /// The session being browsed; not necessarily the globally active one.
    pub current: Option<AcademicSession>,
    pub has_classes: bool,
    pub loading: bool,
    pub tenant_id: Option<String>,
}

impl SessionSnapshot {
    pub fn has_session(&self) -> bool {
        self.current.is_some()
    }

    /// The school-wide active session, if the list has one.
    pub fn active_session(&self) -> Option<&AcademicSession> {
        self.sessions.iter().find(|s| s.active)
    }
}

/// Pick the session to browse.
///
/// The backend's active session wins; when the list does not contain it a
/// minimal record is synthesized. Without an active session, the previously
/// selected id is reused if it is still listed.
pub fn resolve_current(
    sessions: &[AcademicSession],
    active: Option<&ActiveSessionDescriptor>,
    stored_id: Option<&str>,
    tenant_id: &str,
) -> Option<AcademicSession> {
    if let Some(active) = active {
        let listed = sessions.iter().find(|s| s.id == active.id).cloned();
        return Some(listed.unwrap_or_else(|| AcademicSession::synthesized(active, tenant_id)));
    }
    let stored = stored_id?;
    sessions.iter().find(|s| s.id == stored).cloned()
}

#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
    storage: Arc<dyn ClientStorage>,
    notifier: Notifier,
    state: Arc<RwLock<SessionSnapshot>>,
    generation: Arc<AtomicU64>,
}

impl SessionStore {
    pub fn new(api: ApiClient, storage: Arc<dyn ClientStorage>, notifier: Notifier) -> Self {
        Self {
            api,
            storage,
            notifier,
            state: Arc::new(RwLock::new(SessionSnapshot::default())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.clone()
    }

    pub async fn has_session(&self) -> bool {
        self.state.read().await.has_session()
    }

    pub async fn has_classes(&self) -> bool {
        self.state.read().await.has_classes
    }

    pub async fn current(&self) -> Option<AcademicSession> {
        self.state.read().await.current.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Re-resolve sessions for `tenant`. No tenant clears everything.
    pub async fn refresh_sessions(&self, tenant: Option<&str>) -> RefreshOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(tenant) = tenant else {
            let mut state = self.state.write().await;
            self.api.remove(SessionHeader::ID).await;
            *state = SessionSnapshot::default();
            return RefreshOutcome::Cleared;
        };

        {
            let mut state = self.state.write().await;
            if state.tenant_id.as_deref() != Some(tenant) {
                // Another school's session must not leak into this one's requests.
                self.api.remove(SessionHeader::ID).await;
                *state = SessionSnapshot::default();
                state.tenant_id = Some(tenant.to_string());
            }
            state.loading = true;
        }

        let stored = match self.storage.get(keys::ACADEMIC_SESSION_ID).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "could not read selected session");
                None
            }
        };

        let (list, active) = tokio::join!(
            self.api.get::<ListEnvelope<AcademicSession>>(routes::api::SESSIONS),
            self.api.get::<Option<ActiveSessionDescriptor>>(routes::api::ACTIVE_SESSION),
        );

        let sessions = match list {
            Ok(envelope) => envelope.into_vec(),
            Err(e) => {
                self.notifier
                    .error(format!("Failed to load academic sessions: {}", e.message()));
                Vec::new()
            }
        };
        let active = match active {
            Ok(active) => active,
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                tracing::warn!(error = %e, tenant, "active session lookup failed");
                None
            }
        };
        let current = resolve_current(&sessions, active.as_ref(), stored.as_deref(), tenant);

        {
            let mut state = self.state.write().await;
            if self.generation.load(Ordering::SeqCst) != generation {
                tracing::warn!(tenant, "discarding stale session response");
                return RefreshOutcome::Stale;
            }
            match &current {
                Some(session) => {
                    self.api.install(Arc::new(SessionHeader::new(&session.id))).await;
                }
                None => {
                    self.api.remove(SessionHeader::ID).await;
                }
            }
            tracing::debug!(
                tenant,
                sessions = sessions.len(),
                current = current.as_ref().map(|s| s.id.as_str()),
                "resolved academic session"
            );
            state.sessions = sessions;
            state.current = current;
        }

        self.load_classes(generation).await;
        RefreshOutcome::Resolved
    }

    /// Re-fetch whether the current tenant has any classes.
    pub async fn reload_classes(&self) {
        let generation = self.generation.load(Ordering::SeqCst);
        self.load_classes(generation).await;
    }

    async fn load_classes(&self, generation: u64) {
        let has_session = self.state.read().await.has_session();

        let has_classes = if has_session {
            match self.api.get::<CountResponse>(routes::api::CLASSES_COUNT).await {
                Ok(count) => count.value() > 0,
                Err(e) => {
                    self.notifier.error(format!("Failed to load classes: {}", e.message()));
                    false
                }
            }
        } else {
            false
        };

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::warn!("discarding stale class count");
            return;
        }
        state.has_classes = has_classes;
        state.loading = false;
    }

    /// Browse another listed session without activating it. A refresh
    /// already in flight is dropped.
    pub async fn select_session(&self, session_id: &str) -> Result<(), ClientError> {
        let session = self
            .state
            .read()
            .await
            .sessions
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                message: format!("Academic session {} not found", session_id),
            })?;

        self.storage.set(keys::ACADEMIC_SESSION_ID, &session.id).await?;
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.set_current(session).await;
        self.reload_classes().await;
        Ok(())
    }

    /// Stop browsing any session. The next request carries no session
    /// header, and a refresh already in flight is dropped.
    pub async fn clear_session(&self) {
        if let Err(e) = self.storage.delete(keys::ACADEMIC_SESSION_ID).await {
            tracing::warn!(error = %e, "could not clear selected session");
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;
        self.api.remove(SessionHeader::ID).await;
        state.current = None;
        state.has_classes = false;
        state.loading = false;
    }

    /// Create a session for the current tenant and land on the dashboard.
    ///
    /// If the refresh afterwards still resolves nothing, the created session
    /// becomes current.
    pub async fn create_session(&self, request: &CreateSessionRequest) -> Result<&'static str, ClientError> {
        let tenant = self.state.read().await.tenant_id.clone().ok_or(ClientError::NoTenant)?;

        let created: AcademicSession = self.api.post(routes::api::SESSIONS, request).await?;
        tracing::info!(tenant = %tenant, session = %created.id, "created academic session");
        self.notifier
            .success(format!("Academic session \"{}\" created", created.name));

        self.refresh_sessions(Some(&tenant)).await;
        if !self.has_session().await {
            self.storage.set(keys::ACADEMIC_SESSION_ID, &created.id).await?;
            self.set_current(created).await;
            self.reload_classes().await;
        }
        Ok(routes::DASHBOARD)
    }

    /// Mark a session as the school-wide active one, then refresh.
    pub async fn activate_session(&self, session_id: &str) -> Result<(), ClientError> {
        let tenant = self.state.read().await.tenant_id.clone().ok_or(ClientError::NoTenant)?;

        self.api
            .put_empty::<Option<serde_json::Value>>(&routes::api::activate_session(session_id))
            .await?;
        tracing::info!(tenant = %tenant, session = session_id, "activated academic session");

        self.refresh_sessions(Some(&tenant)).await;
        Ok(())
    }

    /// Drop all state, the session header, and any in-flight refresh.
    pub async fn teardown(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;
        self.api.remove(SessionHeader::ID).await;
        *state = SessionSnapshot::default();
    }

    async fn set_current(&self, session: AcademicSession) {
        let mut state = self.state.write().await;
        self.api.install(Arc::new(SessionHeader::new(&session.id))).await;
        if !state.sessions.iter().any(|s| s.id == session.id) {
            state.sessions.push(session.clone());
        }
        state.current = Some(session);
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}
