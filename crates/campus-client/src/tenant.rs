//! Tenant context: which school requests are scoped to.
//!
//! School-bound users are always scoped to their own school. Platform users
//! browse one school at a time; that choice is persisted so it survives a
//! restart.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::ApiClient;
use crate::decorator::TenantHeader;
use crate::error::ClientError;
use crate::notify::Notifier;
use crate::routes;
use crate::storage::{keys, ClientStorage};
use crate::types::{RefreshOutcome, School, User};

/// A platform user's currently browsed school.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantSelection {
    pub school_id: String,
    pub school_name: Option<String>,
}

/// Tenant for `user`: the selected school for platform users, the user's own
/// school for everyone else.
pub fn tenant_for(user: &User, selection: Option<&TenantSelection>) -> Option<String> {
    if user.is_platform_user() {
        selection.map(|s| s.school_id.clone())
    } else {
        user.school_id.clone()
    }
}

#[derive(Debug, Clone, Default)]
struct TenantState {
    selection: Option<TenantSelection>,
    tenant_id: Option<String>,
    school: Option<School>,
    loading: bool,
}

#[derive(Clone)]
pub struct TenantStore {
    api: ApiClient,
    storage: Arc<dyn ClientStorage>,
    notifier: Notifier,
    state: Arc<RwLock<TenantState>>,
    generation: Arc<AtomicU64>,
}

impl TenantStore {
    pub fn new(api: ApiClient, storage: Arc<dyn ClientStorage>, notifier: Notifier) -> Self {
        Self {
            api,
            storage,
            notifier,
            state: Arc::new(RwLock::new(TenantState::default())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Load the persisted school selection, if any.
    pub async fn restore_selection(&self) -> Option<TenantSelection> {
        let id = match self.storage.get(keys::SELECTED_SCHOOL_ID).await {
            Ok(Some(id)) if !id.trim().is_empty() => id,
            Ok(_) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "could not read selected school");
                return None;
            }
        };
        let name = self.storage.get(keys::SELECTED_SCHOOL_NAME).await.ok().flatten();
        let selection = TenantSelection {
            school_id: id,
            school_name: name,
        };
        self.state.write().await.selection = Some(selection.clone());
        Some(selection)
    }

    /// Persist and remember a platform user's school choice.
    pub async fn select_school(&self, school_id: &str, school_name: Option<&str>) -> Result<(), ClientError> {
        self.storage.set(keys::SELECTED_SCHOOL_ID, school_id).await?;
        match school_name {
            Some(name) => self.storage.set(keys::SELECTED_SCHOOL_NAME, name).await?,
            None => self.storage.delete(keys::SELECTED_SCHOOL_NAME).await?,
        }
        tracing::info!(school_id, "selected school");
        self.state.write().await.selection = Some(TenantSelection {
            school_id: school_id.to_string(),
            school_name: school_name.map(str::to_string),
        });
        Ok(())
    }

    /// Forget the selection; returns the school picker route.
    pub async fn clear_selection(&self) -> &'static str {
        for key in [keys::SELECTED_SCHOOL_ID, keys::SELECTED_SCHOOL_NAME] {
            if let Err(e) = self.storage.delete(key).await {
                tracing::warn!(error = %e, key, "could not clear selected school");
            }
        }
        self.state.write().await.selection = None;
        routes::SCHOOL_PICKER
    }

    pub async fn selection(&self) -> Option<TenantSelection> {
        self.state.read().await.selection.clone()
    }

    /// Resolve the tenant for `user` against the current selection.
    pub async fn tenant_id_for(&self, user: &User) -> Option<String> {
        let state = self.state.read().await;
        tenant_for(user, state.selection.as_ref())
    }

    /// Scope requests to `tenant` and load its school record.
    ///
    /// With no tenant the header is removed and state is cleared. A school
    /// fetch that fails leaves the school unknown, which does not block.
    pub async fn enter(&self, tenant: Option<&str>) -> RefreshOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(tenant) = tenant else {
            let mut state = self.state.write().await;
            self.api.remove(TenantHeader::ID).await;
            state.tenant_id = None;
            state.school = None;
            state.loading = false;
            return RefreshOutcome::Cleared;
        };

        {
            let mut state = self.state.write().await;
            if state.tenant_id.as_deref() != Some(tenant) {
                state.school = None;
            }
            state.tenant_id = Some(tenant.to_string());
            state.loading = true;
            self.api.install(Arc::new(TenantHeader::new(tenant))).await;
        }
        tracing::info!(tenant, "entering tenant");

        let fetched = self.api.get::<School>(&routes::api::school(tenant)).await;

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::warn!(tenant, "discarding stale school response");
            return RefreshOutcome::Stale;
        }
        match fetched {
            Ok(school) => {
                if !school.active {
                    tracing::info!(tenant, "school is inactive");
                }
                state.school = Some(school);
            }
            Err(e) => {
                self.notifier.error(format!("Failed to load school: {}", e.message()));
                state.school = None;
            }
        }
        state.loading = false;
        RefreshOutcome::Resolved
    }

    pub async fn tenant_id(&self) -> Option<String> {
        self.state.read().await.tenant_id.clone()
    }

    pub async fn school(&self) -> Option<School> {
        self.state.read().await.school.clone()
    }

    /// `false` only when the school is known and marked inactive.
    pub async fn school_active(&self) -> bool {
        self.state.read().await.school.as_ref().map_or(true, |s| s.active)
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Drop tenant scope and in-flight fetches; the persisted selection stays.
    pub async fn teardown(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;
        self.api.remove(TenantHeader::ID).await;
        state.tenant_id = None;
        state.school = None;
        state.loading = false;
    }
}

impl std::fmt::Debug for TenantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantStore")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}
