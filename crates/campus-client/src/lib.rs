//! # Campus Client
//!
//! Headless state layer for the Campus school-management API: who is signed
//! in, which school and academic session requests are scoped to, whether the
//! tenant's subscription allows access, and what the menu and page shell
//! should show as a result.
//!
//! Any front end (web, desktop, TUI, the `campus` CLI) drives the same
//! stores through [`Campus`], the composition root:
//!
//! - [`auth::AuthStore`]: token and user, persisted, role-keyed redirects
//! - [`tenant::TenantStore`]: the school in scope and its record
//! - [`session::SessionStore`]: academic sessions, class existence, and the
//!   `X-Academic-Session-Id` header
//! - [`subscription::SubscriptionStore`]: status and warning levels
//! - [`navigation`], [`layout`], [`dashboard`]: pure decisions over the above
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//! use campus_client::{Campus, ClientOptions};
//! use campus_client::storage::MemoryStorage;
//!
//! # async fn example() -> Result<(), campus_client::ClientError> {
//! let campus = Campus::new(ClientOptions::from_env(), Arc::new(MemoryStorage::new()));
//!
//! let landing = campus.sign_in("admin@hillside.edu", "secret").await?;
//! println!("go to {}", landing);
//!
//! for (item, state) in campus.menu().await {
//!     println!("{:<20} {:?}", item.label, state);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod boundary;
pub mod dashboard;
pub mod decorator;
pub mod env;
mod error;
pub mod layout;
pub mod navigation;
pub mod notify;
pub mod role;
pub mod routes;
pub mod session;
pub mod storage;
pub mod subscription;
pub mod tenant;
pub mod transport;
mod types;

pub use error::*;
pub use types::*;

pub use api::ApiClient;
pub use auth::{AuthState, AuthStore};
pub use boundary::{RecoveryAction, RecoveryScreen};
pub use dashboard::{DashboardStats, DashboardView};
pub use layout::{Content, Shell, ShellInputs};
pub use navigation::{MenuItem, NavContext, NavOutcome, NavState};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use role::Role;
pub use session::{SessionSnapshot, SessionStore};
pub use storage::{ClientStorage, FileStorage, MemoryStorage, StorageError};
pub use subscription::{SubscriptionInfo, SubscriptionStatus, SubscriptionStore};
pub use tenant::{TenantSelection, TenantStore};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ─── Client Options ────────────────────────────────────────────────

/// Configuration for [`Campus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Base URL of the Campus backend (e.g. `https://api.campus.example`).
    pub base_url: String,

    /// HTTP request timeout in seconds. `None` keeps the HTTP client default.
    pub timeout_secs: Option<u64>,

    /// Subscription polling.
    pub subscription: SubscriptionOptions,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: None,
            subscription: SubscriptionOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionOptions {
    /// Re-fetch subscription status every N seconds while a tenant is in
    /// scope. `None` disables polling.
    pub poll_interval_secs: Option<u64>,
}

// ─── Composition root ──────────────────────────────────────────────

/// Owns every store and ties their lifecycles to the signed-in identity.
///
/// Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct Campus {
    options: ClientOptions,
    api: ApiClient,
    storage: Arc<dyn ClientStorage>,
    notifier: Notifier,
    auth: AuthStore,
    tenant: TenantStore,
    sessions: SessionStore,
    subscription: SubscriptionStore,
    /// Bumped by every tenant-context load and teardown.
    context: Arc<AtomicU64>,
}

impl Campus {
    /// Build a client that talks HTTP to `options.base_url`.
    pub fn new(options: ClientOptions, storage: Arc<dyn ClientStorage>) -> Self {
        let transport = Arc::new(HttpTransport::new(options.timeout_secs));
        Self::with_transport(options, transport, storage)
    }

    /// Build a client over any [`Transport`].
    pub fn with_transport(
        options: ClientOptions,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn ClientStorage>,
    ) -> Self {
        let api = ApiClient::new(&options.base_url, transport);
        let notifier = Notifier::new();

        Self {
            auth: AuthStore::new(api.clone(), storage.clone()),
            tenant: TenantStore::new(api.clone(), storage.clone(), notifier.clone()),
            sessions: SessionStore::new(api.clone(), storage.clone(), notifier.clone()),
            subscription: SubscriptionStore::new(api.clone(), notifier.clone()),
            context: Arc::new(AtomicU64::new(0)),
            options,
            api,
            storage,
            notifier,
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn storage(&self) -> &Arc<dyn ClientStorage> {
        &self.storage
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn tenant(&self) -> &TenantStore {
        &self.tenant
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn subscription(&self) -> &SubscriptionStore {
        &self.subscription
    }

    // ─── Identity flows ─────────────────────────────────────────────

    /// Restore persisted state. Returns whether a signed-in user came back;
    /// if so, the tenant context is loaded too.
    pub async fn bootstrap(&self) -> bool {
        if !self.auth.rehydrate().await {
            return false;
        }
        self.tenant.restore_selection().await;
        self.load_tenant_context().await;
        true
    }

    /// Adopt credentials from a login response and load the tenant context.
    ///
    /// Returns the landing route: the role's home, except that a school
    /// admin whose school has no academic session goes to session setup.
    pub async fn login(&self, token: &str, user: User) -> Result<&'static str, ClientError> {
        let redirect = self.auth.login(token, user.clone()).await?;
        Ok(self.after_login(&user, redirect).await)
    }

    /// Exchange email and password for credentials, then as [`login`](Self::login).
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<&'static str, ClientError> {
        let redirect = self.auth.sign_in(email, password).await?;
        match self.auth.user().await {
            Some(user) => Ok(self.after_login(&user, redirect).await),
            None => Ok(redirect),
        }
    }

    async fn after_login(&self, user: &User, redirect: &'static str) -> &'static str {
        self.tenant.restore_selection().await;
        self.load_tenant_context().await;

        if user.role() == Some(Role::SchoolAdmin) && !self.sessions.has_session().await {
            tracing::info!(user_id = %user.user_id, "no academic session yet; sending to setup");
            return routes::SESSION_SETUP;
        }
        redirect
    }

    /// Sign out: tear every store down and clear persisted state.
    pub async fn logout(&self) -> &'static str {
        self.teardown().await;
        self.tenant.clear_selection().await;
        self.auth.logout().await
    }

    /// Point a platform user at a school and reload the tenant context.
    pub async fn select_school(
        &self,
        school_id: &str,
        school_name: Option<&str>,
    ) -> Result<&'static str, ClientError> {
        let user = self.auth.user().await.ok_or_else(|| ClientError::Unauthorized {
            code: "NOT_SIGNED_IN".to_string(),
            message: "Sign in first".to_string(),
        })?;
        if !user.is_platform_user() {
            return Err(ClientError::Forbidden {
                code: "NOT_PLATFORM_USER".to_string(),
                message: "Only platform users can switch schools".to_string(),
            });
        }

        let previous = self.tenant.selection().await;
        self.tenant.select_school(school_id, school_name).await?;
        if previous.is_some_and(|p| p.school_id != school_id) {
            // A session id from another school means nothing here.
            self.storage.delete(storage::keys::ACADEMIC_SESSION_ID).await?;
        }
        self.load_tenant_context().await;
        Ok(routes::DASHBOARD)
    }

    /// (Re)load tenant, sessions and subscription for the signed-in user.
    /// Without a user everything is torn down.
    ///
    /// A load overtaken by a newer load or a teardown stops as a whole: its
    /// session and subscription refreshes never start.
    pub async fn load_tenant_context(&self) {
        let generation = self.context.fetch_add(1, Ordering::SeqCst) + 1;
        let Some(user) = self.auth.user().await else {
            self.teardown().await;
            return;
        };
        let tenant = self.tenant.tenant_id_for(&user).await;

        let entered = self.tenant.enter(tenant.as_deref()).await;
        if entered == RefreshOutcome::Stale || !self.is_current_context(generation) {
            tracing::debug!(tenant = ?tenant, "tenant load superseded");
            return;
        }
        tokio::join!(
            self.sessions.refresh_sessions(tenant.as_deref()),
            self.subscription.refresh(tenant.as_deref()),
        );
        if !self.is_current_context(generation) {
            return;
        }

        match (tenant, self.options.subscription.poll_interval_secs) {
            (Some(tenant), Some(secs)) => {
                self.subscription.start_polling(tenant, Duration::from_secs(secs))
            }
            _ => self.subscription.stop_polling(),
        }
    }

    /// Drop tenant-scoped state, headers and background work.
    pub async fn teardown(&self) {
        self.context.fetch_add(1, Ordering::SeqCst);
        tokio::join!(
            self.tenant.teardown(),
            self.sessions.teardown(),
            self.subscription.teardown(),
        );
    }

    fn is_current_context(&self, generation: u64) -> bool {
        self.context.load(Ordering::SeqCst) == generation
    }

    // ─── Sessions ───────────────────────────────────────────────────

    pub async fn create_session(&self, request: &CreateSessionRequest) -> Result<&'static str, ClientError> {
        self.sessions.create_session(request).await
    }

    // ─── Views ──────────────────────────────────────────────────────

    /// Redirect for an unauthenticated navigation attempt.
    pub async fn guard(&self, path: &str) -> Option<&'static str> {
        self.auth.guard(path).await
    }

    pub async fn nav_context(&self) -> NavContext {
        let user = self.auth.user().await;
        let snapshot = self.sessions.snapshot().await;
        NavContext {
            has_session: snapshot.has_session(),
            has_classes: snapshot.has_classes,
            role: user.as_ref().and_then(User::role),
            platform_user: user.as_ref().is_some_and(User::is_platform_user),
            school_selected: self.tenant.tenant_id().await.is_some(),
        }
    }

    pub async fn menu(&self) -> Vec<(&'static MenuItem, NavState)> {
        navigation::menu_for(&self.nav_context().await)
    }

    /// Click the menu item with `key`. `None` for an unknown key.
    pub async fn click(&self, key: &str) -> Option<NavOutcome> {
        let item = navigation::find(key)?;
        let ctx = self.nav_context().await;
        Some(navigation::click(item, &ctx, &self.notifier))
    }

    pub async fn shell_inputs(&self) -> ShellInputs {
        let user = self.auth.user().await;
        let (tenant_loading, sessions_loading, subscription_loading) = tokio::join!(
            self.tenant.is_loading(),
            self.sessions.is_loading(),
            self.subscription.is_loading(),
        );
        ShellInputs {
            authenticated: self.auth.is_authenticated().await,
            loading: tenant_loading || sessions_loading || subscription_loading,
            suspended: self.subscription.is_suspended().await,
            school_active: self.tenant.school_active().await,
            platform_user: user.as_ref().is_some_and(User::is_platform_user),
            role: user.as_ref().and_then(User::role),
        }
    }

    /// Shell to render around `path`.
    pub async fn shell(&self, path: &str) -> Shell {
        layout::decide(path, &self.shell_inputs().await)
    }

    /// [`Campus::shell`] behind the error boundary.
    pub async fn shell_view(&self, path: &str) -> Result<Shell, RecoveryScreen> {
        let inputs = self.shell_inputs().await;
        boundary::guard(|| layout::decide(path, &inputs))
    }

    pub async fn dashboard(&self) -> Option<DashboardView> {
        self.auth
            .user()
            .await
            .map(|user| DashboardView::for_role(&user.role))
    }

    pub async fn load_dashboard_stats(&self) -> DashboardStats {
        dashboard::load_stats(&self.api).await
    }
}

impl std::fmt::Debug for Campus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Campus")
            .field("options", &self.options)
            .field("api", &self.api)
            .finish()
    }
}
