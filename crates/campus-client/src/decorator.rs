//! Outgoing-request decorators.
//!
//! Every request passes through a [`DecoratorChain`] before it reaches the
//! transport. Each decorator owns one concern (bearer token, tenant header,
//! academic-session header) and is keyed by its id: installing a decorator
//! replaces whatever held that id, removing it takes the header off every
//! later request. Decorators are immutable values; switching sessions means
//! building a new [`SessionHeader`], never editing the installed one.

use std::fmt;
use std::sync::Arc;

use crate::transport::ApiRequest;

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const SCHOOL_HEADER: &str = "X-School-Id";
pub const SESSION_HEADER: &str = "X-Academic-Session-Id";

/// A step that stamps something on every outgoing request.
pub trait RequestDecorator: Send + Sync + fmt::Debug {
    /// Slot id. At most one decorator per id is installed.
    fn id(&self) -> &str;

    fn decorate(&self, request: &mut ApiRequest);
}

/// `Authorization: Bearer <token>`.
#[derive(Clone)]
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub const ID: &'static str = "bearer-auth";

    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth").field("token", &"<redacted>").finish()
    }
}

impl RequestDecorator for BearerAuth {
    fn id(&self) -> &str {
        Self::ID
    }

    fn decorate(&self, request: &mut ApiRequest) {
        request.set_header(AUTHORIZATION_HEADER, format!("Bearer {}", self.token));
    }
}

/// `X-School-Id: <school>` for tenant-scoped calls.
#[derive(Debug, Clone)]
pub struct TenantHeader {
    school_id: String,
}

impl TenantHeader {
    pub const ID: &'static str = "tenant";

    pub fn new(school_id: impl Into<String>) -> Self {
        Self {
            school_id: school_id.into(),
        }
    }

    pub fn school_id(&self) -> &str {
        &self.school_id
    }
}

impl RequestDecorator for TenantHeader {
    fn id(&self) -> &str {
        Self::ID
    }

    fn decorate(&self, request: &mut ApiRequest) {
        request.set_header(SCHOOL_HEADER, self.school_id.clone());
    }
}

/// `X-Academic-Session-Id: <session>`, built once per selected session.
#[derive(Debug, Clone)]
pub struct SessionHeader {
    session_id: String,
}

impl SessionHeader {
    pub const ID: &'static str = "academic-session";

    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl RequestDecorator for SessionHeader {
    fn id(&self) -> &str {
        Self::ID
    }

    fn decorate(&self, request: &mut ApiRequest) {
        request.set_header(SESSION_HEADER, self.session_id.clone());
    }
}

/// Ordered set of installed decorators, applied in install order.
#[derive(Debug, Default)]
pub struct DecoratorChain {
    decorators: Vec<Arc<dyn RequestDecorator>>,
}

impl DecoratorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a decorator, replacing any decorator with the same id.
    pub fn install(&mut self, decorator: Arc<dyn RequestDecorator>) {
        let id = decorator.id().to_string();
        self.decorators.retain(|d| d.id() != id);
        self.decorators.push(decorator);
    }

    /// Remove the decorator with the given id. Returns whether one was installed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.decorators.len();
        self.decorators.retain(|d| d.id() != id);
        self.decorators.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.decorators.iter().any(|d| d.id() == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.decorators.iter().map(|d| d.id().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }

    pub fn clear(&mut self) {
        self.decorators.clear();
    }

    pub fn apply(&self, request: &mut ApiRequest) {
        for decorator in &self.decorators {
            decorator.decorate(request);
        }
    }
}
