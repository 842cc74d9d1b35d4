//! Wire types exchanged with the Campus backend.
//!
//! Ids arrive as either JSON strings or numbers depending on the endpoint;
//! they are normalized to `String` on the way in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::role::Role;

mod id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    impl From<RawId> for String {
        fn from(raw: RawId) -> Self {
            match raw {
                RawId::Text(s) => s,
                RawId::Number(n) => n.to_string(),
            }
        }
    }

    pub fn required<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        RawId::deserialize(d).map(Into::into)
    }

    pub fn optional<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Option::<RawId>::deserialize(d).map(|raw| raw.map(Into::into))
    }
}

// ─── Identity ───────────────────────────────────────────────────────

/// The logged-in user. A `None` school id marks a platform-level user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "id", deserialize_with = "id::required")]
    pub user_id: String,
    #[serde(default, deserialize_with = "id::optional")]
    pub school_id: Option<String>,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    /// The parsed role, if it is one the client knows.
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    /// Platform-level: a platform role, or no school attached at all.
    pub fn is_platform_user(&self) -> bool {
        self.school_id.is_none() || self.role().is_some_and(|r| r.is_platform())
    }

    /// Minimal shape check applied when rehydrating from storage.
    pub fn is_valid(&self) -> bool {
        !self.user_id.trim().is_empty() && !self.role.trim().is_empty()
    }
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response from `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

// ─── Tenancy ────────────────────────────────────────────────────────

/// A school (tenant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    #[serde(deserialize_with = "id::required")]
    pub id: String,
    pub name: String,
    #[serde(default = "default_true", alias = "isActive")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

/// An academic session (school year). `active` is the school-wide flag, not
/// whichever session the user happens to be browsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicSession {
    #[serde(deserialize_with = "id::required")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "id::optional")]
    pub school_id: Option<String>,
    #[serde(default, alias = "isActive")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl AcademicSession {
    /// Stand-in for an active session the list endpoint did not return.
    pub fn synthesized(active: &ActiveSessionDescriptor, school_id: &str) -> Self {
        Self {
            id: active.id.clone(),
            name: active.name.clone().unwrap_or_default(),
            school_id: Some(school_id.to_string()),
            active: true,
            start_date: None,
            end_date: None,
        }
    }
}

/// Response from `GET /api/academic-sessions/active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSessionDescriptor {
    #[serde(alias = "sessionId", deserialize_with = "id::required")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Request body for `POST /api/academic-sessions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub active: bool,
}

// ─── Envelopes ──────────────────────────────────────────────────────

/// List endpoints answer with either a page envelope or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Page { content: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Page { content } => content,
            ListEnvelope::Bare(items) => items,
        }
    }
}

/// Count endpoints answer with a bare number or `{"count": n}`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum CountResponse {
    Bare(u64),
    Object {
        #[serde(alias = "total")]
        count: u64,
    },
}

impl CountResponse {
    pub fn value(self) -> u64 {
        match self {
            CountResponse::Bare(n) | CountResponse::Object { count: n } => n,
        }
    }
}

/// Amount endpoints answer with a bare number or `{"total": x}`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum AmountResponse {
    Bare(f64),
    Object {
        #[serde(alias = "amount")]
        total: f64,
    },
}

impl AmountResponse {
    pub fn value(self) -> f64 {
        match self {
            AmountResponse::Bare(x) | AmountResponse::Object { total: x } => x,
        }
    }
}

/// Result of a generation-keyed refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No tenant in context; state was reset.
    Cleared,
    /// Fresh data committed.
    Resolved,
    /// A newer refresh or a teardown superseded this one; nothing committed.
    Stale,
}
