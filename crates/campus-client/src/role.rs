//! User roles and the role-keyed redirect table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::routes;

/// A known role. The backend sends roles as free-form strings; anything
/// outside this set is kept as raw text on the user and treated with the
/// tolerant defaults (dashboard redirect, "not configured" dashboard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    PlatformAdmin,
    SchoolAdmin,
    Teacher,
    Accountant,
    Student,
    Parent,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::SuperAdmin,
        Role::PlatformAdmin,
        Role::SchoolAdmin,
        Role::Teacher,
        Role::Accountant,
        Role::Student,
        Role::Parent,
    ];

    /// Parse a raw role string after normalization. `None` for unknown roles.
    pub fn parse(raw: &str) -> Option<Role> {
        match normalize(raw).as_str() {
            "SUPER_ADMIN" => Some(Role::SuperAdmin),
            "PLATFORM_ADMIN" => Some(Role::PlatformAdmin),
            "SCHOOL_ADMIN" => Some(Role::SchoolAdmin),
            "TEACHER" => Some(Role::Teacher),
            "ACCOUNTANT" => Some(Role::Accountant),
            "STUDENT" => Some(Role::Student),
            "PARENT" => Some(Role::Parent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::PlatformAdmin => "PLATFORM_ADMIN",
            Role::SchoolAdmin => "SCHOOL_ADMIN",
            Role::Teacher => "TEACHER",
            Role::Accountant => "ACCOUNTANT",
            Role::Student => "STUDENT",
            Role::Parent => "PARENT",
        }
    }

    /// Platform roles operate across schools and must pick one before
    /// touching school-scoped views.
    pub fn is_platform(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::PlatformAdmin)
    }

    /// Where a fresh login lands.
    pub fn home_route(&self) -> &'static str {
        match self {
            Role::SuperAdmin | Role::PlatformAdmin => routes::SCHOOLS,
            Role::SchoolAdmin => routes::DASHBOARD,
            Role::Teacher => routes::ATTENDANCE,
            Role::Accountant => routes::FEE_COLLECTION,
            Role::Student | Role::Parent => routes::DASHBOARD,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for [`Role::from_str`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Canonical form of a role string: trimmed, upper-cased, `-` and spaces
/// folded to `_`, and a leading `ROLE_` dropped.
pub fn normalize(raw: &str) -> String {
    let upper: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect();
    match upper.strip_prefix("ROLE_") {
        Some(rest) => rest.to_string(),
        None => upper,
    }
}

/// Post-login redirect for a raw role string; unknown roles go to the dashboard.
pub fn redirect_for(raw: &str) -> &'static str {
    Role::parse(raw)
        .map(|role| role.home_route())
        .unwrap_or(routes::DASHBOARD)
}
