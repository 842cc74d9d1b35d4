//! Shell decision: which frame wraps the page for a given path.

use crate::navigation;
use crate::role::Role;
use crate::routes;

/// Store snapshot the shell decision reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShellInputs {
    pub authenticated: bool,
    /// Tenant, session or subscription data still in flight.
    pub loading: bool,
    pub suspended: bool,
    pub school_active: bool,
    pub platform_user: bool,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    Page,
    AccessDenied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    /// Login page, no chrome.
    Bare,
    Redirect(&'static str),
    Loading,
    /// Full-screen suspension notice over everything but billing.
    SuspensionOverlay,
    InactiveSchool,
    Sidebar(Content),
}

/// Choose the shell for `path`. The first matching rule wins:
/// login, authentication, loading, suspension, inactive school, role
/// authorization.
pub fn decide(path: &str, inputs: &ShellInputs) -> Shell {
    if routes::is_login(path) {
        return Shell::Bare;
    }
    if !inputs.authenticated {
        return Shell::Redirect(routes::LOGIN);
    }
    if inputs.loading {
        return Shell::Loading;
    }
    if inputs.suspended && !routes::is_billing_route(path) {
        return Shell::SuspensionOverlay;
    }
    if !inputs.school_active && !inputs.platform_user {
        return Shell::InactiveSchool;
    }
    if !navigation::authorize(inputs.role, path) {
        return Shell::Sidebar(Content::AccessDenied);
    }
    Shell::Sidebar(Content::Page)
}
