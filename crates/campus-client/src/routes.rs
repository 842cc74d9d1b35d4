//! Route table: UI paths the state layer redirects to, and the backend
//! endpoints it calls.

pub const LOGIN: &str = "/login";
pub const DASHBOARD: &str = "/";

/// Platform-level school list, doubling as the school picker.
pub const SCHOOLS: &str = "/schools";
pub const SCHOOL_PICKER: &str = SCHOOLS;

pub const SESSION_SETUP: &str = "/school/setup/session";
pub const CLASSES: &str = "/classes";
pub const STUDENTS: &str = "/students";
pub const ATTENDANCE: &str = "/attendance";
pub const EXAMS: &str = "/exams";
pub const RESULTS: &str = "/results";
pub const FEES: &str = "/fees";
pub const FEE_COLLECTION: &str = "/fees/collect";
pub const STAFF: &str = "/staff";
pub const TRANSPORT: &str = "/transport";
pub const BILLING: &str = "/billing";
pub const SUBSCRIPTION: &str = "/subscription";

/// Backend REST endpoints.
pub mod api {
    pub const LOGIN: &str = "/api/auth/login";
    pub const SESSIONS: &str = "/api/academic-sessions";
    pub const ACTIVE_SESSION: &str = "/api/academic-sessions/active";
    pub const CLASSES_COUNT: &str = "/api/classes/count";
    pub const STUDENTS_COUNT: &str = "/api/students/count";
    pub const STAFF_COUNT: &str = "/api/staff/count";
    pub const FEES_COLLECTED: &str = "/api/fees/collected";
    pub const SUBSCRIPTION_STATUS: &str = "/api/subscription/status";

    pub fn activate_session(id: &str) -> String {
        format!("{}/{}/activate", SESSIONS, id)
    }

    pub fn school(id: &str) -> String {
        format!("/api/schools/{}", id)
    }
}

/// Strip query string, fragment and trailing slashes.
pub fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        DASHBOARD
    } else {
        trimmed
    }
}

/// `path` equals `prefix` or lies beneath it. The root only matches itself.
pub fn matches_prefix(path: &str, prefix: &str) -> bool {
    let path = normalize(path);
    let prefix = normalize(prefix);
    if prefix == DASHBOARD {
        return path == DASHBOARD;
    }
    path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
}

pub fn is_login(path: &str) -> bool {
    normalize(path) == LOGIN
}

/// Billing and subscription views stay reachable while a tenant is suspended.
pub fn is_billing_route(path: &str) -> bool {
    matches_prefix(path, BILLING) || matches_prefix(path, SUBSCRIPTION)
}
