//! Role-keyed dashboard selection and the stat cards behind it.

use serde::Serialize;

use crate::api::ApiClient;
use crate::role::Role;
use crate::routes;
use crate::types::{AmountResponse, CountResponse};

/// Which dashboard a role sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardView {
    Platform,
    SchoolAdmin,
    Teacher,
    Accountant,
    Student,
    Parent,
    /// Role with no dashboard yet; carries the raw role for display.
    NotConfigured { role: String },
}

impl DashboardView {
    /// Pick a view for a raw role string. Unknown roles fall back to
    /// [`DashboardView::NotConfigured`].
    pub fn for_role(raw: &str) -> Self {
        match Role::parse(raw) {
            Some(Role::SuperAdmin | Role::PlatformAdmin) => DashboardView::Platform,
            Some(Role::SchoolAdmin) => DashboardView::SchoolAdmin,
            Some(Role::Teacher) => DashboardView::Teacher,
            Some(Role::Accountant) => DashboardView::Accountant,
            Some(Role::Student) => DashboardView::Student,
            Some(Role::Parent) => DashboardView::Parent,
            None => DashboardView::NotConfigured {
                role: raw.to_string(),
            },
        }
    }

    pub fn title(&self) -> String {
        match self {
            DashboardView::Platform => "Platform overview".to_string(),
            DashboardView::SchoolAdmin => "School dashboard".to_string(),
            DashboardView::Teacher => "Teacher dashboard".to_string(),
            DashboardView::Accountant => "Finance dashboard".to_string(),
            DashboardView::Student => "My dashboard".to_string(),
            DashboardView::Parent => "Family dashboard".to_string(),
            DashboardView::NotConfigured { role } => {
                format!("No dashboard is configured for role \"{}\"", role)
            }
        }
    }

    /// Views that show the school stat cards.
    pub fn shows_stats(&self) -> bool {
        matches!(self, DashboardView::SchoolAdmin | DashboardView::Accountant)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub students: u64,
    pub classes: u64,
    pub staff: u64,
    pub fees_collected: f64,
}

/// Fetch the four stat cards in parallel. A failed card reads as zero and
/// leaves the others alone.
pub async fn load_stats(api: &ApiClient) -> DashboardStats {
    let (students, classes, staff, fees) = tokio::join!(
        api.get::<CountResponse>(routes::api::STUDENTS_COUNT),
        api.get::<CountResponse>(routes::api::CLASSES_COUNT),
        api.get::<CountResponse>(routes::api::STAFF_COUNT),
        api.get::<AmountResponse>(routes::api::FEES_COLLECTED),
    );

    DashboardStats {
        students: card("students", students.map(CountResponse::value)),
        classes: card("classes", classes.map(CountResponse::value)),
        staff: card("staff", staff.map(CountResponse::value)),
        fees_collected: card("fees_collected", fees.map(AmountResponse::value)),
    }
}

fn card<T: Default>(name: &str, result: Result<T, crate::error::ClientError>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(card = name, error = %e, "stat card failed; showing zero");
        T::default()
    })
}
