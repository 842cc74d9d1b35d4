//! Subscription gate.
//!
//! Holds the tenant's subscription status and derives two independent
//! warning levels from it: capacity (active students against the plan cap)
//! and expiry (days left before the subscription lapses). A suspended
//! tenant is locked out of everything except the billing views.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::notify::Notifier;
use crate::routes;
use crate::types::RefreshOutcome;

const SECS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    PastDue,
    Suspended,
    #[default]
    NoPlan,
}

impl SubscriptionStatus {
    /// Case-insensitive; anything unrecognized is `NoPlan`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().replace(['-', ' '], "_").as_str() {
            "TRIAL" => SubscriptionStatus::Trial,
            "ACTIVE" => SubscriptionStatus::Active,
            "PAST_DUE" => SubscriptionStatus::PastDue,
            "SUSPENDED" => SubscriptionStatus::Suspended,
            _ => SubscriptionStatus::NoPlan,
        }
    }
}

impl<'de> Deserialize<'de> for SubscriptionStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().map_or(SubscriptionStatus::NoPlan, SubscriptionStatus::parse))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UsageWarningLevel {
    #[default]
    None,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExpiryWarningLevel {
    #[default]
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "WARNING_30")]
    Warning30,
    #[serde(rename = "CRITICAL_7")]
    Critical7,
    #[serde(rename = "EXPIRED")]
    Expired,
}

/// Warning thresholds of the tenant's plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Plan {
    pub name: Option<String>,
    pub usage_warning_percent: f64,
    pub usage_critical_percent: f64,
    pub expiry_warning_days: i64,
    pub expiry_critical_days: i64,
    pub grace_days: i64,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            name: None,
            usage_warning_percent: 80.0,
            usage_critical_percent: 95.0,
            expiry_warning_days: 30,
            expiry_critical_days: 7,
            grace_days: 0,
        }
    }
}

/// Body of `GET /api/subscription/status`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPayload {
    #[serde(default)]
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub active_students: u64,
    #[serde(default)]
    pub student_cap: Option<u64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub plan: Option<Plan>,
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC) or a bare
/// date (midnight UTC). Anything else is dropped with a warning.
fn lenient_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let Some(raw) = Option::<String>::deserialize(d)? else {
        return Ok(None);
    };
    let parsed = parse_timestamp(&raw);
    if parsed.is_none() {
        tracing::warn!(value = %raw, "unparseable subscription expiry");
    }
    Ok(parsed)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Active students as a percentage of the cap; no cap (or a zero cap) is 0.
pub fn usage_percent(active_students: u64, student_cap: Option<u64>) -> f64 {
    match student_cap {
        Some(cap) if cap > 0 => active_students as f64 * 100.0 / cap as f64,
        _ => 0.0,
    }
}

pub fn usage_level(percent: f64, plan: &Plan) -> UsageWarningLevel {
    if percent >= plan.usage_critical_percent {
        UsageWarningLevel::Critical
    } else if percent >= plan.usage_warning_percent {
        UsageWarningLevel::Warning
    } else {
        UsageWarningLevel::None
    }
}

/// Whole days until expiry: partial days round up while time remains and
/// down once it has passed.
pub fn days_to_expiry(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (expires_at - now).num_seconds();
    if secs > 0 {
        (secs + SECS_PER_DAY - 1) / SECS_PER_DAY
    } else {
        secs.div_euclid(SECS_PER_DAY)
    }
}

pub fn expiry_level(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>, plan: &Plan) -> ExpiryWarningLevel {
    let Some(expires_at) = expires_at else {
        return ExpiryWarningLevel::None;
    };
    if expires_at <= now {
        return ExpiryWarningLevel::Expired;
    }
    let days = days_to_expiry(expires_at, now);
    if days <= plan.expiry_critical_days {
        ExpiryWarningLevel::Critical7
    } else if days <= plan.expiry_warning_days {
        ExpiryWarningLevel::Warning30
    } else {
        ExpiryWarningLevel::None
    }
}

/// Subscription state with derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionInfo {
    pub status: SubscriptionStatus,
    pub plan: Plan,
    pub active_students: u64,
    pub student_cap: Option<u64>,
    pub usage_percent: f64,
    pub usage_warning: UsageWarningLevel,
    pub expires_at: Option<DateTime<Utc>>,
    pub days_to_expiry: Option<i64>,
    pub expiry_warning: ExpiryWarningLevel,
}

impl SubscriptionInfo {
    pub fn derive(payload: &SubscriptionPayload, now: DateTime<Utc>) -> Self {
        let plan = payload.plan.clone().unwrap_or_default();
        let usage_percent = usage_percent(payload.active_students, payload.student_cap);
        Self {
            status: payload.status,
            usage_warning: usage_level(usage_percent, &plan),
            usage_percent,
            active_students: payload.active_students,
            student_cap: payload.student_cap,
            expires_at: payload.expires_at,
            days_to_expiry: payload.expires_at.map(|at| days_to_expiry(at, now)),
            expiry_warning: expiry_level(payload.expires_at, now, &plan),
            plan,
        }
    }

    /// Tenant without a subscription record.
    pub fn no_plan() -> Self {
        Self::derive(&SubscriptionPayload::default(), Utc::now())
    }

    pub fn is_suspended(&self) -> bool {
        self.status == SubscriptionStatus::Suspended
    }

    /// Suspension hides every route except billing and subscription.
    pub fn blocks_route(&self, path: &str) -> bool {
        self.is_suspended() && !routes::is_billing_route(path)
    }

    /// Expired, but still within the plan's grace window. A window too large
    /// to represent never ends.
    pub fn in_grace_period(&self, now: DateTime<Utc>) -> bool {
        let Some(at) = self.expires_at.filter(|at| *at <= now) else {
            return false;
        };
        let grace_days = self.plan.grace_days;
        match chrono::Duration::try_days(grace_days).and_then(|grace| at.checked_add_signed(grace)) {
            Some(grace_ends) => now < grace_ends,
            None => grace_days > 0,
        }
    }
}

#[derive(Debug, Default)]
struct SubscriptionState {
    info: Option<SubscriptionInfo>,
    loading: bool,
    tenant_id: Option<String>,
}

#[derive(Clone)]
pub struct SubscriptionStore {
    api: ApiClient,
    notifier: Notifier,
    state: Arc<RwLock<SubscriptionState>>,
    generation: Arc<AtomicU64>,
    poller: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SubscriptionStore {
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        Self {
            api,
            notifier,
            state: Arc::new(RwLock::new(SubscriptionState::default())),
            generation: Arc::new(AtomicU64::new(0)),
            poller: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn info(&self) -> Option<SubscriptionInfo> {
        self.state.read().await.info.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn is_suspended(&self) -> bool {
        self.state.read().await.info.as_ref().is_some_and(|i| i.is_suspended())
    }

    pub async fn blocks_route(&self, path: &str) -> bool {
        self.state.read().await.info.as_ref().is_some_and(|i| i.blocks_route(path))
    }

    /// Fetch the status for `tenant`.
    ///
    /// A 404 means the tenant has no plan. Any other failure keeps the last
    /// known status and raises a notification.
    pub async fn refresh(&self, tenant: Option<&str>) -> RefreshOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(tenant) = tenant else {
            *self.state.write().await = SubscriptionState::default();
            return RefreshOutcome::Cleared;
        };

        {
            let mut state = self.state.write().await;
            if state.tenant_id.as_deref() != Some(tenant) {
                state.info = None;
                state.tenant_id = Some(tenant.to_string());
            }
            state.loading = true;
        }

        let fetched = self
            .api
            .get::<SubscriptionPayload>(routes::api::SUBSCRIPTION_STATUS)
            .await;

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::warn!(tenant, "discarding stale subscription response");
            return RefreshOutcome::Stale;
        }
        match fetched {
            Ok(payload) => {
                let info = SubscriptionInfo::derive(&payload, Utc::now());
                tracing::debug!(
                    tenant,
                    status = ?info.status,
                    usage = ?info.usage_warning,
                    expiry = ?info.expiry_warning,
                    "subscription refreshed"
                );
                if info.is_suspended() && !state.info.as_ref().is_some_and(|i| i.is_suspended()) {
                    tracing::warn!(tenant, "subscription suspended");
                }
                state.info = Some(info);
            }
            Err(e) if e.is_not_found() => {
                state.info = Some(SubscriptionInfo::no_plan());
            }
            Err(e) => {
                self.notifier
                    .error(format!("Failed to load subscription status: {}", e.message()));
            }
        }
        state.loading = false;
        RefreshOutcome::Resolved
    }

    /// Re-fetch every `interval` until [`stop_polling`](Self::stop_polling)
    /// or [`teardown`](Self::teardown). Replaces any running poller.
    pub fn start_polling(&self, tenant: String, interval: Duration) {
        let store = self.clone();
        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            loop {
                ticker.tick().await;
                store.refresh(Some(&tenant)).await;
            }
        });

        if let Some(previous) = self.poller_slot().replace(handle) {
            previous.abort();
        }
        tracing::debug!(interval_secs = interval.as_secs(), "subscription polling started");
    }

    pub fn stop_polling(&self) {
        if let Some(handle) = self.poller_slot().take() {
            handle.abort();
            tracing::debug!("subscription polling stopped");
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller_slot().as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop polling, drop in-flight refreshes, and clear state.
    pub async fn teardown(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.stop_polling();
        *self.state.write().await = SubscriptionState::default();
    }

    fn poller_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        match self.poller.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl std::fmt::Debug for SubscriptionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionStore")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .field("polling", &self.is_polling())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(raw: &str) -> DateTime<Utc> {
        parse_timestamp(raw).unwrap()
    }

    #[test]
    fn status_parsing_is_lenient() {
        assert_eq!(SubscriptionStatus::parse("past_due"), SubscriptionStatus::PastDue);
        assert_eq!(SubscriptionStatus::parse("Suspended"), SubscriptionStatus::Suspended);
        assert_eq!(SubscriptionStatus::parse("CANCELLED"), SubscriptionStatus::NoPlan);

        let payload: SubscriptionPayload = serde_json::from_value(json!({"status": null})).unwrap();
        assert_eq!(payload.status, SubscriptionStatus::NoPlan);
    }

    #[test]
    fn usage_levels() {
        let plan = Plan::default();
        assert_eq!(usage_percent(40, Some(50)), 80.0);
        assert_eq!(usage_percent(40, Some(0)), 0.0);
        assert_eq!(usage_percent(40, None), 0.0);
        assert_eq!(usage_level(79.9, &plan), UsageWarningLevel::None);
        assert_eq!(usage_level(80.0, &plan), UsageWarningLevel::Warning);
        assert_eq!(usage_level(95.0, &plan), UsageWarningLevel::Critical);
    }

    #[test]
    fn expiry_levels() {
        let plan = Plan::default();
        let now = at("2025-01-01T12:00:00Z");
        assert_eq!(expiry_level(None, now, &plan), ExpiryWarningLevel::None);
        assert_eq!(expiry_level(Some(at("2025-03-01")), now, &plan), ExpiryWarningLevel::None);
        assert_eq!(expiry_level(Some(at("2025-01-20")), now, &plan), ExpiryWarningLevel::Warning30);
        assert_eq!(expiry_level(Some(at("2025-01-05")), now, &plan), ExpiryWarningLevel::Critical7);
        assert_eq!(expiry_level(Some(now), now, &plan), ExpiryWarningLevel::Expired);
    }

    #[test]
    fn days_round_toward_the_deadline() {
        let now = at("2025-01-01T12:00:00Z");
        assert_eq!(days_to_expiry(at("2025-01-02T00:00:00Z"), now), 1);
        assert_eq!(days_to_expiry(at("2025-01-01T06:00:00Z"), now), -1);
        assert_eq!(days_to_expiry(now, now), 0);
    }

    #[test]
    fn plan_thresholds_drive_derivation() {
        let payload: SubscriptionPayload = serde_json::from_value(json!({
            "status": "ACTIVE",
            "activeStudents": 60,
            "studentCap": 100,
            "expiresAt": "2025-01-10T00:00:00",
            "plan": {"name": "Basic", "usageWarningPercent": 50, "expiryCriticalDays": 14}
        }))
        .unwrap();
        let info = SubscriptionInfo::derive(&payload, at("2025-01-01T00:00:00Z"));
        assert_eq!(info.usage_warning, UsageWarningLevel::Warning);
        assert_eq!(info.days_to_expiry, Some(9));
        assert_eq!(info.expiry_warning, ExpiryWarningLevel::Critical7);
        assert_eq!(info.plan.usage_critical_percent, 95.0);
    }

    #[test]
    fn suspension_spares_billing_routes() {
        let payload = SubscriptionPayload {
            status: SubscriptionStatus::Suspended,
            ..Default::default()
        };
        let info = SubscriptionInfo::derive(&payload, Utc::now());
        assert!(info.blocks_route("/students"));
        assert!(info.blocks_route("/"));
        assert!(!info.blocks_route("/billing"));
        assert!(!info.blocks_route("/subscription/upgrade"));
    }

    #[test]
    fn grace_period() {
        let expires = at("2025-01-01T00:00:00Z");
        let payload = SubscriptionPayload {
            status: SubscriptionStatus::PastDue,
            expires_at: Some(expires),
            plan: Some(Plan {
                grace_days: 3,
                ..Plan::default()
            }),
            ..Default::default()
        };
        let info = SubscriptionInfo::derive(&payload, expires);
        assert!(info.in_grace_period(at("2025-01-02T00:00:00Z")));
        assert!(!info.in_grace_period(at("2025-01-05T00:00:00Z")));
        assert!(!info.in_grace_period(at("2024-12-31T00:00:00Z")));
        assert!(!SubscriptionInfo::no_plan().in_grace_period(expires));
    }

    #[test]
    fn oversized_grace_window_does_not_overflow() {
        let payload: SubscriptionPayload = serde_json::from_value(json!({
            "status": "PAST_DUE",
            "expiresAt": "2025-01-01T00:00:00Z",
            "plan": { "graceDays": i64::MAX }
        }))
        .unwrap();
        let info = SubscriptionInfo::derive(&payload, at("2025-01-02T00:00:00Z"));
        assert!(info.in_grace_period(at("2025-01-02T00:00:00Z")));

        let mut negative = info.clone();
        negative.plan.grace_days = i64::MIN;
        assert!(!negative.in_grace_period(at("2025-01-02T00:00:00Z")));
    }

    #[test]
    fn expiry_string_shapes() {
        assert!(parse_timestamp("2025-01-01T00:00:00+02:00").is_some());
        assert!(parse_timestamp("2025-01-01T00:00:00.123").is_some());
        assert!(parse_timestamp("2025-01-01").is_some());
        assert!(parse_timestamp("next tuesday").is_none());
    }
}
