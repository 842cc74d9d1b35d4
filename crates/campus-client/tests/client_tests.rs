//! Client integration tests.
//!
//! Covers: login redirects, the school-admin onboarding flow, tenant and
//! session headers, stale refreshes, subscription gating, shell decisions,
//! rehydration, dashboard stats, and logout.

use std::sync::Arc;
use std::time::Duration;

use campus_client::decorator::{AUTHORIZATION_HEADER, SCHOOL_HEADER, SESSION_HEADER};
use campus_client::routes::{self, api};
use campus_client::storage::keys;
use campus_client::transport::HttpMethod;
use campus_client::*;
use campus_test_utils::fixtures::{self, mount_empty_school, mount_ready_school};
use campus_test_utils::{campus_with, campus_with_storage, MockRoute, MockTransport};
use serde_json::json;

// ── Login redirects ─────────────────────────────────────────────

#[tokio::test]
async fn login_redirects_by_role() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");

    let cases = [
        (fixtures::teacher("3"), routes::ATTENDANCE),
        (fixtures::accountant("3"), routes::FEE_COLLECTION),
        (fixtures::school_admin("3"), routes::DASHBOARD),
        (fixtures::user("u9", Some("3"), "LIBRARIAN"), routes::DASHBOARD),
        (fixtures::super_admin(), routes::SCHOOLS),
    ];
    for (user, expected) in cases {
        let campus = campus_with(&mock);
        let role = user.role.clone();
        assert_eq!(campus.login("tok", user).await.unwrap(), expected, "{}", role);
    }
}

#[tokio::test]
async fn sign_in_posts_credentials() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");
    mock.post_json(api::LOGIN, fixtures::login_json("jwt-1", &fixtures::teacher("3")));

    let campus = campus_with(&mock);
    let landing = campus.sign_in("t@campus.test", "pw").await.unwrap();
    assert_eq!(landing, routes::ATTENDANCE);

    let login = mock.last_request_to(api::LOGIN).unwrap();
    assert_eq!(login.body.unwrap()["email"], "t@campus.test");
    assert_eq!(
        campus.storage().get(keys::TOKEN).await.unwrap().as_deref(),
        Some("jwt-1")
    );
}

#[tokio::test]
async fn rejected_sign_in_surfaces_message() {
    let mock = MockTransport::new();
    mock.fail(HttpMethod::Post, api::LOGIN, 401, "Invalid email or password");

    let campus = campus_with(&mock);
    let err = campus.sign_in("t@campus.test", "wrong").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "Invalid email or password");
    assert!(!campus.auth().is_authenticated().await);
}

// ── School admin onboarding ─────────────────────────────────────

#[tokio::test]
async fn school_admin_without_session_is_sent_to_setup() {
    let mock = MockTransport::new();
    mount_empty_school(&mock, "3");

    let campus = campus_with(&mock);
    let landing = campus.login("tok", fixtures::school_admin("3")).await.unwrap();
    assert_eq!(landing, routes::SESSION_SETUP);
    assert!(!campus.sessions().has_session().await);

    let outcome = campus.click("students").await.unwrap();
    assert_eq!(outcome.route(), routes::SESSION_SETUP);
    let warning = campus.notifier().recent().pop().unwrap();
    assert_eq!(warning.level, NotificationLevel::Warning);

    mock.post_json(api::SESSIONS, fixtures::session_json("s1", "2025/26", "3", true));
    mock.mount(
        MockRoute::get(api::SESSIONS)
            .when_header(SCHOOL_HEADER, "3")
            .respond(200, json!([fixtures::session_json("s1", "2025/26", "3", true)])),
    );
    mock.mount(
        MockRoute::get(api::ACTIVE_SESSION)
            .when_header(SCHOOL_HEADER, "3")
            .respond(200, json!({"id": "s1"})),
    );

    let request = CreateSessionRequest {
        name: "2025/26".into(),
        start_date: None,
        end_date: None,
        active: true,
    };
    assert_eq!(campus.create_session(&request).await.unwrap(), routes::DASHBOARD);
    assert!(campus.sessions().has_session().await);
    assert_eq!(campus.sessions().current().await.unwrap().id, "s1");

    // Still no classes: class-bound items point at class creation, Classes itself opens.
    assert_eq!(campus.click("students").await.unwrap().route(), routes::CLASSES);
    assert_eq!(
        campus.click("classes").await.unwrap(),
        NavOutcome::Navigate(routes::CLASSES)
    );
}

#[tokio::test]
async fn created_session_becomes_current_when_backend_lags() {
    let mock = MockTransport::new();
    mount_empty_school(&mock, "3");
    mock.post_json(api::SESSIONS, fixtures::session_json("s7", "2026/27", "3", false));

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::school_admin("3")).await.unwrap();

    let request = CreateSessionRequest {
        name: "2026/27".into(),
        start_date: None,
        end_date: None,
        active: false,
    };
    campus.create_session(&request).await.unwrap();
    assert_eq!(campus.sessions().current().await.unwrap().id, "s7");
    assert_eq!(
        campus.storage().get(keys::ACADEMIC_SESSION_ID).await.unwrap().as_deref(),
        Some("s7")
    );
}

#[tokio::test]
async fn create_session_without_tenant_fails() {
    let mock = MockTransport::new();
    let campus = campus_with(&mock);
    campus.login("tok", fixtures::super_admin()).await.unwrap();

    let request = CreateSessionRequest {
        name: "2025/26".into(),
        start_date: None,
        end_date: None,
        active: true,
    };
    let err = campus.create_session(&request).await.unwrap_err();
    assert_eq!(err, ClientError::NoTenant);
}

// ── Request headers ─────────────────────────────────────────────

#[tokio::test]
async fn requests_carry_auth_tenant_and_session_headers() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::school_admin("3")).await.unwrap();
    mock.clear_requests();

    campus.load_dashboard_stats().await;
    let req = mock.last_request_to(api::STUDENTS_COUNT).unwrap();
    assert_eq!(req.header(AUTHORIZATION_HEADER), Some("Bearer tok"));
    assert_eq!(req.header(SCHOOL_HEADER), Some("3"));
    assert_eq!(req.header(SESSION_HEADER), Some("s1"));
}

#[tokio::test]
async fn no_session_header_before_a_session_exists() {
    let mock = MockTransport::new();
    mount_empty_school(&mock, "3");

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::school_admin("3")).await.unwrap();
    campus.load_dashboard_stats().await;

    assert!(!mock.requests().is_empty());
    assert!(mock.requests().iter().all(|r| r.header(SESSION_HEADER).is_none()));
}

#[tokio::test]
async fn session_header_follows_selection_and_clear() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");
    mock.mount(
        MockRoute::get(api::SESSIONS).when_header(SCHOOL_HEADER, "3").respond(
            200,
            json!([
                fixtures::session_json("s1", "2025/26", "3", true),
                fixtures::session_json("s0", "2024/25", "3", false),
            ]),
        ),
    );

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::school_admin("3")).await.unwrap();

    campus.sessions().select_session("s0").await.unwrap();
    campus.load_dashboard_stats().await;
    let req = mock.last_request_to(api::STAFF_COUNT).unwrap();
    assert_eq!(req.header(SESSION_HEADER), Some("s0"));

    campus.sessions().clear_session().await;
    campus.load_dashboard_stats().await;
    let req = mock.last_request_to(api::STAFF_COUNT).unwrap();
    assert_eq!(req.header(SESSION_HEADER), None);
    assert!(!campus.sessions().has_session().await);
}

#[tokio::test]
async fn selecting_unknown_session_is_not_found() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::school_admin("3")).await.unwrap();

    let err = campus.sessions().select_session("nope").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(campus.sessions().current().await.unwrap().id, "s1");
}

#[tokio::test]
async fn unlisted_active_session_is_synthesized() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");
    mock.mount(
        MockRoute::get(api::ACTIVE_SESSION)
            .when_header(SCHOOL_HEADER, "3")
            .respond(200, json!({"sessionId": 42, "name": "Summer term"})),
    );

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::teacher("3")).await.unwrap();

    let current = campus.sessions().current().await.unwrap();
    assert_eq!(current.id, "42");
    assert_eq!(current.name, "Summer term");
    assert_eq!(current.school_id.as_deref(), Some("3"));
}

#[tokio::test]
async fn activate_session_puts_and_refreshes() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");
    mock.put_json(&api::activate_session("s2"), json!(null));

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::school_admin("3")).await.unwrap();
    mock.clear_requests();

    campus.sessions().activate_session("s2").await.unwrap();
    assert_eq!(mock.requests_to(&api::activate_session("s2")).len(), 1);
    assert_eq!(mock.requests_to(api::SESSIONS).len(), 1);
}

// ── Tenant switching ────────────────────────────────────────────

#[tokio::test]
async fn platform_admin_must_pick_a_school() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");

    let campus = campus_with(&mock);
    assert_eq!(campus.login("tok", fixtures::super_admin()).await.unwrap(), routes::SCHOOLS);

    let outcome = campus.click("students").await.unwrap();
    assert_eq!(outcome.route(), routes::SCHOOL_PICKER);

    campus.select_school("3", Some("Hillside")).await.unwrap();
    assert_eq!(campus.tenant().tenant_id().await.as_deref(), Some("3"));
    assert_eq!(
        campus.click("students").await.unwrap(),
        NavOutcome::Navigate(routes::STUDENTS)
    );
    assert_eq!(
        campus.storage().get(keys::SELECTED_SCHOOL_NAME).await.unwrap().as_deref(),
        Some("Hillside")
    );
}

#[tokio::test]
async fn school_users_cannot_switch_schools() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::teacher("3")).await.unwrap();
    let err = campus.select_school("4", None).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn superseded_refresh_does_not_overwrite_state() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "A", "a1");
    mount_ready_school(&mock, "B", "b1");
    mock.mount(
        MockRoute::get(api::SESSIONS)
            .when_header(SCHOOL_HEADER, "A")
            .respond(200, json!([fixtures::session_json("a1", "A 2025", "A", true)]))
            .delay(Duration::from_millis(200)),
    );

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::super_admin()).await.unwrap();

    let (first, second) = tokio::join!(campus.select_school("A", None), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        campus.select_school("B", None).await
    });
    first.unwrap();
    second.unwrap();

    let snapshot = campus.sessions().snapshot().await;
    assert_eq!(snapshot.tenant_id.as_deref(), Some("B"));
    assert_eq!(snapshot.current.unwrap().id, "b1");

    campus.load_dashboard_stats().await;
    let req = mock.last_request_to(api::CLASSES_COUNT).unwrap();
    assert_eq!(req.header(SCHOOL_HEADER), Some("B"));
    assert_eq!(req.header(SESSION_HEADER), Some("b1"));
}

#[tokio::test]
async fn slow_school_fetch_does_not_let_old_tenant_commit() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "A", "a1");
    mount_ready_school(&mock, "B", "b1");
    mock.mount(
        MockRoute::get(api::school("A"))
            .when_header(SCHOOL_HEADER, "A")
            .respond(200, fixtures::school_json("A", "Hillside", true))
            .delay(Duration::from_millis(200)),
    );

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::super_admin()).await.unwrap();
    mock.clear_requests();

    let (first, second) = tokio::join!(campus.select_school("A", None), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        campus.select_school("B", None).await
    });
    first.unwrap();
    second.unwrap();

    assert_eq!(campus.tenant().tenant_id().await.as_deref(), Some("B"));
    let snapshot = campus.sessions().snapshot().await;
    assert_eq!(snapshot.tenant_id.as_deref(), Some("B"));
    assert_eq!(snapshot.current.unwrap().id, "b1");

    // Only the winning load asked for sessions.
    let listed: Vec<_> = mock
        .requests_to(api::SESSIONS)
        .iter()
        .map(|r| r.header(SCHOOL_HEADER).map(str::to_string))
        .collect();
    assert_eq!(listed, vec![Some("B".to_string())]);
}

#[tokio::test]
async fn class_presence_follows_session_and_tenant() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "A", "a1");
    mount_ready_school(&mock, "B", "b1");
    mock.mount(
        MockRoute::get(api::SESSIONS).when_header(SCHOOL_HEADER, "A").respond(
            200,
            json!([
                fixtures::session_json("a1", "2025/26", "A", true),
                fixtures::session_json("a0", "2024/25", "A", false),
            ]),
        ),
    );
    mock.mount(
        MockRoute::get(api::CLASSES_COUNT)
            .when_header(SESSION_HEADER, "a0")
            .respond(200, json!({ "count": 0 })),
    );
    mock.mount(
        MockRoute::get(api::CLASSES_COUNT)
            .when_header(SCHOOL_HEADER, "B")
            .respond(200, json!({ "count": 0 })),
    );

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::super_admin()).await.unwrap();
    campus.select_school("A", None).await.unwrap();
    assert!(campus.sessions().has_classes().await);

    campus.sessions().select_session("a0").await.unwrap();
    assert!(!campus.sessions().has_classes().await);

    campus.sessions().select_session("a1").await.unwrap();
    assert!(campus.sessions().has_classes().await);

    campus.select_school("B", None).await.unwrap();
    assert!(campus.sessions().has_session().await);
    assert!(!campus.sessions().has_classes().await);
    let req = mock.last_request_to(api::CLASSES_COUNT).unwrap();
    assert_eq!(req.header(SCHOOL_HEADER), Some("B"));
}

#[tokio::test]
async fn clearing_session_wins_over_in_flight_refresh() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::school_admin("3")).await.unwrap();
    assert!(campus.sessions().has_session().await);

    mock.mount(
        MockRoute::get(api::SESSIONS)
            .when_header(SCHOOL_HEADER, "3")
            .respond(200, json!([fixtures::session_json("s1", "2025/26", "3", true)]))
            .delay(Duration::from_millis(200)),
    );
    let (outcome, _) = tokio::join!(campus.sessions().refresh_sessions(Some("3")), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        campus.sessions().clear_session().await
    });
    assert_eq!(outcome, RefreshOutcome::Stale);
    assert!(!campus.sessions().has_session().await);
    assert!(!campus.sessions().is_loading().await);

    campus.load_dashboard_stats().await;
    let req = mock.last_request_to(api::STAFF_COUNT).unwrap();
    assert_eq!(req.header(SESSION_HEADER), None);
}

// ── Subscription gate and shell ─────────────────────────────────

#[tokio::test]
async fn suspended_tenant_sees_overlay_except_on_billing() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");
    mock.mount(
        MockRoute::get(api::SUBSCRIPTION_STATUS)
            .when_header(SCHOOL_HEADER, "3")
            .respond(200, fixtures::subscription_json("SUSPENDED")),
    );

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::school_admin("3")).await.unwrap();

    for path in ["/", "/students", "/attendance", "/fees/collect", "/classes"] {
        assert_eq!(campus.shell(path).await, Shell::SuspensionOverlay, "{}", path);
    }
    assert_eq!(campus.shell("/billing").await, Shell::Sidebar(Content::Page));
    assert_eq!(campus.shell("/subscription").await, Shell::Sidebar(Content::Page));
}

#[tokio::test]
async fn missing_subscription_is_no_plan() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");
    mock.mount(
        MockRoute::get(api::SUBSCRIPTION_STATUS)
            .when_header(SCHOOL_HEADER, "3")
            .respond(404, json!({"message": "No subscription"})),
    );

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::school_admin("3")).await.unwrap();

    let info = campus.subscription().info().await.unwrap();
    assert_eq!(info.status, SubscriptionStatus::NoPlan);
    assert_eq!(campus.shell("/students").await, Shell::Sidebar(Content::Page));
}

#[tokio::test]
async fn failed_subscription_refresh_keeps_last_status() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::school_admin("3")).await.unwrap();
    assert_eq!(
        campus.subscription().info().await.unwrap().status,
        SubscriptionStatus::Active
    );

    mock.mount(
        MockRoute::get(api::SUBSCRIPTION_STATUS)
            .when_header(SCHOOL_HEADER, "3")
            .respond(503, json!({"message": "Billing is down"})),
    );
    campus.subscription().refresh(Some("3")).await;

    assert_eq!(
        campus.subscription().info().await.unwrap().status,
        SubscriptionStatus::Active
    );
    let last = campus.notifier().recent().pop().unwrap();
    assert_eq!(last.level, NotificationLevel::Error);
    assert!(last.message.contains("Billing is down"));
}

#[tokio::test]
async fn subscription_polling_refetches_until_stopped() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::school_admin("3")).await.unwrap();
    mock.clear_requests();

    campus
        .subscription()
        .start_polling("3".to_string(), Duration::from_millis(40));
    assert!(campus.subscription().is_polling());
    tokio::time::sleep(Duration::from_millis(150)).await;
    campus.teardown().await;
    assert!(!campus.subscription().is_polling());

    let polled = mock.requests_to(api::SUBSCRIPTION_STATUS).len();
    assert!(polled >= 2, "polled {} times", polled);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(mock.requests_to(api::SUBSCRIPTION_STATUS).len(), polled);
}

#[tokio::test]
async fn inactive_school_blocks_school_users() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");
    mock.mount(
        MockRoute::get(api::school("3"))
            .when_header(SCHOOL_HEADER, "3")
            .respond(200, fixtures::school_json("3", "Hillside", false)),
    );

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::teacher("3")).await.unwrap();
    assert_eq!(campus.shell("/attendance").await, Shell::InactiveSchool);
}

#[tokio::test]
async fn role_outside_route_gets_access_denied() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::teacher("3")).await.unwrap();
    assert_eq!(
        campus.shell("/fees/collect").await,
        Shell::Sidebar(Content::AccessDenied)
    );
    assert_eq!(campus.shell("/attendance").await, Shell::Sidebar(Content::Page));
}

// ── Rehydration ─────────────────────────────────────────────────

#[tokio::test]
async fn identity_observers_see_sign_in() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");

    let campus = campus_with(&mock);
    let mut identity = campus.auth().subscribe();
    assert!(identity.borrow().is_none());

    campus.login("tok", fixtures::teacher("3")).await.unwrap();
    assert!(identity.has_changed().unwrap());
    let seen = identity.borrow_and_update().clone().unwrap();
    assert_eq!(seen.role, "TEACHER");
}

#[tokio::test]
async fn logout_without_tenant_load_issues_no_requests() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");
    let storage = Arc::new(MemoryStorage::new());

    let first = campus_with_storage(&mock, storage.clone());
    first.login("tok", fixtures::school_admin("3")).await.unwrap();
    mock.clear_requests();

    let second = campus_with_storage(&mock, storage.clone());
    assert!(second.auth().rehydrate().await);
    assert_eq!(second.logout().await, routes::LOGIN);

    assert!(mock.requests().is_empty());
    assert_eq!(storage.get(keys::TOKEN).await.unwrap(), None);
}

#[tokio::test]
async fn rehydrate_restores_valid_credentials() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");

    let storage = Arc::new(MemoryStorage::new());
    let user = serde_json::to_string(&fixtures::teacher("3")).unwrap();
    storage.set(keys::TOKEN, "stored-token").await.unwrap();
    storage.set(keys::USER, &user).await.unwrap();

    let campus = campus_with_storage(&mock, storage);
    assert!(campus.bootstrap().await);
    assert_eq!(campus.sessions().current().await.unwrap().id, "s1");

    let req = mock.last_request_to(api::SESSIONS).unwrap();
    assert_eq!(req.header(AUTHORIZATION_HEADER), Some("Bearer stored-token"));
}

#[tokio::test]
async fn corrupted_user_fails_closed() {
    let mock = MockTransport::new();
    let storage = Arc::new(MemoryStorage::new());
    storage.set(keys::TOKEN, "stored-token").await.unwrap();
    storage.set(keys::USER, "{\"userId\": 7, \"role\":").await.unwrap();

    let campus = campus_with_storage(&mock, storage.clone());
    assert!(!campus.bootstrap().await);
    assert!(!campus.auth().is_authenticated().await);
    assert_eq!(storage.get(keys::TOKEN).await.unwrap(), None);
    assert_eq!(storage.get(keys::USER).await.unwrap(), None);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn token_without_user_fails_closed() {
    let mock = MockTransport::new();
    let storage = Arc::new(MemoryStorage::new());
    storage.set(keys::TOKEN, "stored-token").await.unwrap();

    let campus = campus_with_storage(&mock, storage.clone());
    assert!(!campus.bootstrap().await);
    assert_eq!(storage.get(keys::TOKEN).await.unwrap(), None);
}

#[tokio::test]
async fn user_missing_role_fails_closed() {
    let mock = MockTransport::new();
    let storage = Arc::new(MemoryStorage::new());
    storage.set(keys::TOKEN, "stored-token").await.unwrap();
    storage
        .set(keys::USER, r#"{"userId": "u1", "schoolId": "3", "role": "  "}"#)
        .await
        .unwrap();

    let campus = campus_with_storage(&mock, storage.clone());
    assert!(!campus.bootstrap().await);
    assert_eq!(storage.get(keys::USER).await.unwrap(), None);
}

// ── Dashboard ───────────────────────────────────────────────────

#[tokio::test]
async fn one_failing_stat_leaves_the_rest() {
    let mock = MockTransport::new();
    mock.get_json(api::STUDENTS_COUNT, json!(120));
    mock.fail(HttpMethod::Get, api::CLASSES_COUNT, 500, "boom");
    mock.get_json(api::STAFF_COUNT, json!({"count": 12}));
    mock.get_json(api::FEES_COLLECTED, json!({"total": 5000.5}));

    let campus = campus_with(&mock);
    let stats = campus.load_dashboard_stats().await;
    assert_eq!(
        stats,
        DashboardStats {
            students: 120,
            classes: 0,
            staff: 12,
            fees_collected: 5000.5,
        }
    );
}

#[tokio::test]
async fn unknown_role_gets_placeholder_dashboard() {
    let mock = MockTransport::new();
    let campus = campus_with(&mock);
    campus
        .login("tok", fixtures::user("u9", Some("3"), "librarian"))
        .await
        .unwrap();

    assert_eq!(
        campus.dashboard().await,
        Some(DashboardView::NotConfigured {
            role: "librarian".to_string()
        })
    );
}

// ── Logout ──────────────────────────────────────────────────────

#[tokio::test]
async fn logout_clears_storage_and_headers() {
    let mock = MockTransport::new();
    mount_ready_school(&mock, "3", "s1");

    let campus = campus_with(&mock);
    campus.login("tok", fixtures::super_admin()).await.unwrap();
    campus.select_school("3", Some("Hillside")).await.unwrap();
    assert!(!campus.api().decorator_ids().await.is_empty());

    let mut identity = campus.auth().subscribe();
    assert_eq!(campus.logout().await, routes::LOGIN);

    assert!(campus.api().decorator_ids().await.is_empty());
    for key in keys::ALL {
        assert_eq!(campus.storage().get(key).await.unwrap(), None, "{}", key);
    }
    assert!(identity.borrow_and_update().is_none());
    assert_eq!(campus.guard("/students").await, Some(routes::LOGIN));
    assert!(!campus.sessions().has_session().await);
}
