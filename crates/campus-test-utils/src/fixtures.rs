// Canned users and backend payloads.

use campus_client::decorator::SCHOOL_HEADER;
use campus_client::routes::api;
use campus_client::User;
use serde_json::{json, Value};

use crate::mock_transport::{MockRoute, MockTransport};

pub fn user(user_id: &str, school_id: Option<&str>, role: &str) -> User {
    User {
        user_id: user_id.to_string(),
        school_id: school_id.map(str::to_string),
        role: role.to_string(),
        name: Some(format!("{} {}", role.to_lowercase(), user_id)),
        email: Some(format!("{}@campus.test", user_id)),
    }
}

pub fn super_admin() -> User {
    user("u-root", None, "SUPER_ADMIN")
}

pub fn school_admin(school_id: &str) -> User {
    user("u-admin", Some(school_id), "SCHOOL_ADMIN")
}

pub fn teacher(school_id: &str) -> User {
    user("u-teacher", Some(school_id), "TEACHER")
}

pub fn accountant(school_id: &str) -> User {
    user("u-accounts", Some(school_id), "ACCOUNTANT")
}

pub fn school_json(id: &str, name: &str, active: bool) -> Value {
    json!({ "id": id, "name": name, "active": active })
}

pub fn session_json(id: &str, name: &str, school_id: &str, active: bool) -> Value {
    json!({ "id": id, "name": name, "schoolId": school_id, "active": active })
}

pub fn subscription_json(status: &str) -> Value {
    json!({
        "status": status,
        "activeStudents": 120,
        "studentCap": 500,
        "expiresAt": "2099-01-01T00:00:00Z",
        "plan": { "name": "Standard" }
    })
}

pub fn login_json(token: &str, user: &User) -> Value {
    json!({ "token": token, "user": user })
}

/// Mount a school with one active session, some classes and an active
/// subscription, all scoped by the `X-School-Id` header.
pub fn mount_ready_school(mock: &MockTransport, school_id: &str, session_id: &str) {
    let scoped = |route: MockRoute| route.when_header(SCHOOL_HEADER, school_id);

    mock.mount(scoped(
        MockRoute::get(api::school(school_id)).respond(200, school_json(school_id, "Hillside", true)),
    ));
    mock.mount(scoped(MockRoute::get(api::SESSIONS).respond(
        200,
        json!({ "content": [session_json(session_id, "2025/26", school_id, true)] }),
    )));
    mock.mount(scoped(
        MockRoute::get(api::ACTIVE_SESSION).respond(200, json!({ "id": session_id, "name": "2025/26" })),
    ));
    mock.mount(scoped(MockRoute::get(api::CLASSES_COUNT).respond(200, json!({ "count": 4 }))));
    mock.mount(scoped(
        MockRoute::get(api::SUBSCRIPTION_STATUS).respond(200, subscription_json("ACTIVE")),
    ));
}

/// Mount a school that exists but has no academic session and no classes.
pub fn mount_empty_school(mock: &MockTransport, school_id: &str) {
    let scoped = |route: MockRoute| route.when_header(SCHOOL_HEADER, school_id);

    mock.mount(scoped(
        MockRoute::get(api::school(school_id)).respond(200, school_json(school_id, "Riverside", true)),
    ));
    mock.mount(scoped(MockRoute::get(api::SESSIONS).respond(200, json!([]))));
    mock.mount(scoped(
        MockRoute::get(api::ACTIVE_SESSION).respond(404, json!({ "message": "No active session" })),
    ));
    mock.mount(scoped(MockRoute::get(api::CLASSES_COUNT).respond(200, json!(0))));
    mock.mount(scoped(
        MockRoute::get(api::SUBSCRIPTION_STATUS).respond(200, subscription_json("TRIAL")),
    ));
}
