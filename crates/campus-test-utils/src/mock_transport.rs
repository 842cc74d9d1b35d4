// Scripted in-memory transport.
//
// Routes are matched on method and path, optionally narrowed by a request
// header (typically `X-School-Id`) so one mock can serve several tenants.
// Every request is recorded after decoration, exactly as it would hit the
// wire.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use campus_client::transport::HttpMethod;
use campus_client::{ApiRequest, ApiResponse, ClientError, Transport};
use serde_json::Value;

/// One scripted response.
#[derive(Debug, Clone)]
pub struct MockRoute {
    method: HttpMethod,
    path: String,
    header: Option<(String, String)>,
    status: u16,
    body: String,
    delay: Option<Duration>,
}

impl MockRoute {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            header: None,
            status: 200,
            body: "null".to_string(),
            delay: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Only match requests carrying `name: value`.
    pub fn when_header(mut self, name: &str, value: &str) -> Self {
        self.header = Some((name.to_string(), value.to_string()));
        self
    }

    pub fn respond(mut self, status: u16, body: Value) -> Self {
        self.status = status;
        self.body = body.to_string();
        self
    }

    pub fn respond_raw(mut self, status: u16, body: &str) -> Self {
        self.status = status;
        self.body = body.to_string();
        self
    }

    /// Hold the response back for `delay`.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn same_slot(&self, other: &MockRoute) -> bool {
        self.method == other.method && self.path == other.path && self.header == other.header
    }

    fn matches(&self, request: &ApiRequest) -> bool {
        if self.method != request.method || self.path != request.path {
            return false;
        }
        match &self.header {
            Some((name, value)) => request.header(name) == Some(value.as_str()),
            None => true,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct MockTransport {
    routes: Arc<Mutex<Vec<MockRoute>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a route, replacing one with the same method, path and header.
    pub fn mount(&self, route: MockRoute) -> &Self {
        let mut routes = lock(&self.routes);
        routes.retain(|r| !r.same_slot(&route));
        routes.push(route);
        self
    }

    pub fn get_json(&self, path: &str, body: Value) -> &Self {
        self.mount(MockRoute::get(path).respond(200, body))
    }

    pub fn post_json(&self, path: &str, body: Value) -> &Self {
        self.mount(MockRoute::post(path).respond(200, body))
    }

    pub fn put_json(&self, path: &str, body: Value) -> &Self {
        self.mount(MockRoute::put(path).respond(200, body))
    }

    /// Answer `method path` with `status` and `{"message": message}`.
    pub fn fail(&self, method: HttpMethod, path: &str, status: u16, message: &str) -> &Self {
        self.mount(MockRoute::new(method, path).respond(status, serde_json::json!({ "message": message })))
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        lock(&self.requests)
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn last_request_to(&self, path: &str) -> Option<ApiRequest> {
        self.requests_to(path).pop()
    }

    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    fn find(&self, request: &ApiRequest) -> Option<MockRoute> {
        let routes = lock(&self.routes);
        let candidates = routes.iter().rev().filter(|r| r.matches(request));
        // Header-specific routes beat catch-alls.
        let mut fallback = None;
        for route in candidates {
            if route.header.is_some() {
                return Some(route.clone());
            }
            fallback.get_or_insert_with(|| route.clone());
        }
        fallback
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, _base_url: &str, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        lock(&self.requests).push(request.clone());

        let Some(route) = self.find(&request) else {
            let message = format!("No mock for {} {}", request.method, request.path);
            return Ok(ApiResponse::new(404, serde_json::json!({ "message": message }).to_string()));
        };

        if let Some(delay) = route.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(ApiResponse::new(route.status, route.body))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
