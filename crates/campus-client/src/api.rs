//! API client: decorator chain in front of a [`Transport`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::decorator::{DecoratorChain, RequestDecorator};
use crate::error::ClientError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Async client for the Campus REST backend.
///
/// Cheap to clone; clones share the transport and the decorator chain, so a
/// header installed through one clone is seen by every other.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    decorators: Arc<RwLock<DecoratorChain>>,
}

impl ApiClient {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            decorators: Arc::new(RwLock::new(DecoratorChain::new())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Install a decorator, replacing any decorator with the same id.
    pub async fn install(&self, decorator: Arc<dyn RequestDecorator>) {
        tracing::debug!(decorator = decorator.id(), "installing request decorator");
        self.decorators.write().await.install(decorator);
    }

    /// Remove a decorator by id.
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.decorators.write().await.remove(id);
        if removed {
            tracing::debug!(decorator = id, "removed request decorator");
        }
        removed
    }

    pub async fn has_decorator(&self, id: &str) -> bool {
        self.decorators.read().await.contains(id)
    }

    pub async fn decorator_ids(&self) -> Vec<String> {
        self.decorators.read().await.ids()
    }

    /// Decorate, send, and decode a request.
    pub async fn execute<T: DeserializeOwned>(&self, mut request: ApiRequest) -> Result<T, ClientError> {
        self.decorators.read().await.apply(&mut request);
        tracing::debug!(method = %request.method, path = %request.path, "sending request");

        let resp = self.transport.send(&self.base_url, request).await?;
        Self::handle_response(resp)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(ApiRequest::get(path)).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_value(body).map_err(|e| ClientError::Encoding(e.to_string()))?;
        self.execute(ApiRequest::post(path, body)).await
    }

    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(ApiRequest::put(path)).await
    }

    /// Map a raw response to a decoded value or a typed error.
    fn handle_response<T: DeserializeOwned>(resp: ApiResponse) -> Result<T, ClientError> {
        if !resp.is_success() {
            return Err(ClientError::from_status(resp.status, &resp.body));
        }

        let body = resp.body;
        if body.trim().is_empty() || body == "null" {
            // Lets `Option<T>` and `()` targets accept 204s and null bodies
            return serde_json::from_str("null")
                .map_err(|e| ClientError::Deserialization(format!("Empty response: {}", e)));
        }
        serde_json::from_str(&body).map_err(|e| {
            ClientError::Deserialization(format!(
                "Failed to deserialize response: {} (body: {})",
                e,
                if body.len() > 200 {
                    format!("{}...", body.chars().take(200).collect::<String>())
                } else {
                    body.clone()
                }
            ))
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("transport", &self.transport)
            .finish()
    }
}
