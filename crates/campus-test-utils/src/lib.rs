// campus-test-utils
//
// Test support for the Campus client:
// - `MockTransport`: scripted responses keyed by method, path and an
//   optional header, with every request recorded
// - `fixtures`: users and backend payloads
// - `campus_with`: a `Campus` wired to a mock and in-memory storage

pub mod fixtures;
pub mod mock_transport;

pub use mock_transport::{MockRoute, MockTransport};

use std::sync::Arc;

use campus_client::storage::{ClientStorage, MemoryStorage};
use campus_client::{Campus, ClientOptions};

/// A client over `mock` with fresh in-memory storage.
pub fn campus_with(mock: &MockTransport) -> Campus {
    campus_with_storage(mock, Arc::new(MemoryStorage::new()))
}

pub fn campus_with_storage(mock: &MockTransport, storage: Arc<dyn ClientStorage>) -> Campus {
    Campus::with_transport(
        ClientOptions {
            base_url: "http://campus.test".to_string(),
            ..ClientOptions::default()
        },
        Arc::new(mock.clone()),
        storage,
    )
}
