//! Mock API server helpers
//!
//! Every test gets its own `wiremock` server and a client whose storage it
//! can inspect.

use std::sync::Arc;

use bizdesk::desk_app::storage::keys;
use bizdesk::desk_app::{ApiClient, Config, MemoryStorage, Storage};
use bizdesk::shared::AppConfig;
use wiremock::{MockServer, Request};

/// Client wired to a mock server
pub struct TestApi {
    pub server: MockServer,
    pub storage: Arc<MemoryStorage>,
    pub client: ApiClient,
}

impl TestApi {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let storage = Arc::new(MemoryStorage::new());
        let client = client_for(&server.uri(), storage.clone());
        Self {
            server,
            storage,
            client,
        }
    }

    /// Same as `start`, with a bearer token already persisted
    pub async fn signed_in(token: &str) -> Self {
        let api = Self::start().await;
        api.storage
            .set_item(keys::TOKEN, token)
            .expect("token should persist");
        api
    }

    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}

pub fn client_for(server_url: &str, storage: Arc<MemoryStorage>) -> ApiClient {
    let config = Config::with_builder(AppConfig::builder().server_url(server_url))
        .expect("mock server url is valid");
    ApiClient::new(config, storage)
}

/// `Authorization` header of a recorded request
pub fn authorization(request: &Request) -> Option<String> {
    request
        .headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub fn body_text(request: &Request) -> String {
    String::from_utf8_lossy(&request.body).into_owned()
}
