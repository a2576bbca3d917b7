use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    routing::get,
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;

use resupply_api::{
    config::AppConfig,
    events::{self, EventSender},
    handlers::AppServices,
    store::JsonStore,
    AppState,
};

/// Helper harness for spinning up an application state backed by a fresh
/// temporary data directory, seeded with the built-in sample data.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _data_dir: TempDir,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh storage state.
    pub async fn new() -> Self {
        let data_dir = TempDir::new().expect("create temp data dir");

        let cfg = AppConfig::new("127.0.0.1", 13_001, "test");

        let store = Arc::new(
            JsonStore::open(data_dir.path())
                .await
                .expect("open test store"),
        );

        let (event_tx, event_rx) = mpsc::channel(cfg.event_channel_capacity);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(store.clone(), event_sender.clone(), &cfg);

        let state = AppState {
            store,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", resupply_api::api_v1_routes())
            .route(
                "/printable-order/:order_id",
                get(resupply_api::handlers::documents::printable_order),
            )
            .with_state(state.clone());

        Self {
            router,
            state,
            _data_dir: data_dir,
            _event_task: event_task,
        }
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

/// Decode a JSON response body.
pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}
