//! Scripted transport for unit tests.
//!
//! Responses are queued per `(method, path)`. The last queued response for a
//! route is sticky so pollers can tick any number of times. Unscripted routes
//! answer 404. Every request is recorded in arrival order.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use reqwest::Method;
use serde_json::Value;

use super::api::ApiClient;
use super::transport::{ApiRequest, ApiResponse, Transport};
use super::types::ApiError;
use crate::session::SessionStore;

type Route = (Method, String);

#[derive(Default)]
pub(crate) struct MockTransport {
    routes: Mutex<HashMap<Route, VecDeque<Result<ApiResponse, ApiError>>>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.push(method, path, Ok(ApiResponse { status, body: body.to_string() }));
    }

    pub(crate) fn fail(&self, method: Method, path: &str, error: ApiError) {
        self.push(method, path, Err(error));
    }

    fn push(&self, method: Method, path: &str, outcome: Result<ApiResponse, ApiError>) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(outcome);
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    /// Recorded calls rendered as `"GET /channels"`.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    pub(crate) fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let key = (request.method.clone(), request.path.clone());
        self.log.lock().unwrap().push(request);

        let mut routes = self.routes.lock().unwrap();
        let Some(queue) = routes.get_mut(&key) else {
            return Ok(ApiResponse { status: 404, body: "{}".into() });
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }
}

/// An `ApiClient` over `mock`, logged in as `token` when given.
pub(crate) fn client(mock: &Arc<MockTransport>, token: Option<&str>) -> ApiClient {
    let session = SessionStore::in_memory();
    if let Some(token) = token {
        session.set_token(token).unwrap();
    }
    ApiClient::new(mock.clone(), session)
}
