//! In-process HTTP backend that answers from a route table.
//!
//! Routes are keyed by the full request URL, including the query string as
//! serialized by [`crate::url_with_query`]. Requests to unknown routes answer
//! `404 Not Found` with an empty body. Every sent URL is recorded, in send
//! order, so callers can assert what went over the "wire". Request headers
//! are accepted and ignored; routes never match on them.
//!
//! This module is only available when the `simulator` feature is enabled.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, PoisonError, RwLock},
};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    Error, GenericClient, GenericRequestBuilder, GenericResponse, RequestBuilder, Response,
    StatusCode,
};

#[derive(Debug, Clone)]
enum Route {
    Respond { status: StatusCode, body: Bytes },
    FailTransport,
}

#[derive(Default)]
struct State {
    routes: RwLock<BTreeMap<String, Route>>,
    requests: Mutex<Vec<String>>,
}

/// Simulator HTTP client.
///
/// Clones share the same route table and request log.
#[derive(Default, Clone)]
pub struct SimulatorClient {
    state: Arc<State>,
}

impl SimulatorClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a canned response for `url`.
    #[must_use]
    pub fn route(self, url: &str, status: StatusCode, body: impl Into<Bytes>) -> Self {
        self.insert(
            url,
            Route::Respond {
                status,
                body: body.into(),
            },
        );
        self
    }

    /// Registers a `200 OK` response with `value` serialized as the JSON body.
    ///
    /// # Errors
    ///
    /// * If `value` fails to serialize
    #[cfg(feature = "json")]
    pub fn route_json<T: serde::Serialize + ?Sized>(
        self,
        url: &str,
        value: &T,
    ) -> Result<Self, Error> {
        let body = serde_json::to_vec(value)?;
        Ok(self.route(url, StatusCode::OK, body))
    }

    /// Makes every request to `url` fail before any response is produced.
    #[must_use]
    pub fn fail_transport(self, url: &str) -> Self {
        self.insert(url, Route::FailTransport);
        self
    }

    /// URLs sent through this client so far, in send order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn insert(&self, url: &str, route: Route) {
        self.state
            .routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string(), route);
    }

    fn resolve(&self, url: &str) -> Option<Route> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        self.state
            .routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }
}

impl GenericClient for SimulatorClient {
    fn get(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(SimulatorRequestBuilder {
            client: self.clone(),
            url: url.to_string(),
            query: vec![],
            sent: false,
        })
    }
}

pub struct SimulatorRequestBuilder {
    client: SimulatorClient,
    url: String,
    query: Vec<(String, String)>,
    sent: bool,
}

#[async_trait]
impl GenericRequestBuilder for SimulatorRequestBuilder {
    fn header(&mut self, _name: &str, _value: &str) {}

    fn query_param(&mut self, name: &str, value: &str) {
        self.query.push((name.to_string(), value.to_string()));
    }

    async fn send(&mut self) -> Result<Response, Error> {
        if self.sent {
            return Err(Error::AlreadySent);
        }
        self.sent = true;

        let url = crate::url_with_query(&self.url, &self.query);

        log::debug!("send: simulated GET {url}");

        match self.client.resolve(&url) {
            Some(Route::Respond { status, body }) => Ok(Response::new(SimulatorResponse {
                status,
                headers: BTreeMap::new(),
                body: Some(body),
            })),
            Some(Route::FailTransport) => Err(Error::Simulated(url)),
            None => Ok(Response::new(SimulatorResponse {
                status: StatusCode::NOT_FOUND,
                headers: BTreeMap::new(),
                body: Some(Bytes::new()),
            })),
        }
    }
}

pub struct SimulatorResponse {
    status: StatusCode,
    headers: BTreeMap<String, String>,
    body: Option<Bytes>,
}

#[async_trait]
impl GenericResponse for SimulatorResponse {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn headers(&mut self) -> &BTreeMap<String, String> {
        &self.headers
    }

    async fn bytes(&mut self) -> Result<Bytes, Error> {
        self.body.take().ok_or(Error::AlreadySent)
    }
}
