#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Minimal HTTP transport used by the placeholder clients.
//!
//! The crate exposes backend-agnostic [`Client`], [`RequestBuilder`] and
//! [`Response`] types. Concrete backends implement the `Generic*` traits:
//!
//! * `reqwest` (feature `reqwest`) talks to the real network
//! * `simulator` (feature `simulator`) answers from an in-process route table

use std::{collections::BTreeMap, num::NonZeroU16, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[cfg(feature = "reqwest")]
pub mod reqwest;

#[cfg(feature = "simulator")]
pub mod simulator;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid status code: {0}")]
    InvalidStatusCode(u16),

    #[error("Request was already sent")]
    AlreadySent,

    #[error("Simulated transport failure: {0}")]
    Simulated(String),

    #[cfg(feature = "json")]
    #[error(transparent)]
    Deserialize(#[from] serde_json::Error),

    #[cfg(feature = "reqwest")]
    #[error(transparent)]
    Reqwest(#[from] ::reqwest::Error),
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusCode(NonZeroU16);

impl StatusCode {
    pub const OK: Self = Self(NonZeroU16::new(200).unwrap());
    pub const NOT_FOUND: Self = Self(NonZeroU16::new(404).unwrap());
    pub const INTERNAL_SERVER_ERROR: Self = Self(NonZeroU16::new(500).unwrap());

    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0.get()
    }

    /// Check if status is within 200-299.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0.get())
    }

    /// Check if status is within 400-499.
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0.get())
    }

    /// Check if status is within 500-599.
    #[inline]
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0.get())
    }
}

impl TryFrom<u16> for StatusCode {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        NonZeroU16::new(value)
            .map(Self)
            .ok_or(Error::InvalidStatusCode(value))
    }
}

impl From<StatusCode> for u16 {
    fn from(value: StatusCode) -> Self {
        value.0.get()
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.get())
    }
}

impl std::fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StatusCode({})", self.0.get())
    }
}

#[async_trait]
pub trait GenericRequestBuilder: Send + Sync {
    fn header(&mut self, name: &str, value: &str);
    fn query_param(&mut self, name: &str, value: &str);
    async fn send(&mut self) -> Result<Response, Error>;
}

pub trait GenericClient: Send + Sync {
    fn get(&self, url: &str) -> RequestBuilder;
}

#[async_trait]
pub trait GenericResponse: Send + Sync {
    fn status(&self) -> StatusCode;
    fn headers(&mut self) -> &BTreeMap<String, String>;
    async fn bytes(&mut self) -> Result<Bytes, Error>;

    async fn text(&mut self) -> Result<String, Error> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub struct RequestBuilder {
    builder: Box<dyn GenericRequestBuilder>,
}

impl RequestBuilder {
    #[must_use]
    pub fn new(builder: impl GenericRequestBuilder + 'static) -> Self {
        Self {
            builder: Box::new(builder),
        }
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.builder.header(name, value);
        self
    }

    #[must_use]
    pub fn query_param(mut self, name: &str, value: &str) -> Self {
        self.builder.query_param(name, value);
        self
    }

    /// # Errors
    ///
    /// * If there was an error while sending request, redirect loop was
    ///   detected or redirect limit was exhausted.
    pub async fn send(mut self) -> Result<Response, Error> {
        self.builder.send().await
    }
}

pub struct Response {
    inner: Box<dyn GenericResponse>,
}

impl Response {
    #[must_use]
    pub fn new(inner: impl GenericResponse + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    #[must_use]
    pub fn headers(&mut self) -> &BTreeMap<String, String> {
        self.inner.headers()
    }

    /// # Errors
    ///
    /// * If the text response fails
    pub async fn text(mut self) -> Result<String, Error> {
        self.inner.text().await
    }

    /// # Errors
    ///
    /// * If the bytes response fails
    pub async fn bytes(mut self) -> Result<Bytes, Error> {
        self.inner.bytes().await
    }

    /// # Errors
    ///
    /// * If the bytes response fails
    /// * If the body is not valid JSON for `T`
    #[cfg(feature = "json")]
    pub async fn json<T: serde::de::DeserializeOwned>(mut self) -> Result<T, Error> {
        let bytes = self.inner.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Cheaply cloneable handle over a shared backend.
#[derive(Clone)]
pub struct Client {
    inner: Arc<dyn GenericClient>,
}

impl Client {
    #[must_use]
    pub fn from_backend(backend: impl GenericClient + 'static) -> Self {
        Self {
            inner: Arc::new(backend),
        }
    }

    #[must_use]
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.inner.get(url)
    }
}

#[cfg(feature = "reqwest")]
impl Client {
    /// Builds a client backed by a default `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// * If the underlying `reqwest::Client` fails to build
    pub fn try_new() -> Result<Self, Error> {
        Ok(Self::from_backend(reqwest::ReqwestClient::new(
            ::reqwest::Client::builder().build()?,
        )))
    }

    /// Builds a client backed by a default `reqwest::Client`.
    ///
    /// # Panics
    ///
    /// * If the TLS backend cannot be initialized
    #[must_use]
    pub fn new() -> Self {
        Self::from_backend(reqwest::ReqwestClient::new(::reqwest::Client::new()))
    }
}

#[cfg(feature = "reqwest")]
impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Appends `params` to `url` as a `form_urlencoded` query string.
#[must_use]
pub fn url_with_query(url: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }

    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();

    let separator = if url.contains('?') { '&' } else { '?' };

    format!("{url}{separator}{query}")
}
