#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Client for the [JSONPlaceholder](https://jsonplaceholder.typicode.com) posts API.
//!
//! Both operations wait for a configurable simulated delay before issuing a
//! single request, so callers can exercise slow-network behavior against a
//! fast fixture service. There are no retries, caching or partial results:
//! a failure at any step fails the whole call and is logged before it is
//! returned.
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), placeholder_posts::Error> {
//! use std::time::Duration;
//!
//! let items = placeholder_posts::get_items(Some(5), Some(Duration::ZERO)).await?;
//! let item = placeholder_posts::get_item_by_id(items[0].id, None).await?;
//! # Ok(())
//! # }
//! ```

pub mod models;

use std::{sync::LazyLock, time::Duration};

use placeholder_http::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use models::Item;

pub static JSONPLACEHOLDER_ORIGIN: &str = "https://jsonplaceholder.typicode.com";

pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_ITEMS_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_ITEM_DELAY: Duration = Duration::from_millis(1000);

static CLIENT: LazyLock<PostsClient> = LazyLock::new(PostsClient::new);

#[derive(Debug, Error)]
pub enum Error {
    /// The origin answered with a non-success status.
    #[error("HTTP error! status: {0}")]
    Status(StatusCode),
    /// The request could not be completed.
    #[error(transparent)]
    Transport(#[from] placeholder_http::Error),
    /// The body was not valid JSON for the expected shape.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
    #[error("Requested item {requested} but received item {received}")]
    UnexpectedItem { requested: u64, received: u64 },
    #[error("Invalid limit {0}: must be positive")]
    InvalidLimit(u32),
}

impl Error {
    /// The status the origin answered with, if this is a status failure.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status(status) => Some(*status),
            _ => None,
        }
    }
}

async fn delay(duration: Duration) {
    if duration.is_zero() {
        return;
    }

    tokio::time::sleep(duration).await;
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let status = response.status();

    log::debug!("Received response status: {status}");

    if !status.is_success() {
        return Err(Error::Status(status));
    }

    let bytes = response.bytes().await?;

    Ok(serde_json::from_slice(&bytes)?)
}

/// Handle to a posts origin.
///
/// Holds no mutable state, so clones and concurrent calls never interact.
#[derive(Clone)]
pub struct PostsClient {
    origin: String,
    http: Client,
}

impl Default for PostsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PostsClient {
    /// Client for [`JSONPLACEHOLDER_ORIGIN`] over the network.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> PostsClientBuilder {
        PostsClientBuilder::default()
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Fetches up to `limit` items (default [`DEFAULT_LIMIT`]) after waiting
    /// `simulate_delay` (default [`DEFAULT_ITEMS_DELAY`]).
    ///
    /// # Errors
    ///
    /// * `Error::InvalidLimit` if `limit` is zero
    /// * `Error::Status` if the origin responds with a non-success status
    /// * `Error::Transport` if the request could not be completed
    /// * `Error::Decode` if the body is not a JSON array of items
    pub async fn get_items(
        &self,
        limit: Option<u32>,
        simulate_delay: Option<Duration>,
    ) -> Result<Vec<Item>, Error> {
        self.fetch_items(
            limit.unwrap_or(DEFAULT_LIMIT),
            simulate_delay.unwrap_or(DEFAULT_ITEMS_DELAY),
        )
        .await
        .inspect_err(|e| log::error!("Failed to fetch items: {e:?}"))
    }

    /// Fetches the item `id` after waiting `simulate_delay` (default
    /// [`DEFAULT_ITEM_DELAY`]). Unknown ids are reported by the origin, not
    /// checked locally.
    ///
    /// # Errors
    ///
    /// * `Error::Status` if the origin responds with a non-success status
    /// * `Error::Transport` if the request could not be completed
    /// * `Error::Decode` if the body is not a JSON item
    /// * `Error::UnexpectedItem` if the decoded item has a different id
    pub async fn get_item_by_id(
        &self,
        id: u64,
        simulate_delay: Option<Duration>,
    ) -> Result<Item, Error> {
        self.fetch_item(id, simulate_delay.unwrap_or(DEFAULT_ITEM_DELAY))
            .await
            .inspect_err(|e| log::error!("Failed to fetch item with ID {id}: {e:?}"))
    }

    async fn fetch_items(&self, limit: u32, simulate_delay: Duration) -> Result<Vec<Item>, Error> {
        if limit == 0 {
            return Err(Error::InvalidLimit(limit));
        }

        delay(simulate_delay).await;

        let url = format!("{}/posts", self.origin);

        log::debug!("get_items: limit={limit} url={url}");

        let response = self
            .http
            .get(&url)
            .query_param("_limit", &limit.to_string())
            .send()
            .await?;

        let items: Vec<Item> = decode(response).await?;

        log::trace!("Received items response: {items:?}");

        Ok(items)
    }

    async fn fetch_item(&self, id: u64, simulate_delay: Duration) -> Result<Item, Error> {
        delay(simulate_delay).await;

        let url = format!("{}/posts/{id}", self.origin);

        log::debug!("get_item_by_id: id={id} url={url}");

        let response = self.http.get(&url).send().await?;
        let item: Item = decode(response).await?;

        log::trace!("Received item response: {item:?}");

        if item.id != id {
            return Err(Error::UnexpectedItem {
                requested: id,
                received: item.id,
            });
        }

        Ok(item)
    }
}

#[derive(Default)]
pub struct PostsClientBuilder {
    origin: Option<String>,
    http: Option<Client>,
}

impl PostsClientBuilder {
    /// Base address requests are made against. Trailing slashes are ignored.
    #[must_use]
    pub fn with_origin<T: Into<String>>(mut self, origin: T) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn origin<T: Into<String>>(&mut self, origin: T) -> &mut Self {
        self.origin = Some(origin.into());
        self
    }

    #[must_use]
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn http_client(&mut self, http: Client) -> &mut Self {
        self.http = Some(http);
        self
    }

    #[must_use]
    pub fn build(self) -> PostsClient {
        let origin = self
            .origin
            .as_deref()
            .unwrap_or(JSONPLACEHOLDER_ORIGIN)
            .trim_end_matches('/')
            .to_string();

        PostsClient {
            origin,
            http: self.http.unwrap_or_default(),
        }
    }
}

/// [`PostsClient::get_items`] against the default origin.
///
/// # Errors
///
/// * If [`PostsClient::get_items`] fails
pub async fn get_items(
    limit: Option<u32>,
    simulate_delay: Option<Duration>,
) -> Result<Vec<Item>, Error> {
    CLIENT.get_items(limit, simulate_delay).await
}

/// [`PostsClient::get_item_by_id`] against the default origin.
///
/// # Errors
///
/// * If [`PostsClient::get_item_by_id`] fails
pub async fn get_item_by_id(id: u64, simulate_delay: Option<Duration>) -> Result<Item, Error> {
    CLIENT.get_item_by_id(id, simulate_delay).await
}
