use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    Error, GenericClient, GenericRequestBuilder, GenericResponse, RequestBuilder, Response,
    StatusCode,
};

pub struct ReqwestClient(reqwest::Client);

impl ReqwestClient {
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self(client)
    }
}

impl GenericClient for ReqwestClient {
    fn get(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(ReqwestRequestBuilder(Some(self.0.get(url))))
    }
}

pub struct ReqwestRequestBuilder(Option<reqwest::RequestBuilder>);

#[async_trait]
impl GenericRequestBuilder for ReqwestRequestBuilder {
    fn header(&mut self, name: &str, value: &str) {
        if let Some(builder) = self.0.take() {
            self.0 = Some(builder.header(name, value));
        }
    }

    fn query_param(&mut self, name: &str, value: &str) {
        if let Some(builder) = self.0.take() {
            self.0 = Some(builder.query(&[(name, value)]));
        }
    }

    async fn send(&mut self) -> Result<Response, Error> {
        let builder = self.0.take().ok_or(Error::AlreadySent)?;
        let response = builder.send().await?;
        let status = StatusCode::try_from(response.status().as_u16())?;

        log::trace!("send: status={status} url={}", response.url());

        Ok(Response::new(ReqwestResponse {
            status,
            headers: None,
            inner: Some(response),
        }))
    }
}

pub struct ReqwestResponse {
    status: StatusCode,
    headers: Option<BTreeMap<String, String>>,
    inner: Option<reqwest::Response>,
}

#[async_trait]
impl GenericResponse for ReqwestResponse {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn headers(&mut self) -> &BTreeMap<String, String> {
        let inner = self.inner.as_ref();
        self.headers
            .get_or_insert_with(|| inner.map(|x| headers_to_btree(x.headers())).unwrap_or_default())
    }

    async fn bytes(&mut self) -> Result<Bytes, Error> {
        let response = self.inner.take().ok_or(Error::AlreadySent)?;
        Ok(response.bytes().await?)
    }
}

fn headers_to_btree(value: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    for (key, value) in value {
        if let Ok(value) = value.to_str() {
            headers.insert(key.to_string(), value.to_string());
        }
    }

    headers
}
