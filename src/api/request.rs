//! Generic API request
//!
//! A [`Request`] describes one endpoint call: method, rendered path, optional
//! JSON body of type `B`, query parameters, extra headers and retry policy.
//! `R` is the type the response body decodes into. Builder methods consume
//! the request and return the updated value, so a prepared request can be
//! cloned and dispatched from several tasks without synchronization.

use super::client::ApiClient;
use super::decode::{decode_json, Ignored};
use super::error::{ApiError, ApiResult};
use super::executor::{self, RetryPolicy};
use super::http::{HttpRequest, Method, RawResponse};
use super::query::{FilteringField, QueryParams};
use bytes::Bytes;
use reqwest::header::{HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Substitute `{}` placeholders in `template` with percent-encoded ids
///
/// Placeholders are filled left to right; surplus ids are ignored.
pub fn render_path(template: &str, ids: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + ids.iter().map(|s| s.len()).sum::<usize>());
    let mut ids = ids.iter();
    let mut rest = template;

    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        match ids.next() {
            Some(id) => out.push_str(&urlencoding::encode(id)),
            None => out.push_str("{}"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

fn check_header(name: &str, value: &str) -> ApiResult<()> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_| ApiError::InvalidRequest {
        message: format!("invalid header name {:?}", name),
    })?;
    HeaderValue::from_str(value).map_err(|_| ApiError::InvalidRequest {
        message: format!("invalid value for header {:?}", name),
    })?;
    Ok(())
}

/// One endpoint call
pub struct Request<B = (), R = Ignored> {
    method: Method,
    path: String,
    body: Option<B>,
    query: QueryParams,
    headers: Vec<(String, String)>,
    retry: RetryPolicy,
    response: PhantomData<fn() -> R>,
}

impl<R> Request<(), R> {
    /// Request without a body
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: QueryParams::new(),
            headers: Vec::new(),
            retry: RetryPolicy::default(),
            response: PhantomData,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }
}

impl<B, R> Request<B, R> {
    /// Attach a JSON body, changing the body type
    pub fn with_body<T>(self, body: T) -> Request<T, R> {
        Request {
            method: self.method,
            path: self.path,
            body: Some(body),
            query: self.query,
            headers: self.headers,
            retry: self.retry,
            response: PhantomData,
        }
    }

    /// Add `{name}__{condition}={value}`; unsupported conditions are ignored
    pub fn filter_by(mut self, field: FilteringField) -> Self {
        self.query.filter_by(&field);
        self
    }

    /// Like [`Request::filter_by`] but unsupported conditions are an error
    pub fn try_filter_by(mut self, field: FilteringField) -> ApiResult<Self> {
        self.query.try_filter_by(&field)?;
        Ok(self)
    }

    /// Append an `order` directive (`-name` sorts descending)
    pub fn order_by(mut self, name: impl Into<String>) -> Self {
        self.query.order_by(name);
        self
    }

    /// Set a query parameter, replacing any previous value for the key
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.set(key, value.to_string());
        self
    }

    /// Extra header sent with every attempt
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Total number of attempts and the pause between them
    pub fn with_retry(self, attempts: u32, delay: Duration) -> Self {
        self.with_retry_policy(RetryPolicy::new(attempts, delay))
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }
}

impl<B: Serialize, R> Request<B, R> {
    /// Resolve URL, headers and body against a client
    pub fn prepare(&self, client: &ApiClient) -> ApiResult<HttpRequest> {
        let body = match &self.body {
            Some(body) => Some(Bytes::from(serde_json::to_vec(body).map_err(|e| {
                ApiError::Serialization {
                    message: e.to_string(),
                }
            })?)),
            None => None,
        };

        let url = client.url_for(&self.path, &self.query.encode())?;

        let mut headers = Vec::with_capacity(self.headers.len() + 3);
        headers.push(("Authorization".to_string(), client.bearer()));
        headers.push(("Accept".to_string(), "application/json".to_string()));
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        headers.extend(self.headers.iter().cloned());

        for (name, value) in &headers {
            check_header(name, value)?;
        }

        Ok(HttpRequest {
            method: self.method,
            url,
            headers,
            body,
        })
    }

    /// Dispatch with retry and return the raw successful response
    pub async fn send_raw(
        &self,
        client: &ApiClient,
        cancel: &CancellationToken,
    ) -> ApiResult<RawResponse> {
        let request = self.prepare(client)?;
        executor::execute(client, &request, self.retry, cancel).await
    }
}

impl<B: Serialize, R: DeserializeOwned> Request<B, R> {
    /// Dispatch and decode the response body
    pub async fn send(&self, client: &ApiClient) -> ApiResult<R> {
        self.send_with_cancel(client, &CancellationToken::new()).await
    }

    pub async fn send_with_cancel(
        &self,
        client: &ApiClient,
        cancel: &CancellationToken,
    ) -> ApiResult<R> {
        let response = self.send_raw(client, cancel).await?;
        decode_json(&response)
    }
}

impl<B: Clone, R> Clone for Request<B, R> {
    fn clone(&self) -> Self {
        Self {
            method: self.method,
            path: self.path.clone(),
            body: self.body.clone(),
            query: self.query.clone(),
            headers: self.headers.clone(),
            retry: self.retry,
            response: PhantomData,
        }
    }
}

impl<B: fmt::Debug, R> fmt::Debug for Request<B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("body", &self.body)
            .field("query", &self.query)
            .field("headers", &self.headers)
            .field("retry", &self.retry)
            .finish()
    }
}
