//! API Client
//!
//! Immutable per-client settings: base URL, auth key and transport. Cloning
//! is cheap and every clone shares the same transport.

use super::error::{ApiError, ApiResult};
use super::http::{ReqwestTransport, Transport};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Option key holding the API base URL
pub const BASE_URL_OPTION: &str = "base_url";
/// Option key holding the bearer credential
pub const AUTH_KEY_OPTION: &str = "auth_key";

/// Main API client
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    auth_key: String,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Create a client using the default reqwest transport
    pub fn new(base_url: &str, auth_key: &str) -> ApiResult<Self> {
        let transport = ReqwestTransport::new()?;
        Self::with_transport(base_url, auth_key, Arc::new(transport))
    }

    /// Create a client on top of a caller-supplied transport
    pub fn with_transport(
        base_url: &str,
        auth_key: &str,
        transport: Arc<dyn Transport>,
    ) -> ApiResult<Self> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(ApiError::configuration("base_url must not be empty"));
        }
        let parsed = Url::parse(base_url)
            .map_err(|e| ApiError::configuration(format!("invalid base_url {:?}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::configuration(format!(
                "base_url {:?} must use http or https",
                base_url
            )));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ApiError::configuration(format!(
                "base_url {:?} must not carry a query or fragment",
                base_url
            )));
        }

        if auth_key.trim().is_empty() {
            return Err(ApiError::configuration("auth_key must not be empty"));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_key: auth_key.to_string(),
            transport,
        })
    }

    /// Create a client from a loosely typed options map
    ///
    /// Both `base_url` and `auth_key` must be present and hold strings.
    pub fn from_options(options: &Map<String, Value>) -> ApiResult<Self> {
        let (base_url, auth_key) = read_options(options)?;
        Self::new(base_url, auth_key)
    }

    /// Same as [`ApiClient::from_options`] with an explicit transport
    pub fn from_options_with_transport(
        options: &Map<String, Value>,
        transport: Arc<dyn Transport>,
    ) -> ApiResult<Self> {
        let (base_url, auth_key) = read_options(options)?;
        Self::with_transport(base_url, auth_key, transport)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Value for the `Authorization` header
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.auth_key)
    }

    /// Build the absolute URL for a resource path and encoded query string
    pub fn url_for(&self, path: &str, query: &str) -> ApiResult<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ApiError::configuration(format!("invalid request path {:?}: {}", path, e)))?;
        if !query.is_empty() {
            url.set_query(Some(query));
        }
        Ok(url)
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("auth_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

fn read_options(options: &Map<String, Value>) -> ApiResult<(&str, &str)> {
    let auth_key = string_option(options, AUTH_KEY_OPTION)?;
    let base_url = string_option(options, BASE_URL_OPTION)?;
    Ok((base_url, auth_key))
}

fn string_option<'a>(options: &'a Map<String, Value>, key: &str) -> ApiResult<&'a str> {
    match options.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(ApiError::configuration(format!(
            "{} client options should be a string, {} got",
            key,
            json_type_name(other)
        ))),
        None => Err(ApiError::configuration(format!("{} client option is missing", key))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
