//! Response decoding
//!
//! Turns a [`RawResponse`] into a typed value. Shared envelope types used by
//! the endpoints live here as well.

use super::error::{ApiError, ApiResult};
use super::http::RawResponse;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Decode target for responses whose body carries nothing of interest
pub type Ignored = serde::de::IgnoredAny;

/// Decode a response body as JSON
///
/// Non-2xx responses are reported as [`ApiError::Status`] without looking at
/// the body. An empty success body is decoded as `null`.
pub fn decode_json<R: DeserializeOwned>(response: &RawResponse) -> ApiResult<R> {
    if !response.is_success() {
        return Err(ApiError::from_status(response.status));
    }

    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &response.body[..]
    };

    serde_json::from_slice(body).map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })
}

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    /// Total number of items across all pages
    #[serde(default)]
    pub count: u64,
    /// Items of this page
    #[serde(default = "Vec::new", alias = "result", deserialize_with = "null_as_empty")]
    pub results: Vec<T>,
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        Self {
            count: 0,
            results: Vec::new(),
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope for single-object responses: `{"result": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultResponse<T> {
    pub result: T,
}

/// Identifier of a freshly created resource
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdResult {
    pub id: String,
}

/// Response of create endpoints: `{"result": {"id": "..."}}`
pub type Created = ResultResponse<IdResult>;
