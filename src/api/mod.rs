//! Request-execution framework
//!
//! Everything an endpoint call goes through: building the query string,
//! authenticated dispatch with retry, decoding, and pagination.
//!
//! # Module Structure
//!
//! - [`client`] - Immutable client configuration (base URL, auth key, transport)
//! - [`http`] - Plain-data HTTP request/response types and the transport trait
//! - [`query`] - Query parameters, filter and order directives
//! - [`executor`] - Retry loop around the transport
//! - [`decode`] - JSON decoding and shared response envelopes
//! - [`request`] - Generic endpoint request
//! - [`paginate`] - Offset/limit paginator
//!
//! # Example
//!
//! ```ignore
//! use cloapi::api::{ApiClient, Paginator, PaginatorOptions};
//! use cloapi::resource::servers;
//!
//! async fn example() -> cloapi::api::ApiResult<()> {
//!     let client = ApiClient::new("https://api.example.com", "secret")?;
//!     let request = servers::list("project-id").order_by("-created");
//!     let mut pages = Paginator::new(&client, request, PaginatorOptions::new(50))?;
//!     while !pages.is_last_page() {
//!         let page = pages.next_page().await?;
//!         println!("{} servers", page.results.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod decode;
pub mod error;
pub mod executor;
pub mod http;
pub mod paginate;
pub mod query;
pub mod request;

pub use client::ApiClient;
pub use decode::{decode_json, Created, IdResult, Ignored, ListResponse, ResultResponse};
pub use error::{ApiError, ApiResult};
pub use executor::RetryPolicy;
pub use http::{HttpRequest, Method, RawResponse, ReqwestTransport, Transport};
pub use paginate::{Paginator, PaginatorOptions};
pub use query::{FilterCondition, FilteringField, QueryParams};
pub use request::{render_path, Request};
pub use tokio_util::sync::CancellationToken;
