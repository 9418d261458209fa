//! Client SDK for a cloud infrastructure REST API
//!
//! - [`api`] - The shared request framework: client, retry, decoding, pagination
//! - [`resource`] - Typed requests for every endpoint (servers, volumes, ...)

pub mod api;
pub mod resource;

pub use api::{ApiClient, ApiError, ApiResult};
