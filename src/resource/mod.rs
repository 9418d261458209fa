//! Endpoint catalog
//!
//! One constructor per API endpoint. Each returns a [`Request`] with the
//! method, path, body and response types already fixed; callers add filters,
//! ordering and retry before sending.
//!
//! - [`servers`] - Compute instances
//! - [`volumes`] - Block volumes and local disks
//! - [`addresses`] - Floating IPs and server addresses
//! - [`balancers`] - Load balancers and their rules
//! - [`snapshots`] - Volume snapshots
//! - [`storage`] - S3 storage users
//! - [`project`] - Project images and deployment recipes
//!
//! [`Request`]: crate::api::Request

pub mod addresses;
pub mod balancers;
pub mod project;
pub mod servers;
pub mod snapshots;
pub mod storage;
pub mod volumes;

use serde::{Deserialize, Serialize};

/// Body of the reverse-DNS (PTR) update endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PtrBody {
    pub value: String,
}

impl PtrBody {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Reference to another resource: `{"id": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: String,
}
