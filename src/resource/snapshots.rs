//! Snapshot endpoints

use crate::api::{render_path, Request};

pub const DETAIL_ENDPOINT: &str = "/v1/snapshots/{}";

pub fn delete(snapshot_id: &str) -> Request {
    Request::delete(render_path(DETAIL_ENDPOINT, &[snapshot_id]))
}
