//! Volume and local disk endpoints

use crate::api::{render_path, Ignored, ListResponse, Request};
use serde::{Deserialize, Serialize};

pub const LIST_ENDPOINT: &str = "/v1/projects/{}/volumes";
pub const LOCAL_LIST_ENDPOINT: &str = "/v1/projects/{}/local-disks";
pub const ATTACH_ENDPOINT: &str = "/v1/volumes/{}/attach";
pub const DETACH_ENDPOINT: &str = "/v1/volumes/{}/detach";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Volume {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalDisk {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Attach a volume to a server; `mount_path` is left to the server when unset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_path: Option<String>,
    pub server_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetachBody {
    pub force: bool,
}

/// Mount point chosen by the server for an attached volume
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttachResult {
    #[serde(default)]
    pub mount_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttachResponse {
    #[serde(default)]
    pub result: AttachResult,
}

pub fn list(project_id: &str) -> Request<(), ListResponse<Volume>> {
    Request::get(render_path(LIST_ENDPOINT, &[project_id]))
}

pub fn local_disks(project_id: &str) -> Request<(), ListResponse<LocalDisk>> {
    Request::get(render_path(LOCAL_LIST_ENDPOINT, &[project_id]))
}

pub fn attach(volume_id: &str, body: AttachBody) -> Request<AttachBody, AttachResponse> {
    Request::post(render_path(ATTACH_ENDPOINT, &[volume_id])).with_body(body)
}

pub fn detach(volume_id: &str, force: bool) -> Request<DetachBody, Ignored> {
    Request::post(render_path(DETACH_ENDPOINT, &[volume_id])).with_body(DetachBody { force })
}
