//! Server endpoints

use super::PtrBody;
use crate::api::{render_path, Ignored, ListResponse, Request, ResultResponse};
use serde::{Deserialize, Serialize};

pub const LIST_ENDPOINT: &str = "/v1/projects/{}/servers";
pub const DETAIL_ENDPOINT: &str = "/v1/servers/{}";
pub const START_ENDPOINT: &str = "/v1/servers/{}/start";
pub const STOP_ENDPOINT: &str = "/v1/servers/{}/stop";
pub const REBOOT_ENDPOINT: &str = "/v1/servers/{}/reboot";
pub const PASSWORD_ENDPOINT: &str = "/v1/servers/{}/password";
pub const PTR_ENDPOINT: &str = "/v1/servers/{}/ptr";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServerFlavor {
    #[serde(default)]
    pub ram: u64,
    #[serde(default)]
    pub vcpus: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Server {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub flavor: ServerFlavor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteBody {
    pub clear_fstab: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePasswordBody {
    pub password: String,
}

pub fn list(project_id: &str) -> Request<(), ListResponse<Server>> {
    Request::get(render_path(LIST_ENDPOINT, &[project_id]))
}

pub fn detail(server_id: &str) -> Request<(), ResultResponse<Server>> {
    Request::get(render_path(DETAIL_ENDPOINT, &[server_id]))
}

/// `clear_fstab` also removes mounts of attached volumes from the guest
pub fn delete(server_id: &str, clear_fstab: bool) -> Request<DeleteBody, Ignored> {
    Request::delete(render_path(DETAIL_ENDPOINT, &[server_id])).with_body(DeleteBody { clear_fstab })
}

pub fn start(server_id: &str) -> Request {
    Request::post(render_path(START_ENDPOINT, &[server_id]))
}

pub fn stop(server_id: &str) -> Request {
    Request::post(render_path(STOP_ENDPOINT, &[server_id]))
}

pub fn reboot(server_id: &str) -> Request {
    Request::post(render_path(REBOOT_ENDPOINT, &[server_id]))
}

pub fn change_password(server_id: &str, password: &str) -> Request<ChangePasswordBody, Ignored> {
    Request::post(render_path(PASSWORD_ENDPOINT, &[server_id])).with_body(ChangePasswordBody {
        password: password.to_string(),
    })
}

pub fn change_ptr(server_id: &str, value: &str) -> Request<PtrBody, Ignored> {
    Request::put(render_path(PTR_ENDPOINT, &[server_id])).with_body(PtrBody::new(value))
}
