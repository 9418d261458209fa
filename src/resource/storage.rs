//! S3 storage user endpoints

use crate::api::{render_path, Request, ResultResponse};
use serde::{Deserialize, Serialize};

pub const USER_ENDPOINT: &str = "/v1/s3_users/{}";
pub const KEYS_RESET_ENDPOINT: &str = "/v1/s3_users/{}/keys";
pub const SUSPEND_ENDPOINT: &str = "/v1/s3_users/{}/suspend";

/// Freshly issued credentials of an S3 user
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct S3Keys {
    pub user: String,
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for S3Keys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Keys")
            .field("user", &self.user)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

pub fn delete(user_id: &str) -> Request {
    Request::delete(render_path(USER_ENDPOINT, &[user_id]))
}

/// Revoke the user's keys and issue a new pair
pub fn reset_keys(user_id: &str) -> Request<(), ResultResponse<S3Keys>> {
    Request::post(render_path(KEYS_RESET_ENDPOINT, &[user_id]))
}

pub fn suspend(user_id: &str) -> Request {
    Request::post(render_path(SUSPEND_ENDPOINT, &[user_id]))
}
