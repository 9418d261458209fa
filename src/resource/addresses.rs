//! Floating IP and server address endpoints

use super::{PtrBody, ResourceRef};
use crate::api::{render_path, Ignored, ListResponse, Request};
use serde::{Deserialize, Serialize};

pub const FLOATING_LIST_ENDPOINT: &str = "/v1/projects/{}/floatingips";
pub const FLOATING_PTR_ENDPOINT: &str = "/v1/floatingips/{}/ptr";
pub const ADDRESS_PRIMARY_ENDPOINT: &str = "/v1/addresses/{}/primary";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FloatingIp {
    pub id: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub ptr: Option<String>,
    #[serde(default)]
    pub attached_to_server: Option<ResourceRef>,
}

pub fn floating_list(project_id: &str) -> Request<(), ListResponse<FloatingIp>> {
    Request::get(render_path(FLOATING_LIST_ENDPOINT, &[project_id]))
}

pub fn change_floating_ptr(floating_id: &str, value: &str) -> Request<PtrBody, Ignored> {
    Request::put(render_path(FLOATING_PTR_ENDPOINT, &[floating_id])).with_body(PtrBody::new(value))
}

/// Make the address the primary one of the server it is attached to
pub fn change_primary(address_id: &str) -> Request {
    Request::post(render_path(ADDRESS_PRIMARY_ENDPOINT, &[address_id]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;

    #[test]
    fn floating_ip_list_item_decodes_server_ref() {
        let page: ListResponse<FloatingIp> = serde_json::from_str(
            r#"{"count": 2, "results": [{"id": "first_item_id", "ptr": "host.com", "attached_to_server":{"id":"server_id"}},{"id": "second_item_id", "ptr": "host.com"}]}"#,
        )
        .unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(
            page.results[0].attached_to_server,
            Some(ResourceRef {
                id: "server_id".into()
            })
        );
        assert_eq!(page.results[1].attached_to_server, None);
    }

    #[test]
    fn ptr_change_is_put_and_primary_is_post() {
        let ptr = change_floating_ptr("fip", "host.com");
        assert_eq!(ptr.method(), Method::Put);
        assert_eq!(ptr.path(), "/v1/floatingips/fip/ptr");

        let primary = change_primary("addr");
        assert_eq!(primary.method(), Method::Post);
        assert_eq!(primary.path(), "/v1/addresses/addr/primary");
        assert!(primary.body().is_none());
    }
}
