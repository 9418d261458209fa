//! Project-level catalogs: images and recipes

use crate::api::{render_path, ListResponse, Request};
use serde::{Deserialize, Serialize};

pub const IMAGE_LIST_ENDPOINT: &str = "/v1/projects/{}/images";
pub const RECIPE_LIST_ENDPOINT: &str = "/v1/recipes";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperationSystem {
    #[serde(default)]
    pub os_family: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub operation_system: OperationSystem,
}

/// Preconfigured software stack deployable onto a new server
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub min_disk: Option<u64>,
    #[serde(default)]
    pub suitable_images: Vec<String>,
}

pub fn image_list(project_id: &str) -> Request<(), ListResponse<Image>> {
    Request::get(render_path(IMAGE_LIST_ENDPOINT, &[project_id]))
}

pub fn recipe_list() -> Request<(), ListResponse<Recipe>> {
    Request::get(RECIPE_LIST_ENDPOINT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_list_decodes_os_family() {
        let page: ListResponse<Image> = serde_json::from_str(
            r#"{"count": 2, "results": [{"id": "first_item_id", "name": "first_item_name", "operation_system":{"os_family":"debian"}},{"id": "second_item_id", "name": "second_item_name", "operation_system":{"os_family":"centos"}}]}"#,
        )
        .unwrap();
        let families: Vec<_> = page
            .results
            .iter()
            .filter_map(|i| i.operation_system.os_family.as_deref())
            .collect();
        assert_eq!(families, ["debian", "centos"]);
    }

    #[test]
    fn recipe_list_decodes_optional_fields() {
        let page: ListResponse<Recipe> = serde_json::from_str(
            r#"{"count": 2,"results": [{"name":"first_item_name","min_disk": 2},{"name":"second_item_name","suitable_images":["1"]}]}"#,
        )
        .unwrap();
        assert_eq!(page.results[0].min_disk, Some(2));
        assert!(page.results[0].suitable_images.is_empty());
        assert_eq!(page.results[1].suitable_images, vec!["1"]);
        assert_eq!(recipe_list().path(), "/v1/recipes");
    }
}
