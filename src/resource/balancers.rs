//! Load balancer endpoints

use crate::api::{render_path, Created, Ignored, ListResponse, Request};
use serde::{Deserialize, Serialize};

pub const CREATE_ENDPOINT: &str = "/v1/projects/{}/loadbalancers";
pub const START_ENDPOINT: &str = "/v1/loadbalancers/{}/start";
pub const ALGORITHM_ENDPOINT: &str = "/v1/loadbalancers/{}/algorithm";
pub const RULES_LIST_ENDPOINT: &str = "/v1/loadbalancers/{}/rules";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateBody {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_persistence: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetAlgorithmBody {
    /// e.g. `ROUND_ROBIN`, `LEAST_CONNECTIONS`, `SOURCE_IP`
    pub algorithm: String,
}

/// Port forwarding rule of a balancer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub external_protocol_port: u16,
    #[serde(default)]
    pub internal_protocol_port: u16,
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub loadbalancer: Option<String>,
}

pub fn create(project_id: &str, body: CreateBody) -> Request<CreateBody, Created> {
    Request::post(render_path(CREATE_ENDPOINT, &[project_id])).with_body(body)
}

pub fn start(balancer_id: &str) -> Request {
    Request::post(render_path(START_ENDPOINT, &[balancer_id]))
}

pub fn set_algorithm(balancer_id: &str, algorithm: &str) -> Request<SetAlgorithmBody, Ignored> {
    Request::post(render_path(ALGORITHM_ENDPOINT, &[balancer_id])).with_body(SetAlgorithmBody {
        algorithm: algorithm.to_string(),
    })
}

pub fn rules_list(balancer_id: &str) -> Request<(), ListResponse<Rule>> {
    Request::get(render_path(RULES_LIST_ENDPOINT, &[balancer_id]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_list_decodes_result_key() {
        let page: ListResponse<Rule> = serde_json::from_str(
            r#"{"count":2,"result":[{"id":"rule1","external_protocol_port":2,"internal_protocol_port":3, "server":"serv1"},{"id":"rule2","external_protocol_port":3,"internal_protocol_port":43,"loadbalancer":"lb1"}]}"#,
        )
        .unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].server.as_deref(), Some("serv1"));
        assert_eq!(page.results[1].internal_protocol_port, 43);
        assert_eq!(page.results[1].loadbalancer.as_deref(), Some("lb1"));
    }

    #[test]
    fn create_body_skips_unset_options() {
        let req = create(
            "p",
            CreateBody {
                name: "test".into(),
                ..Default::default()
            },
        );
        assert_eq!(req.path(), "/v1/projects/p/loadbalancers");
        assert_eq!(serde_json::to_string(req.body().unwrap()).unwrap(), r#"{"name":"test"}"#);
    }

    #[test]
    fn set_algorithm_body() {
        let req = set_algorithm("lb", "ROUND_ROBIN");
        assert_eq!(req.path(), "/v1/loadbalancers/lb/algorithm");
        assert_eq!(req.body().unwrap().algorithm, "ROUND_ROBIN");
    }
}
