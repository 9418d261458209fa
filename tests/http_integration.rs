//! Integration tests for the request framework using wiremock
//!
//! These tests drive real HTTP through the default reqwest transport against
//! mocked endpoints, covering auth, retry counting, bodies and decoding.

use cloapi::api::{ApiClient, ApiError, CancellationToken, Request, ResultResponse};
use cloapi::resource::{servers, storage, volumes};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{bearer_token, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), "test-token").expect("client should build")
}

mod request_tests {
    use super::*;

    /// Authorization header carries the bearer key
    #[tokio::test]
    async fn test_get_sends_bearer_and_decodes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/servers/srv-1"))
            .and(bearer_token("test-token"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {
                    "id": "srv-1",
                    "name": "web",
                    "status": "ACTIVE",
                    "flavor": {"ram": 4, "vcpus": 2}
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = servers::detail("srv-1")
            .send(&client_for(&server))
            .await
            .expect("Request should succeed");

        assert_eq!(resp.result.id, "srv-1");
        assert_eq!(resp.result.name.as_deref(), Some("web"));
        assert_eq!(resp.result.flavor.vcpus, 2);
    }

    /// POST body is JSON and matches the endpoint's shape
    #[tokio::test]
    async fn test_post_with_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/volumes/vol-1/attach"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"mount_path": "/mnt/data", "server_id": "srv-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {"device": "/dev/vdb", "mount_path": "/mnt/data"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let attached = volumes::attach(
            "vol-1",
            volumes::AttachBody {
                mount_path: Some("/mnt/data".into()),
                server_id: "srv-1".into(),
            },
        )
        .send(&client_for(&server))
        .await
        .expect("Request should succeed");

        assert_eq!(attached.result.mount_path.as_deref(), Some("/mnt/data"));
    }

    /// PUT with a body and an empty 204 reply decodes into the ignored target
    #[tokio::test]
    async fn test_put_with_empty_reply() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v1/servers/srv-1/ptr"))
            .and(body_json(json!({"value": "host.example.com"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        servers::change_ptr("srv-1", "host.example.com")
            .send(&client_for(&server))
            .await
            .expect("Empty success body should decode");
    }

    /// DELETE may carry a body
    #[tokio::test]
    async fn test_delete_with_body() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v1/servers/srv-1"))
            .and(body_json(json!({"clear_fstab": true})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        servers::delete("srv-1", true)
            .send(&client_for(&server))
            .await
            .expect("Request should succeed");
    }

    /// Extra caller headers reach the server
    #[tokio::test]
    async fn test_custom_header_is_sent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/s3_users/u-1/keys"))
            .and(header("X-Add-Some", "SomeHeaderValue"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {"user": "u-1", "access_key": "ak", "secret_key": "sk"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let keys = storage::reset_keys("u-1")
            .with_header("X-Add-Some", "SomeHeaderValue")
            .send(&client_for(&server))
            .await
            .expect("Request should succeed");

        assert_eq!(keys.result.access_key, "ak");
    }

    /// A 200 with a body of the wrong shape is a decode error, not retried
    #[tokio::test]
    async fn test_malformed_success_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/servers/srv-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let err = servers::detail("srv-1")
            .with_retry(3, Duration::ZERO)
            .send(&client_for(&server))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode { .. }));
    }

    /// A malformed header fails at once and never reaches the server
    #[tokio::test]
    async fn test_bad_header_is_not_sent_or_retried() {
        let server = MockServer::start().await;

        let started = std::time::Instant::now();
        let err = servers::start("srv-1")
            .with_header("bad header", "v")
            .with_retry(4, Duration::from_millis(200))
            .send(&client_for(&server))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidRequest { .. }));
        assert!(started.elapsed() < Duration::from_millis(200));
        let received = server.received_requests().await.unwrap_or_default();
        assert!(received.is_empty());
    }
}

mod retry_tests {
    use super::*;

    /// N attempts against a failing endpoint make exactly N calls
    #[tokio::test]
    async fn test_retry_count_is_exact() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/servers/srv-1/reboot"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let err = servers::reboot("srv-1")
            .with_retry(3, Duration::from_millis(10))
            .send(&client_for(&server))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Internal Server Error");
        assert_eq!(err.status(), Some(500));
    }

    /// No retry configured: a single call
    #[tokio::test]
    async fn test_default_policy_sends_once() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/servers/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let err = servers::detail("missing")
            .send(&client_for(&server))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Not Found");
    }

    /// Success after transient failures stops the loop
    #[tokio::test]
    async fn test_success_short_circuits() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/servers/srv-1/start"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/servers/srv-1/start"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        servers::start("srv-1")
            .with_retry(5, Duration::from_millis(5))
            .send(&client_for(&server))
            .await
            .expect("Third attempt should succeed");
    }

    /// Concurrent dispatch of one prepared request keeps per-call counts
    #[tokio::test]
    async fn test_concurrent_requests_each_retry() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/servers/srv-1/stop"))
            .respond_with(ResponseTemplate::new(500))
            .expect(20)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = servers::stop("srv-1").with_retry(5, Duration::from_millis(5));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let client = client.clone();
                let request = request.clone();
                tokio::spawn(async move { request.send(&client).await })
            })
            .collect();

        for handle in handles {
            let result = handle.await.expect("task should not panic");
            assert!(matches!(result, Err(ApiError::Status { status: 500, .. })));
        }
    }

    /// Cancelling stops a slow call without waiting for the server
    #[tokio::test]
    async fn test_cancel_interrupts_slow_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/servers/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let result: Result<ResultResponse<serde_json::Value>, _> = Request::get("/v1/servers/slow")
            .send_with_cancel(&client, &cancel)
            .await;

        assert!(matches!(result, Err(ApiError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    /// Connection refused is a network error once attempts run out
    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let client = ApiClient::new(&uri, "test-token").unwrap();
        let err = servers::detail("srv-1")
            .with_retry(2, Duration::from_millis(5))
            .send(&client)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Network { .. }));
    }
}
