mod common;

use serde_json::json;
use std::time::Duration;
use webapi_scout::gateway::{ApiGateway, GatewayError, GatewayOptions, Provider, USER_AGENT};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_gateway() -> ApiGateway {
    ApiGateway::new(
        reqwest::Client::new(),
        GatewayOptions {
            retry_initial_interval: Duration::from_millis(5),
            retry_max_interval: Duration::from_millis(10),
            ..Default::default()
        },
    )
}

#[tokio::test]
async fn successful_responses_are_cached() {
    common::init_logger();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = fast_gateway();
    let url = format!("{}/data", server.uri());

    let first = gateway.get_json(Provider::Mdn, &url, &[]).await.unwrap();
    let second = gateway.get_json(Provider::Mdn, &url, &[]).await.unwrap();
    assert_eq!(first, json!({"ok": true}));
    assert_eq!(first, second);

    let stats = gateway.cache_stats().await;
    assert_eq!(stats.size, 1);
    assert_eq!(stats.keys, vec![format!("{}-{{}}", url)]);
}

#[tokio::test]
async fn headers_are_part_of_the_cache_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let gateway = fast_gateway();
    let url = format!("{}/data", server.uri());
    let accept = vec![("Accept".to_string(), "application/json".to_string())];

    gateway.get_json(Provider::Github, &url, &[]).await.unwrap();
    gateway.get_json(Provider::Github, &url, &accept).await.unwrap();
    gateway.get_json(Provider::Github, &url, &accept).await.unwrap();

    assert_eq!(gateway.cache_stats().await.size, 2);
}

#[tokio::test]
async fn default_user_agent_can_be_overridden() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/default"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(1)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/custom"))
        .and(header("user-agent", "custom-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(2)))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = fast_gateway();
    let custom = vec![("User-Agent".to_string(), "custom-agent".to_string())];

    let a = gateway
        .get_json(Provider::Mdn, &format!("{}/default", server.uri()), &[])
        .await
        .unwrap();
    let b = gateway
        .get_json(Provider::Mdn, &format!("{}/custom", server.uri()), &custom)
        .await
        .unwrap();
    assert_eq!((a, b), (json!(1), json!(2)));
}

#[tokio::test]
async fn too_many_requests_is_typed_and_blocks_the_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = fast_gateway();
    let err = gateway
        .get_json(Provider::Github, &format!("{}/search", server.uri()), &[])
        .await
        .unwrap_err();
    match err {
        GatewayError::RateLimited { provider, retry_after } => {
            assert_eq!(provider, Provider::Github);
            assert_eq!(retry_after.as_deref(), Some("30"));
        }
        other => panic!("expected RateLimited, got {:?}", other),
    }

    // The budget is now empty until the reset: no second request goes out.
    let again = gateway
        .get_json(Provider::Github, &format!("{}/other", server.uri()), &[])
        .await
        .unwrap_err();
    assert!(matches!(again, GatewayError::RateLimited { .. }));
    assert_eq!(gateway.rate_limit(Provider::Github).remaining, 0);

    // Other providers still reach the network (unmatched route → 404).
    let mdn = gateway
        .get_json(Provider::Mdn, &format!("{}/x", server.uri()), &[])
        .await;
    assert!(matches!(mdn, Err(GatewayError::Status { status: 404, .. })));
}

#[tokio::test]
async fn too_many_requests_without_retry_after_still_blocks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = fast_gateway();
    let url = format!("{}/search/issues", server.uri());
    let first = gateway.get_json(Provider::Github, &url, &[]).await.unwrap_err();
    assert!(matches!(first, GatewayError::RateLimited { retry_after: None, .. }));

    let second = gateway.get_json(Provider::Github, &url, &[]).await.unwrap_err();
    match second {
        GatewayError::RateLimited { retry_after, .. } => {
            let wait: i64 = retry_after.as_deref().unwrap().parse().unwrap();
            assert!(wait > 0 && wait <= 60, "got {}", wait);
        }
        other => panic!("expected RateLimited, got {:?}", other),
    }

    let budget = gateway.rate_limit(Provider::Github);
    assert_eq!(budget.remaining, 0);
    assert!(budget.reset_at.is_some());
}

#[tokio::test]
async fn client_errors_are_not_cached_or_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let gateway = fast_gateway();
    let url = format!("{}/missing", server.uri());
    for _ in 0..2 {
        let err = gateway.get_json(Provider::Mdn, &url, &[]).await.unwrap_err();
        match err {
            GatewayError::Status { status, reason } => {
                assert_eq!(status, 404);
                assert_eq!(reason, "Not Found");
            }
            other => panic!("expected Status, got {:?}", other),
        }
    }
    assert_eq!(gateway.cache_stats().await.size, 0);
}

#[tokio::test]
async fn server_errors_are_retried_up_to_the_provider_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": 1})))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        // MDN allows 2 retries: 3 attempts in total.
        .expect(3)
        .mount(&server)
        .await;

    let gateway = fast_gateway();
    let ok = gateway
        .get_json(Provider::Mdn, &format!("{}/flaky", server.uri()), &[])
        .await
        .unwrap();
    assert_eq!(ok, json!({"ok": 1}));

    let err = gateway
        .get_json(Provider::Mdn, &format!("{}/down", server.uri()), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Status { status: 500, .. }));
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let gateway = fast_gateway();
    let err = gateway
        .get_json(Provider::Caniuse, &format!("{}/x.json", server.uri()), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}

#[tokio::test]
async fn clearing_the_cache_forces_a_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let gateway = fast_gateway();
    let url = format!("{}/data", server.uri());
    gateway.get_json(Provider::Mdn, &url, &[]).await.unwrap();
    gateway.clear_cache();
    assert_eq!(gateway.cache_stats().await.size, 0);
    gateway.get_json(Provider::Mdn, &url, &[]).await.unwrap();
}

#[tokio::test]
async fn entries_expire_after_the_ttl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(2)
        .mount(&server)
        .await;

    let gateway = ApiGateway::new(
        reqwest::Client::new(),
        GatewayOptions {
            cache_ttl: Duration::from_millis(300),
            retry_initial_interval: Duration::from_millis(5),
            retry_max_interval: Duration::from_millis(10),
            ..Default::default()
        },
    );
    let url = format!("{}/doc", server.uri());

    gateway.get_json(Provider::Mdn, &url, &[]).await.unwrap();
    gateway.get_json(Provider::Mdn, &url, &[]).await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    gateway.get_json(Provider::Mdn, &url, &[]).await.unwrap();
}

#[tokio::test]
async fn rate_limit_headers_update_the_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .insert_header("x-ratelimit-remaining", "9")
                .insert_header("x-ratelimit-reset", "4102444800"),
        )
        .mount(&server)
        .await;

    let gateway = fast_gateway();
    gateway
        .get_json(Provider::Github, &format!("{}/q", server.uri()), &[])
        .await
        .unwrap();
    let budget = gateway.rate_limit(Provider::Github);
    assert_eq!(budget.remaining, 9);
    assert_eq!(budget.reset_at.map(|r| r.timestamp()), Some(4_102_444_800));
    assert_eq!(budget.max_retries, 3);
}
