//! End-to-end tests for the forwarding proxy.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use forward_proxy::config::ProxyConfig;
use forward_proxy::http::HttpServer;
use forward_proxy::lifecycle::Shutdown;
use forward_proxy::{ExchangeStore, ProxyRequest, ProxyResponse};

mod common;

struct TestProxy {
    addr: SocketAddr,
    store: ExchangeStore,
    shutdown: Shutdown,
}

impl TestProxy {
    fn endpoint(&self) -> String {
        format!("http://{}/proxy", self.addr)
    }
}

async fn start_proxy(config: ProxyConfig) -> TestProxy {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let store = server.store();
    let signal = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    TestProxy {
        addr,
        store,
        shutdown,
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn describe(method: &str, url: &str) -> ProxyRequest {
    ProxyRequest {
        method: method.into(),
        url: url.into(),
        headers: HashMap::new(),
        body: String::new(),
    }
}

#[tokio::test]
async fn valid_get_is_forwarded_and_recorded() {
    let origin = common::start_mock_origin("hello from origin").await;
    let proxy = start_proxy(ProxyConfig::default()).await;

    let res = client()
        .post(proxy.endpoint())
        .json(&describe("GET", &format!("http://{origin}/")))
        .send()
        .await
        .expect("proxy unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/json"
    );

    let body: ProxyResponse = res.json().await.unwrap();
    assert_eq!(body.status, 200);
    assert_eq!(body.body, "hello from origin");
    assert_eq!(body.length, body.body.len());
    assert!(!body.id.is_empty());
    assert!(!body.headers.is_empty());
    assert_eq!(
        body.headers.get("content-length").map(String::as_str),
        Some("17")
    );

    // The exchange is in the ledger under the minted id.
    assert_eq!(proxy.store.len(), 1);
    let exchange = proxy.store.get(&body.id).expect("exchange not recorded");
    assert_eq!(exchange.request.method, "GET");
    assert_eq!(exchange.response.status, 200);

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn exchange_ids_are_unique() {
    let origin = common::start_mock_origin("ok").await;
    let proxy = start_proxy(ProxyConfig::default()).await;
    let client = client();
    let description = describe("GET", &format!("http://{origin}/"));

    let mut ids = std::collections::HashSet::new();
    for _ in 0..5 {
        let res = client
            .post(proxy.endpoint())
            .json(&description)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        let body: ProxyResponse = res.json().await.unwrap();
        assert!(ids.insert(body.id), "duplicate exchange id");
    }

    assert_eq!(proxy.store.len(), 5);
    proxy.shutdown.trigger();
}

#[tokio::test]
async fn invalid_json_yields_400() {
    let proxy = start_proxy(ProxyConfig::default()).await;

    let res = client()
        .post(proxy.endpoint())
        .body(r#"{"method": "GET", "url": "http://example.com", "headers": {"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), "Invalid JSON format\n");
    assert!(proxy.store.is_empty());

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn empty_body_yields_400() {
    let proxy = start_proxy(ProxyConfig::default()).await;

    let res = client().post(proxy.endpoint()).send().await.unwrap();

    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), "Invalid JSON format\n");

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn wrong_verb_yields_405() {
    let proxy = start_proxy(ProxyConfig::default()).await;

    let res = client().get(proxy.endpoint()).send().await.unwrap();

    assert_eq!(res.status(), 405);
    assert_eq!(res.text().await.unwrap(), "Only POST method is allowed\n");

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn unreachable_origin_yields_500() {
    let proxy = start_proxy(ProxyConfig::default()).await;

    let res = client()
        .post(proxy.endpoint())
        .json(&describe("GET", "http://127.0.0.1:1/"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    assert_eq!(
        res.text().await.unwrap(),
        "Error making request to external service\n"
    );
    assert!(proxy.store.is_empty());

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn multi_value_origin_headers_are_joined() {
    let origin = common::start_raw_origin(
        "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nX-A: 1\r\nX-A: 2\r\nConnection: close\r\n\r\nok"
            .to_string(),
    )
    .await;
    let proxy = start_proxy(ProxyConfig::default()).await;

    let res = client()
        .post(proxy.endpoint())
        .json(&describe("GET", &format!("http://{origin}/")))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: ProxyResponse = res.json().await.unwrap();
    assert_eq!(body.headers.get("x-a").map(String::as_str), Some("1, 2"));

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn request_body_and_content_type_reach_origin() {
    let origin = common::start_echo_origin().await;
    let proxy = start_proxy(ProxyConfig::default()).await;

    let mut description = describe("POST", &format!("http://{origin}/"));
    description
        .headers
        .insert("Content-Type".into(), "text/plain".into());
    description.body = "ping".into();

    let res = client()
        .post(proxy.endpoint())
        .json(&description)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: ProxyResponse = res.json().await.unwrap();
    assert_eq!(body.body, "POST|text/plain|ping");
    assert_eq!(body.length, body.body.len());

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn host_override_redirects_exchange() {
    let origin = common::start_mock_origin("rewritten").await;

    let mut config = ProxyConfig::default();
    config.upstream.override_host = Some(origin.to_string());
    let proxy = start_proxy(config).await;

    // The described host does not resolve; only the override can succeed.
    let res = client()
        .post(proxy.endpoint())
        .json(&describe("GET", "http://origin.invalid/"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: ProxyResponse = res.json().await.unwrap();
    assert_eq!(body.body, "rewritten");

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn concurrent_exchanges_are_independent() {
    let origin = common::start_mock_origin("ok").await;
    let proxy = start_proxy(ProxyConfig::default()).await;
    let client = client();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        let endpoint = proxy.endpoint();
        let description = describe("GET", &format!("http://{origin}/"));
        handles.push(tokio::spawn(async move {
            let res = client
                .post(endpoint)
                .json(&description)
                .send()
                .await
                .unwrap();
            assert_eq!(res.status(), 200);
            let body: ProxyResponse = res.json().await.unwrap();
            body.id
        }));
    }

    let mut ids = std::collections::HashSet::new();
    for handle in handles {
        assert!(ids.insert(handle.await.unwrap()), "duplicate exchange id");
    }

    assert_eq!(proxy.store.len(), 8);
    proxy.shutdown.trigger();
}
