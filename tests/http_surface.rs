//! HTTP surface tests against a live listener.

use std::net::SocketAddr;

use serde_json::Value;
use webdm_routes::config::ServerConfig;
use webdm_routes::http::server::DEFAULT_SHELL;
use webdm_routes::http::HttpServer;
use webdm_routes::lifecycle::Shutdown;

mod common;

async fn start_server(config: ServerConfig) -> (SocketAddr, Shutdown) {
    let fixture = common::Fixture::new();
    let server = HttpServer::new(fixture.table.clone(), &config, None).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_deep_link_serves_shell() {
    let (addr, shutdown) = start_server(ServerConfig::default()).await;

    let res = client()
        .get(format!("http://{}/snap/42/files", addr))
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), DEFAULT_SHELL);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unknown_location_is_404() {
    let (addr, shutdown) = start_server(ServerConfig::default()).await;

    let res = client()
        .get(format!("http://{}/does-not-exist", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "No matching route found");

    shutdown.trigger();
}

#[tokio::test]
async fn test_resolve_endpoint() {
    let (addr, shutdown) = start_server(ServerConfig::default()).await;
    let client = client();

    let res = client
        .get(format!("http://{}/_routes/resolve", addr))
        .query(&[("path", "/search?q=hello")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["group"], "search");
    assert_eq!(body["action"], "query");
    assert_eq!(body["params"], serde_json::json!(["hello"]));

    let res = client
        .get(format!("http://{}/_routes/resolve", addr))
        .query(&[("path", "/snap/7")])
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["params"], serde_json::json!(["7", null]));

    let res = client
        .get(format!("http://{}/_routes/resolve", addr))
        .query(&[("path", "/nope")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    shutdown.trigger();
}

#[tokio::test]
async fn test_route_listing_and_disabled_metrics() {
    let (addr, shutdown) = start_server(ServerConfig::default()).await;
    let client = client();

    let routes: Vec<Value> = client
        .get(format!("http://{}/_routes", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(routes.len(), 6);
    assert_eq!(routes[4]["captures"], serde_json::json!(["id", "section"]));

    let res = client
        .get(format!("http://{}/metrics", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    shutdown.trigger();
}

#[tokio::test]
async fn test_post_to_shell_not_allowed() {
    let (addr, shutdown) = start_server(ServerConfig::default()).await;

    let res = client()
        .post(format!("http://{}/store", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 405);

    shutdown.trigger();
}

#[tokio::test]
async fn test_shell_assets_are_served() {
    let root = std::env::temp_dir().join(format!("webdm-routes-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(root.join("js/build")).unwrap();
    let shell = "<html><body><script src=\"/public/js/build/bundle.js\"></script></body></html>";
    std::fs::write(root.join("index.html"), shell).unwrap();
    std::fs::write(root.join("js/build/bundle.js"), "console.log('snappy');").unwrap();

    let (addr, shutdown) = start_server(ServerConfig {
        shell_path: Some(root.join("index.html").to_string_lossy().into_owned()),
        static_dir: Some(root.to_string_lossy().into_owned()),
        ..ServerConfig::default()
    })
    .await;
    let client = client();

    let res = client
        .get(format!("http://{}/store", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), shell);

    let res = client
        .get(format!("http://{}/public/js/build/bundle.js", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "console.log('snappy');");

    let res = client
        .get(format!("http://{}/public/js/missing.js", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    shutdown.trigger();
    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn test_default_shell_references_no_assets() {
    assert!(!DEFAULT_SHELL.contains("/public/"));

    let (addr, shutdown) = start_server(ServerConfig::default()).await;
    let res = client()
        .get(format!("http://{}/public/js/build/bundle.js", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    shutdown.trigger();
}

#[test]
fn test_missing_shell_file_fails() {
    let fixture = common::Fixture::new();
    let config = ServerConfig {
        shell_path: Some("/nonexistent/index.html".into()),
        ..ServerConfig::default()
    };
    assert!(HttpServer::new(fixture.table.clone(), &config, None).is_err());
}
