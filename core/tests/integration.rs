//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port inside the test runtime, then
//! drives `RequestExecutor` over real HTTP with both bundled transports.
//! The DTOs here are declared independently of the server's own types so
//! schema drift between the two shows up as decode failures.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use service_core::{
    ErrorKind, HttpTransport, Request, RequestExecutor, ServiceConfig, ServiceError,
    UreqTransport,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Game {
    id: u64,
    name: String,
    released: Option<String>,
    rating: f64,
}

#[derive(Debug, Deserialize)]
struct Page {
    count: u64,
    next: Option<String>,
    results: Vec<Game>,
}

#[derive(Debug, Deserialize)]
struct GameWithDeveloper {
    #[allow(dead_code)]
    developer: String,
}

async fn start_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run_with(listener, mock_server::sample_games()));
    addr
}

fn config(addr: SocketAddr) -> ServiceConfig {
    ServiceConfig::new(&format!("http://{addr}"))
}

#[tokio::test]
async fn crud_lifecycle() {
    let addr = start_server().await;
    let executor = RequestExecutor::new(config(addr)).unwrap();

    // Step 1: list with pagination parameters.
    let page: Page = executor
        .execute(Request::get("/games").parameter("page", 2).parameter("page_size", 2))
        .await
        .unwrap();
    assert_eq!(page.count, 5);
    let ids: Vec<u64> = page.results.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![3, 4]);
    assert_eq!(page.next.as_deref(), Some("/games?page=3&page_size=2"));

    // Step 2: create.
    let request = Request::post("/games")
        .json_body(&serde_json::json!({"name": "Hades", "released": "2020-09-17", "rating": 4.4}))
        .unwrap();
    let created: Game = executor.execute(request).await.unwrap();
    assert_eq!(created.id, 6);
    assert_eq!(created.name, "Hades");

    // Step 3: get.
    let fetched: Game = executor.execute(Request::get("/games/6")).await.unwrap();
    assert_eq!(fetched, created);

    // Step 4: patch rating only.
    let request = Request::patch("/games/6")
        .json_body(&serde_json::json!({"rating": 4.9}))
        .unwrap();
    let patched: Game = executor.execute(request).await.unwrap();
    assert_eq!(patched.name, "Hades");
    assert_eq!(patched.rating, 4.9);

    // Step 5: put replaces every field.
    let request = Request::put("/games/6")
        .json_body(&serde_json::json!({"name": "Hades II"}))
        .unwrap();
    let replaced: Game = executor.execute(request).await.unwrap();
    assert_eq!(replaced.name, "Hades II");
    assert!(replaced.released.is_none());

    // Step 6: delete answers 204 with no body, which is reported as NoData.
    let err = executor
        .execute::<serde_json::Value>(Request::delete("/games/6"))
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::NoData);

    // Step 7: get after delete.
    let err = executor
        .execute::<Game>(Request::get("/games/6"))
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::InvalidResponse { status: 404 });
}

#[tokio::test]
async fn parameters_and_headers_reach_the_server() {
    let addr = start_server().await;
    let executor = RequestExecutor::new(config(addr)).unwrap();

    let echo: mock_server::Echo = executor
        .execute(
            Request::get("/echo?stale=1")
                .parameter("page", 2)
                .parameter("page_size", 10)
                .header("X-Api-Key", "secret")
                .header("X-Attempt", 3),
        )
        .await
        .unwrap();

    assert_eq!(echo.method, "GET");
    assert_eq!(echo.query.as_deref(), Some("page=2&page_size=10"));
    assert_eq!(echo.headers.get("x-api-key").map(String::as_str), Some("secret"));
    assert!(!echo.headers.contains_key("x-attempt"));
}

#[tokio::test]
async fn status_outside_success_range_is_invalid_response() {
    let addr = start_server().await;
    let executor = RequestExecutor::new(config(addr)).unwrap();

    for status in [299, 400, 404, 500] {
        let err = executor
            .execute::<serde_json::Value>(Request::get(format!("/status/{status}")))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::InvalidResponse { status });
    }

    let ok: serde_json::Value = executor.execute(Request::get("/status/200")).await.unwrap();
    assert_eq!(ok["status"], 200);
}

#[tokio::test]
async fn empty_body_is_no_data() {
    let addr = start_server().await;
    let executor = RequestExecutor::new(config(addr)).unwrap();

    let err = executor
        .execute::<serde_json::Value>(Request::get("/empty"))
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::NoData);
}

#[tokio::test]
async fn shape_mismatch_is_decoder_error() {
    let addr = start_server().await;
    let executor = RequestExecutor::new(config(addr)).unwrap();

    let err = executor
        .execute::<GameWithDeveloper>(Request::get("/games/1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecoderError);
}

#[tokio::test]
async fn unreachable_host_is_api_error() {
    let executor = RequestExecutor::new(ServiceConfig::new("http://127.0.0.1:1")).unwrap();

    let err = executor
        .execute::<Game>(Request::get("/games/1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ApiError);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_requests_each_get_their_own_result() {
    let addr = start_server().await;
    let executor = RequestExecutor::new(config(addr)).unwrap();

    let handles: Vec<_> = (1..=5)
        .map(|id| (id, executor.spawn::<Game>(Request::get(format!("/games/{id}")))))
        .collect();

    for (id, handle) in handles {
        let game = handle.await.unwrap().unwrap();
        assert_eq!(game.id, id);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ureq_transport_round_trip() {
    let addr = start_server().await;
    let transport = UreqTransport::new(&config(addr));
    let executor = RequestExecutor::with_transport(config(addr), transport);

    let game: Game = executor.execute(Request::get("/games/3")).await.unwrap();
    assert_eq!(game.name, "Portal 2");

    let request = Request::post("/games")
        .json_body(&serde_json::json!({"name": "Celeste", "rating": 4.3}))
        .unwrap();
    let created: Game = executor.execute(request).await.unwrap();
    assert_eq!(created.id, 6);

    let echo: mock_server::Echo = executor
        .execute(Request::patch("/echo").header("X-Client", "ureq").body("raw"))
        .await
        .unwrap();
    assert_eq!(echo.method, "PATCH");
    assert_eq!(echo.body, "raw");
    assert_eq!(echo.headers.get("x-client").map(String::as_str), Some("ureq"));

    let err = executor
        .execute::<Game>(Request::get("/games/99"))
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::InvalidResponse { status: 404 });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ureq_transport_sends_bodies_on_get_and_delete() {
    let addr = start_server().await;
    let transport = UreqTransport::new(&config(addr));
    let executor = RequestExecutor::with_transport(config(addr), transport);

    let echo: mock_server::Echo = executor
        .execute(Request::delete("/echo").body(r#"{"reason":"duplicate"}"#))
        .await
        .unwrap();
    assert_eq!(echo.method, "DELETE");
    assert_eq!(echo.body, r#"{"reason":"duplicate"}"#);

    let echo: mock_server::Echo = executor
        .execute(Request::get("/echo").body("filter"))
        .await
        .unwrap();
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.body, "filter");

    let echo: mock_server::Echo = executor.execute(Request::delete("/echo")).await.unwrap();
    assert!(echo.body.is_empty());
}

#[tokio::test]
async fn reqwest_timeout_is_api_error() {
    let addr = start_server().await;
    let executor =
        RequestExecutor::new(config(addr).with_timeout(Duration::from_millis(50))).unwrap();

    let err = executor
        .execute::<serde_json::Value>(Request::get("/slow/2000"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ApiError);

    let ok: serde_json::Value = executor.execute(Request::get("/slow/0")).await.unwrap();
    assert_eq!(ok["slept_ms"], 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ureq_timeout_is_api_error() {
    let addr = start_server().await;
    let config = config(addr).with_timeout(Duration::from_millis(50));
    let executor = RequestExecutor::with_transport(config.clone(), UreqTransport::new(&config));

    let err = executor
        .execute::<serde_json::Value>(Request::get("/slow/2000"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ApiError);
}

#[tokio::test]
async fn transports_are_usable_as_trait_objects() {
    let addr = start_server().await;
    let transport: Box<dyn HttpTransport> = Box::new(UreqTransport::new(&config(addr)));
    let response = transport
        .send(service_core::HttpRequest {
            method: service_core::HttpMethod::Get,
            url: format!("http://{addr}/games/1"),
            headers: Vec::new(),
            body: None,
        })
        .await
        .unwrap();
    assert_eq!(response.status, 200);
}
