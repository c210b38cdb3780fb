// tests/api_endpoints.rs
// HTTP surface tests with in-process collaborators standing in for redis.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use calcache::api::configure_routes;
use calcache::cache::MemoryCache;
use calcache::db::operation_store::SqliteStore;
use calcache::db::schema_init::SchemaInitializer;
use calcache::resolver::Resolver;
use rusqlite::Connection;
use serde_json::Value;

fn test_resolver() -> Resolver {
    let conn = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
    SchemaInitializer::init(&conn.lock().unwrap()).unwrap();
    Resolver::new(
        Arc::new(MemoryCache::new()),
        Arc::new(SqliteStore::new(conn)),
        Duration::from_secs(30),
    )
}

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(test_resolver()))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn health_returns_static_ok() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn calculator_reports_result_and_source() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/calculator/add/2/3")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["result"], 5.0);
    assert_eq!(body["source"], "computed");
    assert!(body["request_id"].is_string());

    let req = test::TestRequest::get()
        .uri("/calculator/add/2/3")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["result"], 5.0);
    assert_eq!(body["source"], "cache");
}

#[actix_web::test]
async fn alias_spelling_lands_on_the_same_entry() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/calculator/multiply/6/7")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["result"], 42.0);
    assert_eq!(body["source"], "computed");

    let req = test::TestRequest::get()
        .uri("/calculator/mul/6.0/7.0")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["result"], 42.0);
    assert_eq!(body["source"], "cache");
}

#[actix_web::test]
async fn division_by_zero_is_a_bad_request() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/calculator/div/10/0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "division by zero");
}

#[actix_web::test]
async fn unknown_operation_is_a_bad_request() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/calculator/pow/2/8")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unsupported operation");
}

#[actix_web::test]
async fn unparseable_operand_is_a_bad_request() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/calculator/add/two/3")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid numbers");
}
