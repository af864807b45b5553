//! HTTP-level checks that never reach the database: gate decisions, body and
//! path rejections, request ids, CORS.

use axum::http::{
    HeaderName, HeaderValue, Method, StatusCode,
    header::{
        ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_METHODS,
        ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
    },
};
use axum_test::TestServer;
use chrono::Duration;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use cinelog_catalog::router::build_router;
use cinelog_catalog::state::AppState;
use cinelog_testing::auth::{MockAuth, test_codec};

const FRONTEND: &str = "http://localhost:5173";

fn server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        tokens: test_codec(),
        otp_ttl: Duration::minutes(5),
        cors_origin: HeaderValue::from_static(FRONTEND),
    };
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn should_answer_liveness_and_report_unready_without_database() {
    let server = server();
    server.get("/healthz").await.assert_status_ok();
    server
        .get("/readyz")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_require_token_for_admin_routes() {
    let resp = server()
        .post("/films")
        .json(&json!({"title": "Arrival"}))
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(resp.json::<Value>()["kind"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn should_reject_garbage_token_on_protected_route() {
    let resp = server()
        .post("/watchlists")
        .authorization_bearer("not.a.jwt")
        .json(&json!({"name": "Weekend"}))
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_forbid_client_from_admin_routes() {
    let server = server();
    let token = MockAuth::client().token();

    let films = server
        .post("/films")
        .authorization_bearer(&token)
        .json(&json!({"title": "Arrival"}))
        .await;
    films.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(films.json::<Value>()["kind"], "FORBIDDEN");

    server
        .get("/users")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_report_field_errors_for_invalid_film() {
    let resp = server()
        .post("/films")
        .authorization_bearer(MockAuth::admin().token())
        .json(&json!({
            "title": " ",
            "genre": "Drama",
            "release_date": "yesterday",
            "rating": 12.0,
        }))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body = resp.json::<Value>();
    assert_eq!(body["kind"], "VALIDATION");
    let fields: Vec<_> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(fields, ["title", "genre", "release_date", "rating"]);
}

#[tokio::test]
async fn should_render_malformed_json_as_validation_error() {
    let resp = server()
        .post("/films")
        .authorization_bearer(MockAuth::admin().token())
        .text("{not json")
        .content_type("application/json")
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["kind"], "VALIDATION");
}

#[tokio::test]
async fn should_render_malformed_path_id_as_validation_error() {
    let resp = server().get("/watchlists/not-a-uuid").await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["kind"], "VALIDATION");
}

#[tokio::test]
async fn should_reject_malformed_review_filter() {
    let resp = server().get("/reviews").add_query_param("filmId", "nope").await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body = resp.json::<Value>();
    assert_eq!(body["details"][0]["field"], "film_id");
}

#[tokio::test]
async fn should_require_login_to_create_watchlist() {
    server()
        .post("/watchlists")
        .json(&json!({"name": "Weekend"}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_stamp_responses_with_request_id() {
    let resp = server().get("/healthz").await;
    let id = resp.header("x-request-id");
    assert!(id.to_str().unwrap().parse::<uuid::Uuid>().is_ok());
}

#[tokio::test]
async fn should_echo_caller_request_id() {
    let resp = server()
        .get("/healthz")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-me"),
        )
        .await;
    assert_eq!(resp.header("x-request-id"), "trace-me");
}

#[tokio::test]
async fn should_answer_preflight_for_allowed_origin() {
    let resp = server()
        .method(Method::OPTIONS, "/films")
        .add_header(ORIGIN, HeaderValue::from_static(FRONTEND))
        .add_header(ACCESS_CONTROL_REQUEST_METHOD, HeaderValue::from_static("POST"))
        .await;

    resp.assert_status_ok();
    assert_eq!(resp.header(ACCESS_CONTROL_ALLOW_ORIGIN), FRONTEND);
    assert_eq!(resp.header(ACCESS_CONTROL_ALLOW_CREDENTIALS), "true");
    let methods = resp.header(ACCESS_CONTROL_ALLOW_METHODS);
    assert!(methods.to_str().unwrap().contains("POST"));
}

#[tokio::test]
async fn should_tag_simple_requests_from_allowed_origin() {
    let resp = server()
        .get("/healthz")
        .add_header(ORIGIN, HeaderValue::from_static(FRONTEND))
        .await;
    resp.assert_status_ok();
    assert_eq!(resp.header(ACCESS_CONTROL_ALLOW_ORIGIN), FRONTEND);
}

#[tokio::test]
async fn should_withhold_cors_grant_from_other_origins() {
    let resp = server()
        .get("/healthz")
        .add_header(ORIGIN, HeaderValue::from_static("https://elsewhere.example"))
        .await;
    resp.assert_status_ok();
    assert!(resp.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
