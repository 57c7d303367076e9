//! Router tests driven through `oneshot`

use super::*;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

fn app() -> Router {
    router(&ServerConfig::default())
}

fn form_post(body: &'static str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/name")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn read_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_post_name_composes_full_name() {
    let resp = app().oneshot(form_post("first=Juan&last=Perez")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_json(resp).await, serde_json::json!({"name": "Juan Perez"}));
}

#[tokio::test]
async fn test_post_name_decodes_form_encoding() {
    let resp = app()
        .oneshot(form_post("first=Ana+Mar%C3%ADa&last=G%C3%B3mez"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        read_json(resp).await,
        serde_json::json!({"name": "Ana María Gómez"})
    );
}

#[tokio::test]
async fn test_post_name_missing_last_is_400() {
    let resp = app().oneshot(form_post("first=Juan")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(resp).await,
        serde_json::json!({"error": MISSING_NAME_MESSAGE})
    );
}

#[tokio::test]
async fn test_post_name_empty_field_is_400() {
    let resp = app().oneshot(form_post("first=&last=Perez")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_post_name_without_form_content_type_is_400() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/name")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"first":"Juan","last":"Perez"}"#))
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(resp).await,
        serde_json::json!({"error": MISSING_NAME_MESSAGE})
    );
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let config = ServerConfig::builder().body_limit(16).build();
    let resp = router(&config)
        .oneshot(form_post("first=Juan&last=Perezzzzzzzzzzzzzzzzzzzz"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_name_is_method_not_allowed() {
    let req = Request::builder()
        .method(Method::GET)
        .uri("/name")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_index_served_from_views_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<form>hello</form>").unwrap();
    let config = ServerConfig::builder().views_dir(dir.path()).build();

    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let resp = router(&config).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"<form>hello</form>");
}

#[tokio::test]
async fn test_missing_index_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig::builder().views_dir(dir.path()).build();

    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let resp = router(&config).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let req = Request::builder().uri("/nope").body(Body::empty()).unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
