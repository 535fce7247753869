//! Integration tests for the admin page and static asset fallback.

mod common;

use axum::http::StatusCode;
use common::{ADMIN_HTML, INDEX_HTML, TestServer, get_raw};

#[tokio::test]
async fn test_admin_page_served_at_configured_path() {
    let server = TestServer::new().await;

    let (status, content_type, body) = get_raw(&server.router, "/notre-secret-admin").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert_eq!(body, ADMIN_HTML.as_bytes());
}

#[tokio::test]
async fn test_custom_admin_path() {
    let server = TestServer::with_config(|config| {
        config.server.admin_path = "/my-admin".to_string();
    })
    .await;

    let (status, _, body) = get_raw(&server.router, "/my-admin").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ADMIN_HTML.as_bytes());

    let (status, _, _) = get_raw(&server.router, "/notre-secret-admin").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_index_is_fallback() {
    let server = TestServer::new().await;

    let (status, _, body) = get_raw(&server.router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, INDEX_HTML.as_bytes());

    let (status, _, _) = get_raw(&server.router, "/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
