//! Integration tests: health probe, static files, metrics and reset.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{TestApp, bearer};

#[tokio::test]
async fn healthz_is_plain_ok() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn file_server_hits_show_up_in_metrics() {
    let app = TestApp::new();

    for _ in 0..3 {
        let (status, body) = app
            .send(Method::GET, "/app/index.html", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>Chirpy</h1>");
    }
    // API traffic is not counted.
    app.send(Method::GET, "/api/healthz", None, None).await;

    let (status, page) = app.send(Method::GET, "/admin/metrics", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("<h1>Welcome, Chirpy Admin</h1>"));
    assert!(page.contains("Chirpy has been visited 3 times!"), "{page}");
}

#[tokio::test]
async fn reset_is_forbidden_outside_dev() {
    let app = TestApp::new();
    app.register("a@b.com", "pw").await;

    let (status, _) = app.send(Method::POST, "/admin/reset", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.login("a@b.com", "pw").await;
}

#[tokio::test]
async fn reset_on_dev_clears_users_sessions_and_hits() {
    let app = TestApp::with_platform("dev");
    app.register("a@b.com", "pw").await;
    let session = app.login("a@b.com", "pw").await;
    app.send(Method::GET, "/app/index.html", None, None).await;

    let (status, body) = app.send(Method::POST, "/admin/reset", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");

    let (_, page) = app.send(Method::GET, "/admin/metrics", None, None).await;
    assert!(page.contains("visited 0 times"));

    let (status, _) = app
        .json(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "a@b.com", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let refresh = format!("Bearer {}", session["refresh_token"].as_str().unwrap());
    let (status, _) = app
        .send(Method::POST, "/api/refresh", Some(&refresh), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn access_token_from_before_reset_cannot_post() {
    let app = TestApp::with_platform("dev");
    app.register("a@b.com", "pw").await;
    let session = app.login("a@b.com", "pw").await;
    let auth = bearer(&session["token"]);

    let (status, _) = app.send(Method::POST, "/admin/reset", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .json(
            Method::POST,
            "/api/chirps",
            Some(&auth),
            Some(json!({ "body": "still here?" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorized" }));
}
