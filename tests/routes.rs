mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tinee::application::services::Shortener;
use tinee::routes::app_router;
use tower::ServiceExt;

#[tokio::test]
async fn test_shorten_and_follow_through_full_router() {
    let state = common::create_test_state();
    let app = app_router(state);

    let response = app
        .clone()
        .oneshot(
            Request::post("/api/v1/shorten")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"url":"https://example.com/page","alias":"mylink"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/mylink").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://example.com/page"
    );
}

#[tokio::test]
async fn test_trailing_slash_is_normalized() {
    let state = common::create_test_state();
    state
        .shortener
        .shorten("https://a.com", "mylink")
        .await
        .unwrap();
    let app = app_router(state);

    let response = app
        .oneshot(Request::get("/mylink/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_health_alias_is_not_shadowed() {
    let state = common::create_test_state();
    state
        .shortener
        .shorten("https://a.com", "health")
        .await
        .unwrap();
    let app = app_router(state);

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_alias_is_not_found() {
    let app = app_router(common::create_test_state());

    let response = app
        .oneshot(Request::get("/missing1").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_control_character_url_is_never_stored() {
    let state = common::create_test_state();
    let app = app_router(state);

    let response = app
        .clone()
        .oneshot(
            Request::post("/api/v1/shorten")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"url":"https://example.com/a\u0001b","alias":"ctrl1"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(Request::get("/ctrl1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stored_urls_always_redirect() {
    let state = common::create_test_state();
    for (url, alias) in [
        ("https://example.com/page?q=1&r=two#frag", "query1"),
        ("https://EXAMPLE.com/Path", "upper1"),
        ("https://example.com/%01", "escaped1"),
    ] {
        state.shortener.shorten(url, alias).await.unwrap();
    }
    let app = app_router(state);

    for (url, alias) in [
        ("https://example.com/page?q=1&r=two#frag", "query1"),
        ("https://EXAMPLE.com/Path", "upper1"),
        ("https://example.com/%01", "escaped1"),
    ] {
        let response = app
            .clone()
            .oneshot(Request::get(format!("/{alias}")).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{alias}");
        assert_eq!(response.headers()[header::LOCATION], url);
    }
}
