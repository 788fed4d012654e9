use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt as _;
use url::Url;

use super::{cmd::app, cookies::CookieKey};
use crate::{AppConfig, AppState};

pub(crate) fn test_state(pool: PgPool) -> AppState {
    AppState {
        app: AppConfig {
            base_url: Url::parse("http://localhost:3000").unwrap(),
            cors_origins: vec!["http://localhost:8080".to_string()],
        },
        db: pool,
        cookie_key: CookieKey(tower_cookies::Key::generate()),
    }
}

pub(crate) fn create_test_app(pool: PgPool) -> Router {
    app(test_state(pool))
}

pub(crate) async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub(crate) async fn json_request(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    };

    send(app, request.unwrap()).await
}

pub(crate) async fn get_page(app: &Router, path: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder()
        .uri(path)
        .header(header::ACCEPT, "text/html");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    send(app, builder.body(Body::empty()).unwrap()).await
}

pub(crate) async fn post_form<F: Serialize>(
    app: &Router,
    path: &str,
    form: &F,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let body = serde_urlencoded::to_string(form).unwrap();
    send(app, builder.body(Body::from(body)).unwrap()).await
}

/// The `name=value` part of the first `Set-Cookie` header.
pub(crate) fn session_cookie(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();

    set_cookie.split(';').next().unwrap().to_string()
}

pub(crate) fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

pub(crate) async fn response_body_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

pub(crate) async fn response_body_text(response: Response<Body>) -> String {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body_bytes.to_vec()).unwrap()
}
