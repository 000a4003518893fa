use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::time::Duration;

pub const STATS_PATH: &str = "/api/unbound/overview/totals/100";

/// "key:secret" base64-encoded.
const EXPECTED_AUTH: &str = "Basic a2V5OnNlY3JldA==";

#[derive(Clone)]
pub enum UpstreamBehavior {
    Json(Value),
    Status(StatusCode),
    Body(&'static str),
    Slow(Duration),
}

/// Serve `behavior` on a loopback port; requests without the expected Basic
/// credentials get a 401.
pub async fn spawn_upstream(behavior: UpstreamBehavior) -> SocketAddr {
    let app = Router::new().route(
        STATS_PATH,
        get(move |headers: HeaderMap| {
            let behavior = behavior.clone();
            async move { respond(behavior, headers).await }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// A loopback port with nothing listening on it.
pub async fn unused_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

async fn respond(behavior: UpstreamBehavior, headers: HeaderMap) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == EXPECTED_AUTH);
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match behavior {
        UpstreamBehavior::Json(value) => axum::Json(value).into_response(),
        UpstreamBehavior::Status(status) => status.into_response(),
        UpstreamBehavior::Body(body) => body.into_response(),
        UpstreamBehavior::Slow(delay) => {
            tokio::time::sleep(delay).await;
            axum::Json(serde_json::json!({"total": 1})).into_response()
        }
    }
}
