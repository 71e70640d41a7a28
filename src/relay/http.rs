//! HTTP surface of the relay: one function endpoint, any method, JSON out.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::any,
};
use tracing::error;

use crate::relay::{CONTENT_TYPE_JSON, RelayHttpRequest, SubmissionRelay};

/// Path the site's contact form posts to.
pub const FUNCTION_PATH: &str = "/.netlify/functions/send-email";

const FALLBACK_BODY: &str = r#"{"success":false,"error":"Internal server error"}"#;

/// Creates the router serving [`FUNCTION_PATH`].
pub fn create_router(relay: Arc<SubmissionRelay>) -> Router {
    Router::new()
        .route(FUNCTION_PATH, any(send_email_handler))
        .with_state(relay)
}

async fn send_email_handler(
    State(relay): State<Arc<SubmissionRelay>>,
    method: Method,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    body: Bytes,
) -> Response {
    let request = RelayHttpRequest {
        method: method.as_str().to_owned(),
        body: String::from_utf8(body.to_vec()).ok(),
        remote_ip: client_ip(&headers).or(peer.map(|ConnectInfo(addr)| addr.ip())),
    };

    let response = relay.handle(request).await;
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match response.to_json() {
        Ok(json) => (status, [(header::CONTENT_TYPE, CONTENT_TYPE_JSON)], json).into_response(),
        Err(err) => {
            error!(error = %err, "failed to encode relay response");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, CONTENT_TYPE_JSON)],
                FALLBACK_BODY,
            )
                .into_response()
        }
    }
}

/// First address of `X-Forwarded-For`, as set by the fronting proxy.
fn client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::client::fake::FakeTransport;
    use crate::config::{Environment, RelayConfig};

    use super::*;

    fn app(environment: Environment) -> Router {
        let config = RelayConfig {
            environment,
            ..RelayConfig::default()
        };
        let relay = SubmissionRelay::with_transport(config, Arc::new(FakeTransport::new()));
        create_router(Arc::new(relay))
    }

    async fn call(app: Router, method: &str, body: &str) -> (StatusCode, String, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(FUNCTION_PATH)
                    .body(Body::from(body.to_owned()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let content_type = response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .to_owned();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn get_is_method_not_allowed() {
        let (status, content_type, body) = call(app(Environment::Test), "GET", "").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(content_type, "application/json");
        assert_eq!(body, r#"{"error":"Method not allowed"}"#);
    }

    #[tokio::test]
    async fn invalid_json_is_bad_request() {
        let (status, _, body) = call(app(Environment::Test), "POST", "invalid json {").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"error":"Invalid JSON in request body"}"#);
    }

    #[tokio::test]
    async fn demo_submission_is_accepted() {
        let (status, _, body) = call(
            app(Environment::Development),
            "POST",
            r#"{"email":"test@example.com","projectIdea":"Test project"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("demo"));
    }

    #[test]
    fn forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        assert_eq!(client_ip(&headers), Some("203.0.113.7".parse().unwrap()));

        headers.insert("x-forwarded-for", "garbage".parse().unwrap());
        assert_eq!(client_ip(&headers), None);
    }
}
