use crate::response::ApiResponse;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use courtbook_security::{RateLimiter, SharedSecret};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;

/// Origin of the bundled web client during local development.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Cross-cutting gateway settings.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Browser origins allowed to call the API with credentials.
    pub cors_origins: Vec<String>,
    /// Request throttle; `None` disables rate limiting.
    pub rate_limiter: Option<Arc<RateLimiter>>,
    /// Key rate-limit buckets on `X-Forwarded-For`; only safe behind a proxy
    /// that overwrites the header.
    pub trust_forwarded_for: bool,
    /// Organizer password for `/api/admin/verify-password`.
    pub admin_secret: SharedSecret,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            rate_limiter: None,
            trust_forwarded_for: false,
            admin_secret: SharedSecret::default(),
        }
    }
}

/// CORS policy for the configured origins. Unparsable origins are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// State of [`rate_limit_middleware`].
#[derive(Clone)]
pub struct RateLimitState {
    /// Shared bucket table.
    pub limiter: Arc<RateLimiter>,
    /// Take the client address from `X-Forwarded-For` instead of the socket.
    pub trust_forwarded_for: bool,
}

/// Rate limiting middleware, one bucket per client address.
///
/// The client is the TCP peer recorded by `ConnectInfo`. Behind a trusted
/// reverse proxy the first `X-Forwarded-For` hop is used instead, when it
/// parses as an address.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_addr(&request, state.trust_forwarded_for);

    if let Err(retry_after) = state.limiter.check(client).await {
        warn!(client = %client, "Rate limited request");
        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ApiResponse::failure("RateLimited", "Rate limit exceeded")),
        )
            .into_response();
        let secs = retry_after.as_secs().saturating_add(1);
        if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        return response;
    }

    next.run(request).await
}

fn client_addr(request: &Request, trust_forwarded_for: bool) -> IpAddr {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    if !trust_forwarded_for {
        return peer;
    }
    forwarded_for(request.headers()).unwrap_or(peer)
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|hop| hop.trim().parse().ok())
}
