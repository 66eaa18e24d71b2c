use crate::admin::{health_handler, verify_password};
use crate::handlers;
use crate::middleware::{cors_layer, rate_limit_middleware, GatewayConfig, RateLimitState};
use axum::{
    middleware as axum_mw,
    routing::{get, post, put},
    Router,
};
use courtbook_security::SharedSecret;
use courtbook_session::{SessionService, SessionStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared application state.
pub struct AppState {
    /// Session lifecycle and roster operations.
    pub service: Arc<SessionService>,
    /// Organizer password.
    pub admin_secret: SharedSecret,
}

/// The HTTP gateway.
pub struct GatewayServer;

impl GatewayServer {
    /// Build the gateway with default settings (dev CORS origin, no rate limit,
    /// no admin password).
    pub fn build(sessions: Arc<dyn SessionStore>) -> Router {
        Self::build_with_config(sessions, GatewayConfig::default())
    }

    /// Build the gateway with CORS, optional rate limiting and the admin secret.
    pub fn build_with_config(sessions: Arc<dyn SessionStore>, config: GatewayConfig) -> Router {
        let state = Arc::new(AppState {
            service: Arc::new(SessionService::new(sessions)),
            admin_secret: config.admin_secret,
        });

        let api = Router::new()
            .route("/health", get(health_handler))
            .route("/admin/verify-password", post(verify_password))
            .route("/game", post(handlers::create_session))
            .route("/game/current", get(handlers::current_session))
            .route("/game/{id}", put(handlers::update_session))
            .route("/game/{id}/close", put(handlers::close_session))
            .route("/game/{id}/players", post(handlers::add_player))
            .route(
                "/game/{id}/players/{player_id}",
                put(handlers::rename_player).delete(handlers::remove_player),
            )
            .route(
                "/game/{id}/players/{player_id}/promote",
                post(handlers::promote_player),
            )
            .with_state(state);

        let app = Router::new().nest("/api", api);

        let app = match config.rate_limiter {
            Some(limiter) => app.layer(axum_mw::from_fn_with_state(
                RateLimitState {
                    limiter,
                    trust_forwarded_for: config.trust_forwarded_for,
                },
                rate_limit_middleware,
            )),
            None => app,
        };

        app.layer(cors_layer(&config.cors_origins))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve the gateway on `listener` until the server stops.
    ///
    /// Peer addresses are recorded for the rate limiter, and its idle buckets
    /// are pruned in the background for as long as the server runs.
    pub async fn serve(
        listener: TcpListener,
        sessions: Arc<dyn SessionStore>,
        config: GatewayConfig,
    ) -> std::io::Result<()> {
        let pruner = config.rate_limiter.clone().map(|limiter| {
            info!(
                idle_timeout_secs = limiter.idle_timeout().as_secs(),
                "Rate limiter pruning enabled"
            );
            limiter.spawn_pruner()
        });

        let app = Self::build_with_config(sessions, config);
        let result = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await;

        if let Some(pruner) = pruner {
            pruner.abort();
        }
        result
    }
}
