pub mod auth;
pub mod client_ip;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod flash;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, HeaderValue};
use sqlx::PgPool;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::Mailer;
use crate::middleware::auth_redirect::redirect_unauthorized;
use crate::rate_limit::LoginRateLimiter;
use crate::state::{AppState, SharedState};

pub fn build_app(pool: PgPool, config: Config) -> Router {
    let mailer = config.smtp.as_ref().and_then(|smtp| match Mailer::new(smtp) {
        Ok(mailer) => {
            tracing::info!("SMTP configured");
            Some(Arc::new(mailer))
        }
        Err(e) => {
            tracing::warn!("SMTP not available: {e}");
            None
        }
    });

    let state: SharedState = Arc::new(AppState {
        pool,
        config,
        mailer,
        login_limiter: LoginRateLimiter::new(),
    });

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new("static"))
        .route("/health", axum::routing::get(health))
        .layer(axum::middleware::from_fn(redirect_unauthorized))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
