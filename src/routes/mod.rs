pub mod announcements;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::{config::Config, middleware, AppState};

const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let request_timeout = state.config.request_timeout;

    Router::new()
        .route(
            "/health",
            get(health::health_check)
                .head(announcements::method_not_allowed)
                .fallback(announcements::method_not_allowed),
        )
        .route(
            "/admin/announcements",
            get(announcements::list_admin_announcements)
                .post(announcements::create_announcement)
                .head(announcements::method_not_allowed)
                .fallback(announcements::method_not_allowed),
        )
        .route(
            "/user/announcements",
            get(announcements::list_public_announcements)
                .head(announcements::method_not_allowed)
                .fallback(announcements::method_not_allowed),
        )
        .layer(
            ServiceBuilder::new()
                .layer(middleware::trace::layer())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                ))
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match &config.cors_allowed_origins {
        Some(origins) => AllowOrigin::list(origins.iter().filter_map(|o| {
            HeaderValue::from_str(o)
                .map_err(|_| tracing::warn!("Ignoring invalid CORS origin: {o}"))
                .ok()
        })),
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-admin-token"),
        ])
        .allow_origin(origin)
}
