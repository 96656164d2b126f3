use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, security_headers_middleware, trace_id,
};
use crate::routes::{gadgets, health, openapi};
use domain::services::{GadgetService, GadgetStore};

#[derive(Clone)]
pub struct AppState {
    pub gadgets: GadgetService,
    pub config: Arc<Config>,
    /// Present only with the Postgres backend; used for pool gauges.
    pub pool: Option<PgPool>,
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

pub fn create_app(config: Config, store: Arc<dyn GadgetStore>, pool: Option<PgPool>) -> Router {
    let config = Arc::new(config);
    let cors = cors_layer(&config);
    let hsts_enabled = config.security.hsts_enabled;

    let state = AppState {
        gadgets: GadgetService::new(store),
        config: config.clone(),
        pool,
    };

    let gadget_routes = Router::new()
        .route(
            "/api/v1/gadgets",
            get(gadgets::list_gadgets)
                .post(gadgets::create_gadget)
                .patch(gadgets::update_gadget)
                .delete(gadgets::decommission_gadget),
        )
        .route(
            "/api/v1/gadgets/:id/self-destruct",
            post(gadgets::self_destruct_gadget),
        );

    let public_routes = Router::new()
        .route("/", get(health::root))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let openapi_routes = Router::new()
        .route("/api/v1/docs", get(openapi::swagger_ui_redirect))
        .route("/api/v1/docs/", get(openapi::swagger_ui))
        .route("/api/v1/docs/openapi.yaml", get(openapi::openapi_spec))
        .route("/api/v1/docs/*path", get(openapi::swagger_ui));

    Router::new()
        .merge(public_routes)
        .merge(openapi_routes)
        .merge(gadget_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            hsts_enabled,
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
