//! # chirpy_api
//!
//! HTTP API library for Chirpy.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use chirpy_core::auth::password::PasswordHasher;
use chirpy_core::store::Store;

use crate::config::ApiConfig;
use crate::handlers::{admin, auth, chirps, health, polka, users};
use crate::middleware::auth::{require_api_key, require_auth};
use crate::middleware::metrics::count_fileserver_hits;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend.
    pub store: Arc<dyn Store>,
    /// API configuration.
    pub config: ApiConfig,
    pub hasher: PasswordHasher,
    /// Requests served under `/app/` since start or the last reset.
    pub fileserver_hits: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: ApiConfig) -> Self {
        Self {
            store,
            hasher: PasswordHasher::new(config.bcrypt_cost),
            config,
            fileserver_hits: Arc::new(AtomicU64::new(0)),
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let bearer = from_fn_with_state(state.clone(), require_auth);
    let api_key = from_fn_with_state(state.clone(), require_api_key);

    // Public and bearer-protected methods share paths, so the auth layer is
    // attached per method.
    let api = Router::new()
        .route("/api/healthz", get(health::healthz))
        .route(
            "/api/users",
            post(users::create_user_handler)
                .merge(put(users::update_user_handler).route_layer(bearer.clone())),
        )
        .route("/api/login", post(auth::login_handler))
        .route("/api/refresh", post(auth::refresh_handler))
        .route("/api/revoke", post(auth::revoke_handler))
        .route(
            "/api/chirps",
            get(chirps::list_chirps_handler)
                .merge(post(chirps::create_chirp_handler).route_layer(bearer.clone())),
        )
        .route(
            "/api/chirps/{chirp_id}",
            get(chirps::get_chirp_handler)
                .merge(delete(chirps::delete_chirp_handler).route_layer(bearer)),
        )
        .route(
            "/api/polka/webhooks",
            post(polka::webhook_handler).route_layer(api_key),
        )
        .route("/admin/metrics", get(admin::metrics_handler))
        .route("/admin/reset", post(admin::reset_handler));

    let files = Router::new()
        .nest_service("/app", ServeDir::new(&state.config.filepath_root))
        .layer(from_fn_with_state(state.clone(), count_fileserver_hits));

    Router::new()
        .merge(api)
        .merge(files)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
