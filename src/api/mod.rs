use axum::{
    Router,
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::models::user::UserRole;

mod abilities;
pub mod auth;
mod community;
mod error;
mod heroes;
pub mod method_override;
mod observability;
mod pages;
pub mod session;
mod validation;
pub mod views;

pub use crate::state::AppState;
pub use error::{AppError, ErrorKind, JsonError, WithLink};

use metrics_exporter_prometheus::PrometheusHandle;

pub const SESSION_COOKIE: &str = "herodex.sid";

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    Ok(Arc::new(AppState::from_config(config, prometheus_handle).await?))
}

pub fn router(state: Arc<AppState>) -> Router {
    let config = state.config.clone();

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE)
        .with_secure(config.server.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            config.server.session_inactivity_minutes,
        )));

    let static_files = ServeDir::new(state.uploads.root())
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(pages::not_found.into_service());

    let app = Router::new()
        .route("/", get(pages::index))
        .route("/feedback", get(pages::feedback_page))
        .route("/auth", get(pages::auth_page))
        .route("/registration", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/feedback_answer", post(community::feedback_answer))
        .route("/hero/{name}", get(pages::hero_page))
        .route("/add_comment", post(community::add_comment))
        .route("/get_abilities/{hero_id}", get(abilities::get_abilities))
        .merge(create_admin_router(&config))
        .fallback_service(static_files)
        .layer(session_layer)
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Method override has to rewrite the request before routing happens.
    Router::new()
        .fallback_service(app)
        .layer(middleware::from_fn(method_override::method_override))
}

fn create_admin_router(config: &Config) -> Router<Arc<AppState>> {
    let upload_limit = DefaultBodyLimit::max(config.max_upload_bytes());

    Router::new()
        .route("/admin", get(pages::admin_page))
        .route("/get_feedback", get(community::get_feedback))
        .route(
            "/Add_card",
            post(heroes::add_card).layer(upload_limit),
        )
        .route("/Delete_card", delete(heroes::delete_card))
        .route("/edit_hero/{hero_id}", get(heroes::edit_hero_page))
        .route(
            "/hero_edit/{hero_id}",
            put(heroes::hero_edit).layer(upload_limit),
        )
        .route(
            "/Add_ability",
            post(abilities::add_ability).layer(upload_limit),
        )
        .route(
            "/edit_ability/{ability_id}",
            put(abilities::edit_ability).layer(upload_limit),
        )
        .route(
            "/delete_ability/{ability_id}",
            delete(abilities::delete_ability),
        )
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(
            UserRole::Admin,
            auth::require_role,
        ))
}
