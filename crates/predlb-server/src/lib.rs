//! predlb-server
//!
//! HTTP surface for subjects, examination sessions and modality records,
//! plus the probability and report endpoints that consume predictions.

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/modalities", get(routes::modalities::list_modalities))
        .route("/users", post(routes::users::create_user))
        .route(
            "/subjects",
            get(routes::subjects::list_subjects).post(routes::subjects::create_subject),
        )
        .route(
            "/subjects/{code}",
            get(routes::subjects::get_subject).put(routes::subjects::update_subject),
        )
        .route(
            "/subjects/{code}/sessions",
            get(routes::sessions::list_sessions).post(routes::sessions::create_session),
        )
        .route("/sessions/{id}", get(routes::sessions::get_session))
        .route(
            "/sessions/{id}/records/{modality}",
            put(routes::records::put_record),
        )
        .route(
            "/subjects/{code}/probability",
            get(routes::predictions::subject_probability),
        )
        .route(
            "/sessions/{id}/probability",
            get(routes::predictions::session_probability),
        )
        .route("/subjects/{code}/report", get(routes::reports::subject_report))
        .layer(
            ServiceBuilder::new()
                .layer(axum_mw::from_fn(middleware::audit::audit_log))
                .layer(cors),
        )
        .with_state(state)
}
