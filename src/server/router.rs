use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::media::MediaStore;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub media: MediaStore,
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/auth/signup", post(super::auth::signup))
        .route("/auth/signin", post(super::auth::signin))
        .route("/auth/signout", post(super::auth::signout))
        .route("/auth/me", get(super::auth::me))
        .route(
            "/sets",
            get(super::sets::list_sets).post(super::sets::create_set),
        )
        .route(
            "/sets/{id}",
            get(super::sets::get_set)
                .patch(super::sets::update_set)
                .delete(super::sets::delete_set),
        )
        .route(
            "/sets/{id}/cards",
            get(super::cards::list_cards).put(super::cards::save_cards),
        )
        .route("/discover", get(super::discover::list_discoverable))
        .route("/repository", post(super::repository::add_entry))
        .route(
            "/repository/{set_id}",
            axum::routing::delete(super::repository::remove_entry),
        )
        .route("/subjects", get(super::topics::list_subjects))
        .route("/subjects/{id}/topics", get(super::topics::list_topics))
        .route("/topics/{id}", get(super::topics::get_topic))
        .route("/profile", patch(super::profile::update_profile))
        .route("/profile/avatar", put(super::profile::upload_avatar))
        .route("/users/{id}/avatar", get(super::profile::get_avatar));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
