//! # quill-api
//!
//! HTTP surface for quill: session issuance over HTTP-only JWT cookies,
//! registration, and per-user note/tag/profile endpoints.

pub mod cookies;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

use axum::http::{header, HeaderValue, Method, Request};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use handlers::{notes, session, tags, users};
pub use state::AppState;

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful
/// for log correlation when chasing a request across subsystems.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Build the CORS layer from the configured origins.
///
/// Credentials must be allowed since the session rides in cookies, which
/// rules out a wildcard origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        // Sessions
        .route("/token/", post(session::login))
        .route("/token/refresh/", post(session::refresh))
        .route("/token/verify", get(session::verify))
        .route("/logout/", post(session::logout))
        // Accounts
        .route("/register/", post(users::register))
        .route("/me/", get(users::me))
        .route(
            "/user/profile/",
            get(users::get_profile)
                .put(users::update_profile)
                .patch(users::update_profile),
        )
        // Notes
        .route("/notes/", get(notes::list_notes).post(notes::create_note))
        .route(
            "/note/:id/",
            get(notes::get_note)
                .put(notes::update_note)
                .patch(notes::update_note)
                .delete(notes::delete_note),
        )
        // Tags
        .route("/tags/", get(tags::list_tags))
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .with_state(state)
}
