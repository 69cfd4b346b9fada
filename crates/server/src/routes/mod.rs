//! HTTP route handlers for the planner API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                        - Service banner
//! GET    /health                  - Liveness check
//! GET    /health/ready            - Database readiness check
//!
//! # Auth
//! POST   /auth/register           - Register and receive a token
//! POST   /auth/login              - Login and receive a token
//!
//! # Family (requires auth)
//! POST   /family/create           - Create a family, caller becomes admin
//! GET    /family/me               - The caller's family
//! GET    /family/members          - Members of the caller's family
//! POST   /family/leave            - Leave the current family
//!
//! # Invites (requires auth)
//! GET    /invites                 - Invites issued by the caller's family
//! POST   /invites                 - Invite a registered user by email
//! POST   /invites/join            - Join with a family or invite token
//!
//! # Lists (requires auth)
//! GET    /lists/current           - Active list with items
//! POST   /lists/items             - Add an item to the active list
//! PATCH  /lists/items/{id}        - Set an item's status
//! DELETE /lists/items/{id}        - Delete an item
//! POST   /lists/archive-week      - Archive the week on the rollover day
//! GET    /lists/archives          - Archived lists, newest week first
//! GET    /lists/{id}/items        - Items of an archived list
//!
//! # Notifications (requires auth)
//! GET    /notifications           - The caller's inbox
//! POST   /notifications/mark-read - Mark one notification read
//! ```

pub mod auth;
pub mod family;
pub mod health;
pub mod invites;
pub mod lists;
pub mod notifications;

use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use shopping_planner_core::{FamilyId, IdentityClaim};

use crate::error::Result;
use crate::middleware::request_id_middleware;
use crate::services::ServiceError;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Create the family routes router.
pub fn family_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(family::create))
        .route("/me", get(family::me))
        .route("/members", get(family::members))
        .route("/leave", post(family::leave))
}

/// Create the invite routes router.
pub fn invite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(invites::list).post(invites::create))
        .route("/join", post(invites::join))
}

/// Create the list routes router.
pub fn list_routes() -> Router<AppState> {
    Router::new()
        .route("/current", get(lists::current))
        .route("/items", post(lists::add_item))
        .route(
            "/items/{id}",
            patch(lists::set_item_status).delete(lists::delete_item),
        )
        .route("/archive-week", post(lists::archive_week))
        .route("/archives", get(lists::archives))
        .route("/{id}/items", get(lists::archived_items))
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list))
        .route("/mark-read", post(notifications::mark_read))
}

/// Create all routes for the planner API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::banner))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/auth", auth_routes())
        .nest("/family", family_routes())
        .nest("/invites", invite_routes())
        .nest("/lists", list_routes())
        .nest("/notifications", notification_routes())
}

/// Build the full application with middleware and state.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// The caller's family, read from the membership store.
///
/// The token's affiliation can be stale after a join or leave in another
/// session, so family-scoped handlers never trust it.
pub(crate) async fn current_family(
    state: &AppState,
    claim: &IdentityClaim,
) -> Result<Option<FamilyId>> {
    let membership = state.registry().membership(claim.user_id).await?;
    Ok(membership.map(|m| m.family_id))
}

/// Like [`current_family`], failing with not found for a caller without one.
pub(crate) async fn require_family(state: &AppState, claim: &IdentityClaim) -> Result<FamilyId> {
    current_family(state, claim)
        .await?
        .ok_or_else(|| ServiceError::not_found("not in a family").into())
}
