//! Bearer token authentication.
//!
//! Every planner endpoint except registration, login and the health checks
//! requires `Authorization: Bearer <token>`.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use shopping_planner_core::IdentityClaim;

use crate::error::{AppError, set_sentry_user};
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// The claim's family may be stale; handlers that act on a family read the
/// caller's membership from the store.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(claim): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", claim.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub IdentityClaim);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

        let claim = state.jwt().verify(token)?;
        set_sentry_user(&claim.user_id, Some(claim.email.as_str()));

        Ok(Self(claim))
    }
}

/// The token from an `Authorization: Bearer` header, if present.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
