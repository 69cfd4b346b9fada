//! Invite endpoints.

use axum::{Json, extract::State};
use serde::Deserialize;

use super::{current_family, require_family};
use super::family::MembershipChanged;
use crate::error::Result;
use crate::extract::ApiJson;
use crate::middleware::RequireAuth;
use crate::models::Invite;
use crate::state::AppState;

/// Create-invite request body.
#[derive(Debug, Deserialize)]
pub struct CreateInviteRequest {
    #[serde(default)]
    pub email: String,
}

/// Join request body.
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    #[serde(default)]
    pub token: String,
}

/// `GET /invites`
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(claim): RequireAuth,
) -> Result<Json<Vec<Invite>>> {
    let Some(family_id) = current_family(&state, &claim).await? else {
        return Ok(Json(Vec::new()));
    };
    let invites = state.invites().list_invites(family_id).await?;
    Ok(Json(invites))
}

/// `POST /invites`
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(claim): RequireAuth,
    ApiJson(body): ApiJson<CreateInviteRequest>,
) -> Result<Json<Invite>> {
    let family_id = require_family(&state, &claim).await?;
    let invite = state.invites().create_invite(family_id, &body.email).await?;
    Ok(Json(invite))
}

/// `POST /invites/join`
pub async fn join(
    State(state): State<AppState>,
    RequireAuth(claim): RequireAuth,
    ApiJson(body): ApiJson<JoinRequest>,
) -> Result<Json<MembershipChanged>> {
    let claim = state
        .join()
        .join_with_token(claim.user_id, &claim.email, &body.token)
        .await?;
    let token = state.auth().reissue(&claim)?;

    Ok(Json(MembershipChanged {
        ok: true,
        token,
        family_id: claim.family_id(),
    }))
}
