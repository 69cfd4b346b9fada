//! Family membership endpoints.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use shopping_planner_core::FamilyId;

use super::current_family;
use crate::error::Result;
use crate::extract::ApiJson;
use crate::middleware::RequireAuth;
use crate::models::{Family, Member};
use crate::state::AppState;

/// Create-family request body.
#[derive(Debug, Deserialize)]
pub struct CreateFamilyRequest {
    #[serde(default)]
    pub nickname: String,
}

/// A family plus the caller's refreshed token.
#[derive(Debug, Serialize)]
pub struct CreateFamilyResponse {
    pub family: Family,
    pub token: String,
}

/// The caller's family.
#[derive(Debug, Serialize)]
pub struct FamilyResponse {
    pub family: Family,
}

/// Acknowledgement carrying a refreshed token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipChanged {
    pub ok: bool,
    pub token: String,
    pub family_id: Option<FamilyId>,
}

/// `POST /family/create`
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(claim): RequireAuth,
    ApiJson(body): ApiJson<CreateFamilyRequest>,
) -> Result<Json<CreateFamilyResponse>> {
    let (family, claim) = state
        .registry()
        .create_family(claim.user_id, &claim.email, &body.nickname)
        .await?;
    let token = state.auth().reissue(&claim)?;

    Ok(Json(CreateFamilyResponse { family, token }))
}

/// `GET /family/me`
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(claim): RequireAuth,
) -> Result<Json<FamilyResponse>> {
    let family = state.registry().get_family(claim.user_id).await?;
    Ok(Json(FamilyResponse { family }))
}

/// `GET /family/members`
///
/// Empty for a caller without a family.
pub async fn members(
    State(state): State<AppState>,
    RequireAuth(claim): RequireAuth,
) -> Result<Json<Vec<Member>>> {
    let Some(family_id) = current_family(&state, &claim).await? else {
        return Ok(Json(Vec::new()));
    };
    let members = state.registry().list_members(family_id).await?;
    Ok(Json(members))
}

/// `POST /family/leave`
pub async fn leave(
    State(state): State<AppState>,
    RequireAuth(claim): RequireAuth,
) -> Result<Json<MembershipChanged>> {
    let claim = state
        .registry()
        .leave_family(claim.user_id, &claim.email)
        .await?;
    let token = state.auth().reissue(&claim)?;

    Ok(Json(MembershipChanged {
        ok: true,
        token,
        family_id: None,
    }))
}
