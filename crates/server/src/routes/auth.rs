//! Registration and login.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use shopping_planner_core::FamilyId;

use crate::error::Result;
use crate::extract::ApiJson;
use crate::models::User;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Token issued on registration or login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
    pub family_id: Option<FamilyId>,
}

/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<Json<SessionResponse>> {
    let session = state
        .auth()
        .register(&body.full_name, &body.email, &body.password)
        .await?;

    Ok(Json(SessionResponse {
        family_id: session.claim.family_id(),
        token: session.token,
        user: session.user,
    }))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let session = state.auth().login(&body.email, &body.password).await?;

    Ok(Json(SessionResponse {
        family_id: session.claim.family_id(),
        token: session.token,
        user: session.user,
    }))
}
