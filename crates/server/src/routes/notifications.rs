//! Notification inbox endpoints.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use shopping_planner_core::NotificationId;

use crate::error::Result;
use crate::extract::ApiJson;
use crate::middleware::RequireAuth;
use crate::models::Notification;
use crate::state::AppState;

/// Mark-read request body.
#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub id: NotificationId,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}

/// `GET /notifications`
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(claim): RequireAuth,
) -> Result<Json<Vec<Notification>>> {
    let notifications = state.inbox().list(&claim.email).await?;
    Ok(Json(notifications))
}

/// `POST /notifications/mark-read`
pub async fn mark_read(
    State(state): State<AppState>,
    RequireAuth(claim): RequireAuth,
    ApiJson(body): ApiJson<MarkReadRequest>,
) -> Result<Json<Ack>> {
    state.inbox().mark_read(body.id, &claim.email).await?;
    Ok(Json(Ack { ok: true }))
}
