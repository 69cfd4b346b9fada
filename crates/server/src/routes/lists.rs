//! Weekly list endpoints.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderName},
};
use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};

use shopping_planner_core::{ItemId, ItemStatus, ListId, parse_weekday};

use super::{current_family, require_family};
use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAuth;
use crate::models::{ArchivedItems, Item, ItemWithAuthor, List};
use crate::services::lists::today;
use crate::services::ServiceError;
use crate::state::AppState;

/// Header that lets operators archive as if it were another day.
pub const CURRENT_DAY_HEADER: HeaderName = HeaderName::from_static("x-current-day");

/// The active list, or nothing for a caller without a family.
#[derive(Debug, Serialize)]
pub struct CurrentListResponse {
    pub list: Option<List>,
    pub items: Vec<ItemWithAuthor>,
}

/// Add-item request body.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    #[serde(default)]
    pub name: String,
    pub quantity: Option<String>,
}

/// Status update request body.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// Delete acknowledgement.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub ok: bool,
    pub deleted: bool,
}

/// The list opened by an archive.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Archived {
    pub ok: bool,
    pub new_list: List,
}

/// `GET /lists/current`
pub async fn current(
    State(state): State<AppState>,
    RequireAuth(claim): RequireAuth,
) -> Result<Json<CurrentListResponse>> {
    let Some(family_id) = current_family(&state, &claim).await? else {
        return Ok(Json(CurrentListResponse {
            list: None,
            items: Vec::new(),
        }));
    };

    let current = state.lists().get_current_list(family_id).await?;
    Ok(Json(CurrentListResponse {
        list: Some(current.list),
        items: current.items,
    }))
}

/// `POST /lists/items`
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(claim): RequireAuth,
    ApiJson(body): ApiJson<AddItemRequest>,
) -> Result<Json<Item>> {
    let family_id = require_family(&state, &claim).await?;
    let item = state
        .lists()
        .add_item(family_id, claim.user_id, &body.name, body.quantity.as_deref())
        .await?;
    Ok(Json(item))
}

/// `PATCH /lists/items/{id}`
pub async fn set_item_status(
    State(state): State<AppState>,
    RequireAuth(claim): RequireAuth,
    ApiPath(item_id): ApiPath<ItemId>,
    ApiJson(body): ApiJson<SetStatusRequest>,
) -> Result<Json<Item>> {
    let status = body
        .status
        .parse::<ItemStatus>()
        .map_err(ServiceError::from)?;
    let family_id = require_family(&state, &claim).await?;
    let item = state
        .lists()
        .set_item_status(family_id, item_id, status)
        .await?;
    Ok(Json(item))
}

/// `DELETE /lists/items/{id}`
pub async fn delete_item(
    State(state): State<AppState>,
    RequireAuth(claim): RequireAuth,
    ApiPath(item_id): ApiPath<ItemId>,
) -> Result<Json<Deleted>> {
    let family_id = require_family(&state, &claim).await?;
    let deleted = state.lists().delete_item(family_id, item_id).await?;
    Ok(Json(Deleted { ok: true, deleted }))
}

/// `POST /lists/archive-week`
pub async fn archive_week(
    State(state): State<AppState>,
    RequireAuth(claim): RequireAuth,
    headers: HeaderMap,
) -> Result<Json<Archived>> {
    let day = effective_day(&headers, state.config().allow_day_override)?;
    let family_id = require_family(&state, &claim).await?;
    let new_list = state.lists().archive_week(family_id, day).await?;
    Ok(Json(Archived { ok: true, new_list }))
}

/// `GET /lists/archives`
pub async fn archives(
    State(state): State<AppState>,
    RequireAuth(claim): RequireAuth,
) -> Result<Json<Vec<List>>> {
    let Some(family_id) = current_family(&state, &claim).await? else {
        return Ok(Json(Vec::new()));
    };
    let lists = state.lists().list_archived_lists(family_id).await?;
    Ok(Json(lists))
}

/// `GET /lists/{id}/items`
pub async fn archived_items(
    State(state): State<AppState>,
    RequireAuth(claim): RequireAuth,
    ApiPath(list_id): ApiPath<ListId>,
) -> Result<Json<ArchivedItems>> {
    let family_id = require_family(&state, &claim).await?;
    let items = state
        .lists()
        .get_archived_list_items(family_id, list_id)
        .await?;
    Ok(Json(items))
}

/// The day used to gate an archive: today's weekday, or the
/// `X-Current-Day` header when overrides are enabled.
fn effective_day(headers: &HeaderMap, allow_override: bool) -> Result<Weekday> {
    if allow_override && let Some(value) = headers.get(&CURRENT_DAY_HEADER) {
        let value = value
            .to_str()
            .map_err(|_| AppError::BadRequest("invalid X-Current-Day header".to_string()))?;
        return parse_weekday(value).map_err(|e| AppError::BadRequest(e.to_string()));
    }
    Ok(today().weekday())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(day: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CURRENT_DAY_HEADER, HeaderValue::from_str(day).unwrap());
        headers
    }

    #[test]
    fn test_override_honoured_when_enabled() {
        assert_eq!(effective_day(&headers("Tuesday"), true).unwrap(), Weekday::Tue);
        assert_eq!(effective_day(&headers("sat"), true).unwrap(), Weekday::Sat);
    }

    #[test]
    fn test_override_ignored_when_disabled() {
        let day = effective_day(&headers("Tuesday"), false).unwrap();
        assert_eq!(day, today().weekday());
    }

    #[test]
    fn test_bad_override_rejected() {
        assert!(matches!(
            effective_day(&headers("Caturday"), true),
            Err(AppError::BadRequest(_))
        ));
    }
}
