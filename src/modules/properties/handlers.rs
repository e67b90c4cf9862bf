use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{IssueCode, NewProperty, UserType};
use crate::db::repositories::{CodeRepository, PropertyRepository, UserRepository};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    pub owner_email: String,
}

pub async fn add_property(
    State(state): State<AppState>,
    Json(payload): Json<NewProperty>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;

    let owner = UserRepository::find_by_email(&state.db, &payload.owner_email, UserType::Owner)
        .await?
        .ok_or_else(|| AppError::NotFound("Owner not found".to_string()))?;

    let property = PropertyRepository::create(&state.db, owner.id, &payload, Utc::now()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "property": property })),
    ))
}

pub async fn list_properties(
    State(state): State<AppState>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<Value>, AppError> {
    let properties = PropertyRepository::list_by_owner_email(&state.db, &params.owner_email).await?;

    Ok(Json(json!({ "properties": properties })))
}

/// Issue (or re-issue) the connection code for one unit.
pub async fn generate_code(
    State(state): State<AppState>,
    Json(payload): Json<IssueCode>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;

    let code = CodeRepository::issue(
        &state.db,
        payload.property_id,
        &payload.unit,
        payload.rent_amount,
        Utc::now(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "code": code.code,
            "expires_at": code.expires_at,
        })),
    ))
}
