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
use crate::db::models::{NewTenancy, RedeemCode, RemoveTenancy};
use crate::db::repositories::{CodeRepository, TenancyRepository};
use crate::error::AppError;
use crate::rent;

#[derive(Debug, Deserialize)]
pub struct TenantQuery {
    pub email: String,
}

/// Redeem a connection code and bind the tenant to the unit.
pub async fn connect_with_code(
    State(state): State<AppState>,
    Json(payload): Json<RedeemCode>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let redemption = CodeRepository::redeem(
        &state.db,
        &payload.code,
        &payload.tenant_email,
        Utc::now(),
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Successfully connected to property",
        "property": redemption.property_name,
        "tenancy_id": redemption.tenancy_id,
    })))
}

/// Direct owner assignment, bypassing the code flow.
pub async fn add_tenancy(
    State(state): State<AppState>,
    Json(payload): Json<NewTenancy>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;

    let tenancy = TenancyRepository::assign(&state.db, &payload, Utc::now()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "tenancy": tenancy })),
    ))
}

/// Tenant dashboard: tenancy, property and owner details plus the rent
/// position derived fresh from the stored fields.
pub async fn tenant_info(
    State(state): State<AppState>,
    Query(params): Query<TenantQuery>,
) -> Result<Json<Value>, AppError> {
    let overview = TenancyRepository::overview_by_email(&state.db, &params.email).await?;

    let Some(overview) = overview else {
        // Known tenant without a unit yet: nothing to report.
        return Ok(Json(json!({ "tenancy": null, "rent": null })));
    };

    let due_day = u8::try_from(overview.rent_due_day).unwrap_or(rent::DEFAULT_RENT_DUE_DAY);
    let position = rent::rent_position(overview.last_payment_date, due_day, Utc::now());

    Ok(Json(json!({
        "tenancy": {
            "id": overview.id,
            "property": {
                "id": overview.property_id,
                "name": overview.property_name,
                "address": overview.property_address,
                "unit": overview.unit_number,
            },
            "owner": {
                "name": overview.owner_name,
                "email": overview.owner_email,
            },
            "tenant": {
                "name": overview.tenant_name,
                "email": overview.tenant_email,
            },
        },
        "rent": {
            "amount": overview.rent_amount,
            "status": position.status,
            "due_date": position.due_date,
            "days_until_due": position.days_until_due,
            "last_payment_date": overview.last_payment_date,
            "rent_due_day": overview.rent_due_day,
        },
    })))
}

pub async fn remove_tenancy(
    State(state): State<AppState>,
    Json(payload): Json<RemoveTenancy>,
) -> Result<Json<Value>, AppError> {
    TenancyRepository::remove(&state.db, payload.tenancy_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Tenant removed successfully",
    })))
}
