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
use crate::db::models::RecordPayment;
use crate::db::repositories::PaymentRepository;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub tenant_email: String,
}

pub async fn record_payment(
    State(state): State<AppState>,
    Json(payload): Json<RecordPayment>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;

    let payment = PaymentRepository::record(&state.db, &payload, Utc::now()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "payment": payment,
            "message": "Payment recorded and rent status updated to PAID",
        })),
    ))
}

pub async fn payment_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Value>, AppError> {
    let payments = PaymentRepository::history_by_email(&state.db, &params.tenant_email).await?;

    Ok(Json(json!({ "payments": payments })))
}
