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
use crate::db::models::{MarkReminderRead, ReminderType, SendReminder};
use crate::db::repositories::ReminderRepository;
use crate::error::AppError;
use crate::scheduler;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    pub tenant_email: String,
}

/// Owner-triggered reminder for one tenancy. Always inserts.
pub async fn send_reminder(
    State(state): State<AppState>,
    Json(payload): Json<SendReminder>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;

    let reminder = ReminderRepository::send_manual(
        &state.db,
        payload.tenancy_id,
        &payload.message,
        payload.reminder_type.unwrap_or(ReminderType::Payment),
        Utc::now(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Reminder sent successfully",
            "reminder": reminder,
        })),
    ))
}

/// On-demand run of the monthly sweep.
pub async fn run_sweep(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let sent = scheduler::run_sweep(&state.db, Utc::now()).await?;

    Ok(Json(json!({
        "success": true,
        "reminders_sent": sent.len(),
        "reminders": sent,
    })))
}

pub async fn tenant_reminders(
    State(state): State<AppState>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<Value>, AppError> {
    let reminders = ReminderRepository::list_for_tenant(&state.db, &params.tenant_email).await?;

    Ok(Json(json!({ "notifications": reminders })))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Json(payload): Json<MarkReminderRead>,
) -> Result<Json<Value>, AppError> {
    ReminderRepository::mark_read(&state.db, payload.reminder_id).await?;

    Ok(Json(json!({ "success": true })))
}
