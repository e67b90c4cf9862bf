use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{mark_read, run_sweep, send_reminder, tenant_reminders};
use crate::app_state::AppState;

pub fn reminder_routes() -> Router<AppState> {
    Router::new()
        .route("/send", post(send_reminder))
        .route("/sweep", post(run_sweep))
        .route("/tenant", get(tenant_reminders))
        .route("/mark-read", post(mark_read))
}
