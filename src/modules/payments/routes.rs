use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{payment_history, record_payment};
use crate::app_state::AppState;

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/record", post(record_payment))
        .route("/history", get(payment_history))
}
