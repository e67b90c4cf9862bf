use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{add_property, generate_code, list_properties};
use crate::app_state::AppState;

pub fn property_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_property))
        .route("/list", get(list_properties))
        .route("/generate-code", post(generate_code))
}
