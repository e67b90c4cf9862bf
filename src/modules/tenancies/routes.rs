use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{add_tenancy, connect_with_code, remove_tenancy, tenant_info};
use crate::app_state::AppState;

pub fn tenancy_routes() -> Router<AppState> {
    Router::new()
        .route("/connect-with-code", post(connect_with_code))
        .route("/add", post(add_tenancy))
        .route("/info", get(tenant_info))
        .route("/remove", post(remove_tenancy))
}
