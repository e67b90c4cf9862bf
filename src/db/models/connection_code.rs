use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ConnectionCode {
    pub id: i64,
    pub property_id: i64,
    pub unit_number: String,
    pub rent_amount: f64,
    pub code: String,
    pub used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IssueCode {
    pub property_id: i64,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    #[validate(range(min = 0.01, message = "Rent amount is required"))]
    pub rent_amount: f64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RedeemCode {
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
    #[validate(email)]
    pub tenant_email: String,
}

/// Result of a successful redemption.
#[derive(Debug, Clone, Serialize)]
pub struct Redemption {
    pub tenancy_id: i64,
    pub property_name: String,
}
