use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::rent::RentStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TenancyStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Tenancy {
    pub id: i64,
    pub user_id: i64,
    pub property_id: i64,
    pub unit_number: String,
    pub rent_amount: f64,
    pub rent_due_day: i64,
    pub lease_start_date: NaiveDate,
    pub last_payment_date: Option<NaiveDate>,
    /// Write-time cache; derive the live value via `rent::rent_position`.
    pub rent_status: RentStatus,
    pub status: TenancyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tenancy joined with tenant, property and owner details for dashboards
/// and reminder composition.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct TenancyOverview {
    pub id: i64,
    pub property_id: i64,
    pub unit_number: String,
    pub rent_amount: f64,
    pub rent_due_day: i64,
    pub last_payment_date: Option<NaiveDate>,
    pub rent_status: RentStatus,
    pub tenant_name: String,
    pub tenant_email: String,
    pub property_name: String,
    pub property_address: String,
    pub owner_name: String,
    pub owner_email: String,
}

/// Direct owner assignment, bypassing the connection-code flow.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTenancy {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub property_id: i64,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit_number: String,
    #[validate(range(min = 0.01, message = "Rent amount is required"))]
    pub rent_amount: f64,
    #[validate(range(min = 1, max = 31))]
    pub rent_due_day: Option<i64>,
    pub lease_start_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveTenancy {
    pub tenancy_id: i64,
}
