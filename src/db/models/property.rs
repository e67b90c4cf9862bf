use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub address: String,
    pub property_type: String,
    pub total_units: i64,
    pub created_at: DateTime<Utc>,
}

/// Property row joined with active-tenancy counts for owner listings.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct PropertyOccupancy {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub address: String,
    pub property_type: String,
    pub total_units: i64,
    pub occupied_units: i64,
    pub available_units: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    #[validate(email)]
    pub owner_email: String,
    #[validate(length(min = 1, message = "Property name must not be empty"))]
    pub property_name: String,
    #[validate(length(min = 1, message = "Address must not be empty"))]
    pub address: String,
    #[validate(length(min = 1, message = "Property type must not be empty"))]
    pub property_type: String,
    #[validate(range(min = 1, message = "A property needs at least one unit"))]
    pub units: Option<i64>,
}
