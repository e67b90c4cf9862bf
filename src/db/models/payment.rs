use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub tenancy_id: i64,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub paid_date: NaiveDate,
    pub method: String,
    pub status: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordPayment {
    #[validate(email)]
    pub tenant_email: String,
    #[validate(range(min = 0.01, message = "Amount is required"))]
    pub amount: f64,
    /// Defaults to today when omitted.
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}
